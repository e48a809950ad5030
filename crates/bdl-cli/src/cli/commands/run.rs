//! `bdl run` – download a batch of images with bounded parallelism.

use anyhow::Result;
use bdl_core::config::BdlConfig;
use bdl_core::control::{self, RunControl};
use bdl_core::error::OrchestratorError;
use bdl_core::job::{self, JobSpec};
use bdl_core::orchestrator::{Orchestrator, Progress};
use bdl_core::source::HttpSource;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::input::{resolve_job_input, InputOrigin};
use crate::cli::RunArgs;

pub async fn run_batch(cfg: &BdlConfig, args: &RunArgs) -> Result<()> {
    // Prompts read stdin; keep them off the async workers.
    let (input, origin) = {
        let (args, cfg) = (args.clone(), cfg.clone());
        tokio::task::spawn_blocking(move || resolve_job_input(&args, &cfg)).await??
    };
    let spec = input.into_spec(&cfg.default_save_path)?;
    tracing::debug!(?origin, ?spec, "job resolved");
    if origin == InputOrigin::Flags {
        tracing::info!("job parameters taken from command-line flags");
    }

    if !spec.save_path().is_dir() {
        println!("Folder doesnt exist...");
        job::ensure_save_dir(spec.save_path())?;
        println!("Folder created successfully.");
    }

    println!(
        "Downloading {} images ({} parallel downloads at most)",
        spec.count(),
        spec.parallelism()
    );

    let run_control = RunControl::new();
    let ctrl_c = control::cancel_on_ctrl_c(run_control.clone());
    let deadline = args
        .timeout_secs
        .map(|secs| control::cancel_after(run_control.clone(), Duration::from_secs(secs)));

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::unbounded_channel::<Progress>();
    let progress_handle = tokio::spawn(async move {
        let mut stdout = std::io::stdout();
        while let Some(progress) = progress_rx.recv().await {
            print!("\r Progress: {}/{}", progress.current, progress.total);
            let _ = stdout.flush();
        }
        println!();
    });

    let outcome = {
        let source = HttpSource::from_config(cfg);
        let orchestrator = Orchestrator::new(Arc::new(source), cfg.file_extension.clone())
            .with_progress_sink(Arc::new(progress_tx))
            .with_control(run_control.clone());
        orchestrator.run(&spec).await
    };
    // The orchestrator (and the progress sender) is gone; the renderer drains and exits.
    let _ = progress_handle.await;
    ctrl_c.abort();
    if let Some(handle) = deadline {
        handle.abort();
    }

    match outcome {
        Ok(paths) => {
            report_finished(&spec, &paths);
            Ok(())
        }
        Err(err @ OrchestratorError::Cancelled { .. }) => {
            println!("Image download process cancelled.");
            Err(err.into())
        }
    }
}

fn report_finished(spec: &JobSpec, paths: &[PathBuf]) {
    let save_path = spec.save_path().display();
    if paths.len() == spec.count() {
        println!("All images downloaded and saved to {}.", save_path);
    } else {
        let failed = spec.count() - paths.len();
        println!(
            "{} of {} images saved to {} ({} failed).",
            paths.len(),
            spec.count(),
            save_path,
            failed
        );
        tracing::warn!(failed, "some transfers failed; see log for details");
    }
}
