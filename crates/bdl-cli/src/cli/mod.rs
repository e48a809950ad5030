//! CLI for the BDL batch downloader.

mod commands;
mod input;
mod prompt;

use anyhow::Result;
use bdl_core::config;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_batch, show_config};

/// Top-level CLI for the BDL batch downloader.
#[derive(Debug, Parser)]
#[command(name = "bdl")]
#[command(about = "BDL: bounded-concurrency batch image downloader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a batch of images.
    Run(RunArgs),

    /// Show the config file location and effective settings.
    Config,
}

/// Job parameters for `bdl run`. Without `--count` and `--parallelism` the
/// job input file is used, or the values are prompted for.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Job input file (JSON with Count, Parallelism, SavePath). Defaults to `input_file` from config.
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Number of images to download.
    #[arg(long, value_name = "N")]
    pub count: Option<i64>,

    /// Maximum number of downloads in flight at once.
    #[arg(long, short = 'j', value_name = "N")]
    pub parallelism: Option<i64>,

    /// Destination directory (created if missing).
    #[arg(long, value_name = "DIR")]
    pub save_path: Option<String>,

    /// Cancel the run after this many seconds; files saved so far are removed.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run(args) => run_batch(&cfg, &args).await?,
            CliCommand::Config => show_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
