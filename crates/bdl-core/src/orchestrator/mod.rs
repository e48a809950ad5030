//! Download orchestrator.
//!
//! Admits transfer units in index order through a semaphore sized to the
//! job's parallelism, runs each admitted unit on the blocking pool, and
//! funnels every outcome into a single collector. Cancellation is checked
//! only at admission; units already running finish, and once they have all
//! reported, the files of a cancelled run are removed. Dropping the `run`
//! future mid-flight removes the run's files the same way.

mod cleanup;
mod collect;
mod progress;

pub use cleanup::CleanupReport;
pub use progress::{NoProgress, Progress, ProgressSink};

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};

use crate::control::RunControl;
use crate::error::{OrchestratorError, TransferError};
use crate::job::JobSpec;
use crate::source::ResourceSource;
use crate::transfer::{self, TransferResult};

use collect::{Completion, RunLedger};

/// Runs batches of transfers against one resource source.
pub struct Orchestrator {
    source: Arc<dyn ResourceSource>,
    extension: String,
    sink: Arc<dyn ProgressSink>,
    control: RunControl,
}

impl Orchestrator {
    /// Saved files are named `{index}.{extension}`.
    pub fn new(source: Arc<dyn ResourceSource>, extension: impl Into<String>) -> Self {
        Self {
            source,
            extension: extension.into(),
            sink: Arc::new(NoProgress),
            control: RunControl::new(),
        }
    }

    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Use an externally owned cancellation signal.
    pub fn with_control(mut self, control: RunControl) -> Self {
        self.control = control;
        self
    }

    pub fn control(&self) -> &RunControl {
        &self.control
    }

    /// Download `spec.count()` resources into `spec.save_path()`.
    ///
    /// Returns the saved paths sorted by index. Failed transfers are logged and
    /// left out. If cancellation was requested by the time every launched unit
    /// has reported, all saved files are removed and `Cancelled` is returned.
    pub async fn run(&self, spec: &JobSpec) -> Result<Vec<PathBuf>, OrchestratorError> {
        let total = spec.count();
        if total == 0 {
            tracing::info!("nothing to download");
            return Ok(Vec::new());
        }
        tracing::info!(
            count = total,
            parallelism = spec.parallelism(),
            save_path = %spec.save_path().display(),
            "download run started"
        );

        let gate = Arc::new(Semaphore::new(spec.parallelism()));
        let (tx, rx) = mpsc::channel::<Completion>(spec.parallelism());
        let mut ledger = RunLedger::new(rx);
        self.sink.on_progress(Progress { current: 0, total });

        let (launched, ()) = tokio::join!(
            self.launch_units(spec, gate, tx),
            ledger.collect(total, self.sink.as_ref()),
        );
        let tally = ledger.finish();

        if self.control.is_cancelled() {
            let paths: Vec<PathBuf> = tally.completed.into_iter().map(|(_, p)| p).collect();
            let report = cleanup::remove_saved_files(&paths);
            tracing::info!(
                launched,
                attempted = tally.attempted,
                removed = report.removed,
                warnings = report.warnings.len(),
                "download run cancelled; saved files removed"
            );
            return Err(OrchestratorError::Cancelled {
                completed: tally.attempted,
                total,
                removed: report.removed,
            });
        }

        let mut completed = tally.completed;
        completed.sort_by_key(|(index, _)| *index);
        tracing::info!(
            saved = completed.len(),
            failed = tally.failed,
            "download run finished"
        );
        Ok(completed.into_iter().map(|(_, path)| path).collect())
    }

    /// Admission loop. Returns the number of units launched; dropping `tx`
    /// on return lets the collector finish once the last unit reports.
    async fn launch_units(
        &self,
        spec: &JobSpec,
        gate: Arc<Semaphore>,
        tx: mpsc::Sender<Completion>,
    ) -> usize {
        let mut launched = 0usize;
        for index in 0..spec.count() {
            let permit = tokio::select! {
                biased;
                _ = self.control.cancelled() => {
                    tracing::info!(launched, "admission stopped by cancellation");
                    break;
                }
                permit = Arc::clone(&gate).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break, // gate closed
                },
            };
            self.spawn_unit(index, spec.save_path().to_path_buf(), permit, tx.clone());
            launched += 1;
        }
        launched
    }

    fn spawn_unit(
        &self,
        index: usize,
        save_dir: PathBuf,
        permit: OwnedSemaphorePermit,
        tx: mpsc::Sender<Completion>,
    ) {
        let source = Arc::clone(&self.source);
        let extension = self.extension.clone();
        let output = transfer::output_path(&save_dir, index, &extension);
        tokio::spawn(async move {
            let joined = tokio::task::spawn_blocking(move || {
                transfer::execute(index, &save_dir, &extension, source.as_ref())
            })
            .await;
            let result = match joined {
                Ok(result) => result,
                Err(e) => {
                    transfer::remove_partial(&output);
                    TransferResult::Failure {
                        index,
                        error: TransferError::Aborted(e.to_string()),
                    }
                }
            };
            if let Err(unsent) = tx.send(Completion { result, permit }).await {
                tracing::warn!(index, "completion collector gone; result dropped");
                if let TransferResult::Success { path, .. } = unsent.0.result {
                    transfer::remove_partial(&path);
                }
            }
        });
    }
}
