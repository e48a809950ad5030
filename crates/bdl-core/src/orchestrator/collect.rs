//! Completion collector: sole owner of the progress counter and completed paths.
//!
//! Units send their result together with their admission permit; the permit
//! is released only after the result has been recorded and reported.

use std::path::PathBuf;
use tokio::sync::{mpsc, OwnedSemaphorePermit};

use super::cleanup;
use super::progress::{Progress, ProgressSink};
use crate::transfer::TransferResult;

/// Message from a finished unit.
pub(super) struct Completion {
    pub(super) result: TransferResult,
    pub(super) permit: OwnedSemaphorePermit,
}

/// Everything the collector observed during one run.
#[derive(Debug, Default)]
pub(super) struct RunTally {
    /// Transfers that reported, success or failure.
    pub(super) attempted: usize,
    pub(super) failed: usize,
    /// Successful transfers in completion order.
    pub(super) completed: Vec<(usize, PathBuf)>,
}

/// Receiving end of a run plus what has been recorded so far.
///
/// If the ledger is dropped before [`RunLedger::finish`] (the `run` future was
/// dropped mid-flight), it closes the channel and removes every file it knows
/// about: recorded ones and those still queued. Units whose send fails after
/// that remove their own file.
pub(super) struct RunLedger {
    rx: mpsc::Receiver<Completion>,
    tally: RunTally,
    finished: bool,
}

impl RunLedger {
    pub(super) fn new(rx: mpsc::Receiver<Completion>) -> Self {
        Self {
            rx,
            tally: RunTally::default(),
            finished: false,
        }
    }

    /// Hand over the tally; the caller now owns the saved files.
    pub(super) fn finish(mut self) -> RunTally {
        self.finished = true;
        std::mem::take(&mut self.tally)
    }

    /// Drains completions until every sender is gone.
    pub(super) async fn collect(&mut self, total: usize, sink: &dyn ProgressSink) {
        while let Some(Completion { result, permit }) = self.rx.recv().await {
            self.tally.attempted += 1;
            let index = result.index();
            match result {
                TransferResult::Success { path, .. } => self.tally.completed.push((index, path)),
                TransferResult::Failure { error, .. } => {
                    self.tally.failed += 1;
                    tracing::warn!(index, "transfer failed: {}", error);
                }
            }
            let progress = Progress {
                current: self.tally.attempted,
                total,
            };
            sink.on_progress(progress);
            drop(permit);
            if progress.is_complete() {
                tracing::debug!(total, "every transfer has reported");
            }
        }
    }
}

impl Drop for RunLedger {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.rx.close();
        let mut paths: Vec<PathBuf> = self.tally.completed.drain(..).map(|(_, p)| p).collect();
        while let Ok(Completion { result, .. }) = self.rx.try_recv() {
            if let TransferResult::Success { path, .. } = result {
                paths.push(path);
            }
        }
        let report = cleanup::remove_saved_files(&paths);
        tracing::warn!(
            removed = report.removed,
            warnings = report.warnings.len(),
            "download run dropped before completion; saved files removed"
        );
    }
}
