//! Progress reporting for a run (transfers attempted out of total).
//!
//! The orchestrator calls the sink from a single collector task, so the
//! values a sink sees are strictly increasing and never repeat.

/// Snapshot of run progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Transfers attempted so far (success or failure).
    pub current: usize,
    /// Transfers in the run.
    pub total: usize,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.current >= self.total
    }
}

/// Receives progress notifications.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, progress: Progress);
}

impl<F> ProgressSink for F
where
    F: Fn(Progress) + Send + Sync,
{
    fn on_progress(&self, progress: Progress) {
        self(progress)
    }
}

/// Forwards to a consumer task (e.g. the CLI renderer). A closed receiver is ignored.
impl ProgressSink for tokio::sync::mpsc::UnboundedSender<Progress> {
    fn on_progress(&self, progress: Progress) {
        let _ = self.send(progress);
    }
}

/// Sink that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _progress: Progress) {}
}
