//! Run control: the single-shot cancellation signal for one download run.
//!
//! The orchestrator checks the signal only when admitting a new transfer;
//! transfers already running finish normally. A control client (Ctrl-C
//! handler, deadline timer, tests) requests cancellation through
//! [`RunControl::request_cancel`].

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Shared, cloneable cancellation flag. Once set it stays set.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    token: CancellationToken,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent; only the first request is logged.
    pub fn request_cancel(&self, reason: &str) {
        if !self.token.is_cancelled() {
            tracing::info!(reason, "run cancellation requested");
        }
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once cancellation has been requested.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

/// Spawn a task that cancels the run on Ctrl-C. Abort the handle once the run is over.
pub fn cancel_on_ctrl_c(control: RunControl) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                match res {
                    Ok(()) => control.request_cancel("interrupted"),
                    Err(e) => tracing::warn!("could not listen for Ctrl-C: {}", e),
                }
            }
            _ = control.cancelled() => {}
        }
    })
}

/// Spawn a task that cancels the run once `after` has elapsed.
pub fn cancel_after(control: RunControl, after: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(after) => control.request_cancel("timeout"),
            _ = control.cancelled() => {}
        }
    })
}
