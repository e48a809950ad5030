//! Error types for transfers, runs and job validation.

use std::fmt;
use std::path::PathBuf;

/// Error returned by a single transfer unit (fetch or write failure).
/// Absorbed at the unit boundary: logged and counted, never escalated.
#[derive(Debug)]
pub enum TransferError {
    /// Curl reported an error (timeout, connection, DNS, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// Creating, writing or flushing the output file failed.
    Io(std::io::Error),
    /// A non-HTTP source reported a failure.
    Source(String),
    /// The transfer task died before producing a result (e.g. panicked).
    Aborted(String),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::Curl(e) => write!(f, "{}", e),
            TransferError::Http(code) => write!(f, "HTTP {}", code),
            TransferError::Io(e) => write!(f, "storage: {}", e),
            TransferError::Source(msg) => write!(f, "source: {}", msg),
            TransferError::Aborted(msg) => write!(f, "transfer aborted: {}", msg),
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransferError::Curl(e) => Some(e),
            TransferError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<curl::Error> for TransferError {
    fn from(e: curl::Error) -> Self {
        TransferError::Curl(e)
    }
}

impl From<std::io::Error> for TransferError {
    fn from(e: std::io::Error) -> Self {
        TransferError::Io(e)
    }
}

/// Terminal failure of an orchestrator run.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// The run was cancelled; files saved so far were removed.
    #[error("download run cancelled after {completed} of {total} transfers; removed {removed} saved file(s)")]
    Cancelled {
        completed: usize,
        total: usize,
        removed: usize,
    },
}

/// Invalid job parameters.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum JobSpecError {
    #[error("parallelism must be at least 1 (got {0})")]
    Parallelism(i64),
    #[error("count must not be negative (got {0})")]
    NegativeCount(i64),
}

/// A saved file that could not be removed during cancellation cleanup.
#[derive(Debug)]
pub struct CleanupWarning {
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl fmt::Display for CleanupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not remove {}: {}", self.path.display(), self.source)
    }
}
