//! Resource sources: anything that can produce the bytes of resource `index`.
//!
//! The orchestrator treats the remote endpoint as opaque; [`HttpSource`] is the
//! libcurl implementation used by the CLI, tests plug in closures.

mod http;

pub use http::HttpSource;

use std::io::Write;

use crate::error::TransferError;

/// Byte-producing endpoint parameterized by an index.
///
/// `fetch` runs on a blocking thread and may block for the whole transfer.
/// It writes the full resource into `out` and returns the number of bytes written.
pub trait ResourceSource: Send + Sync {
    fn fetch(&self, index: usize, out: &mut dyn Write) -> Result<u64, TransferError>;
}

impl<F> ResourceSource for F
where
    F: Fn(usize, &mut dyn Write) -> Result<u64, TransferError> + Send + Sync,
{
    fn fetch(&self, index: usize, out: &mut dyn Write) -> Result<u64, TransferError> {
        self(index, out)
    }
}
