//! Transfer unit: download one resource to `save_dir/{index}.{ext}`.
//!
//! A unit reports only through its [`TransferResult`]; it never touches the
//! run's progress counter or completed-path record.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::TransferError;
use crate::source::ResourceSource;

/// Write buffer between the source and the output file.
const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Outcome of one transfer unit.
#[derive(Debug)]
pub enum TransferResult {
    Success { index: usize, path: PathBuf },
    Failure { index: usize, error: TransferError },
}

impl TransferResult {
    pub fn index(&self) -> usize {
        match self {
            TransferResult::Success { index, .. } | TransferResult::Failure { index, .. } => *index,
        }
    }
}

/// Output file for `index`.
pub fn output_path(save_dir: &Path, index: usize, extension: &str) -> PathBuf {
    save_dir.join(format!("{}.{}", index, extension))
}

/// Download resource `index` from `source` into `save_dir`, overwriting any existing file.
/// On failure the partially written file is removed; a file that could not be
/// opened for writing is left alone.
pub fn execute(
    index: usize,
    save_dir: &Path,
    extension: &str,
    source: &dyn ResourceSource,
) -> TransferResult {
    let path = output_path(save_dir, index, extension);
    tracing::debug!(index, path = %path.display(), "transfer started");
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            return TransferResult::Failure {
                index,
                error: e.into(),
            }
        }
    };
    match write_resource(index, file, source) {
        Ok(bytes) => {
            tracing::debug!(index, bytes, "transfer finished");
            TransferResult::Success { index, path }
        }
        Err(error) => {
            remove_partial(&path);
            TransferResult::Failure { index, error }
        }
    }
}

fn write_resource(
    index: usize,
    file: File,
    source: &dyn ResourceSource,
) -> Result<u64, TransferError> {
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
    let bytes = source.fetch(index, &mut writer)?;
    writer.flush()?;
    Ok(bytes)
}

/// Remove a partially written output file; a missing file is fine.
pub(crate) fn remove_partial(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("could not remove partial file {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn ok_source(index: usize, out: &mut dyn Write) -> Result<u64, TransferError> {
        let body = format!("image-{}", index);
        out.write_all(body.as_bytes())?;
        Ok(body.len() as u64)
    }

    fn failing_source(_index: usize, out: &mut dyn Write) -> Result<u64, TransferError> {
        out.write_all(b"half")?;
        Err(TransferError::Source("connection reset".into()))
    }

    #[test]
    fn output_path_uses_index_and_extension() {
        assert_eq!(
            output_path(Path::new("/tmp/out"), 4, "png"),
            PathBuf::from("/tmp/out/4.png")
        );
    }

    #[test]
    fn execute_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = execute(2, dir.path(), "png", &ok_source);
        match result {
            TransferResult::Success { index, path } => {
                assert_eq!(index, 2);
                assert_eq!(std::fs::read(&path).unwrap(), b"image-2");
            }
            TransferResult::Failure { error, .. } => panic!("unexpected failure: {}", error),
        }
    }

    #[test]
    fn execute_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path(dir.path(), 0, "png");
        std::fs::write(&path, b"stale content that is longer").unwrap();
        let result = execute(0, dir.path(), "png", &ok_source);
        assert!(matches!(result, TransferResult::Success { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), b"image-0");
    }

    #[test]
    fn failure_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = execute(5, dir.path(), "png", &failing_source);
        assert!(matches!(result, TransferResult::Failure { .. }));
        assert_eq!(result.index(), 5);
        assert!(!output_path(dir.path(), 5, "png").exists());
    }

    #[test]
    fn missing_directory_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        match execute(0, &missing, "png", &ok_source) {
            TransferResult::Failure { error, .. } => assert!(matches!(error, TransferError::Io(_))),
            TransferResult::Success { .. } => panic!("expected failure"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn open_failure_keeps_existing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path(dir.path(), 0, "png");
        // Dangling link into a missing directory: create fails, the link is not ours to delete.
        std::os::unix::fs::symlink(dir.path().join("missing").join("target"), &path).unwrap();
        match execute(0, dir.path(), "png", &ok_source) {
            TransferResult::Failure { error, .. } => assert!(matches!(error, TransferError::Io(_))),
            TransferResult::Success { .. } => panic!("expected failure"),
        }
        assert!(path.symlink_metadata().is_ok());
    }
}
