//! Job parameters: the validated [`JobSpec`] and the raw [`JobInput`] it is built from.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::JobSpecError;

/// Validated parameters of one run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    count: usize,
    parallelism: usize,
    save_path: PathBuf,
}

impl JobSpec {
    pub fn new(
        count: usize,
        parallelism: usize,
        save_path: impl Into<PathBuf>,
    ) -> Result<Self, JobSpecError> {
        if parallelism == 0 {
            return Err(JobSpecError::Parallelism(0));
        }
        Ok(Self {
            count,
            parallelism,
            save_path: save_path.into(),
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }
}

/// Unvalidated job input as read from `Input.json`, flags or prompts.
/// Keys are accepted in PascalCase, camelCase or snake_case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInput {
    #[serde(alias = "Count")]
    pub count: i64,
    #[serde(alias = "Parallelism")]
    pub parallelism: i64,
    #[serde(default, alias = "SavePath", alias = "savePath")]
    pub save_path: Option<String>,
}

impl JobInput {
    /// Read a job input file; `Ok(None)` when it does not exist.
    pub fn load(path: &Path) -> Result<Option<JobInput>> {
        if !path.exists() {
            return Ok(None);
        }
        let data =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let input: JobInput = serde_json::from_str(&data)
            .with_context(|| format!("parsing job input {}", path.display()))?;
        Ok(Some(input))
    }

    /// Validate into a [`JobSpec`]. An empty or missing save path becomes `default_save_path`.
    pub fn into_spec(self, default_save_path: &str) -> Result<JobSpec, JobSpecError> {
        if self.count < 0 {
            return Err(JobSpecError::NegativeCount(self.count));
        }
        if self.parallelism < 1 {
            return Err(JobSpecError::Parallelism(self.parallelism));
        }
        let save_path = match self.save_path {
            Some(p) if !p.trim().is_empty() => p,
            _ => default_save_path.to_string(),
        };
        JobSpec::new(self.count as usize, self.parallelism as usize, save_path)
    }
}

/// Create the destination directory if missing. Returns true when it was created.
pub fn ensure_save_dir(path: &Path) -> std::io::Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path)?;
    tracing::info!("created save directory {}", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_rejects_zero_parallelism() {
        assert_eq!(
            JobSpec::new(3, 0, "out").unwrap_err(),
            JobSpecError::Parallelism(0)
        );
        let spec = JobSpec::new(0, 1, "out").unwrap();
        assert_eq!(spec.count(), 0);
        assert_eq!(spec.save_path(), Path::new("out"));
    }

    #[test]
    fn input_accepts_pascal_case_keys() {
        let input: JobInput =
            serde_json::from_str(r#"{"Count": 5, "Parallelism": 2, "SavePath": "imgs"}"#).unwrap();
        assert_eq!(input.count, 5);
        assert_eq!(input.parallelism, 2);
        assert_eq!(input.save_path.as_deref(), Some("imgs"));
    }

    #[test]
    fn input_accepts_camel_case_and_missing_path() {
        let input: JobInput =
            serde_json::from_str(r#"{"count": 1, "parallelism": 4}"#).unwrap();
        assert!(input.save_path.is_none());
        let spec = input.into_spec("./outputs").unwrap();
        assert_eq!(spec.save_path(), Path::new("./outputs"));

        let input: JobInput =
            serde_json::from_str(r#"{"count": 1, "parallelism": 4, "savePath": ""}"#).unwrap();
        let spec = input.into_spec("./outputs").unwrap();
        assert_eq!(spec.save_path(), Path::new("./outputs"));
    }

    #[test]
    fn into_spec_rejects_invalid_numbers() {
        let negative = JobInput {
            count: -1,
            parallelism: 2,
            save_path: None,
        };
        assert_eq!(
            negative.into_spec("o").unwrap_err(),
            JobSpecError::NegativeCount(-1)
        );
        let zero_par = JobInput {
            count: 1,
            parallelism: 0,
            save_path: None,
        };
        assert_eq!(
            zero_par.into_spec("o").unwrap_err(),
            JobSpecError::Parallelism(0)
        );
    }

    #[test]
    fn load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JobInput::load(&dir.path().join("Input.json")).unwrap().is_none());
    }

    #[test]
    fn load_reads_file_and_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Input.json");
        fs::write(&path, r#"{"Count": 3, "Parallelism": 1, "SavePath": "x"}"#).unwrap();
        let input = JobInput::load(&path).unwrap().unwrap();
        assert_eq!(input.count, 3);

        fs::write(&path, "{ not json").unwrap();
        assert!(JobInput::load(&path).is_err());
    }

    #[test]
    fn ensure_save_dir_creates_once() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a").join("b");
        assert!(ensure_save_dir(&target).unwrap());
        assert!(target.is_dir());
        assert!(!ensure_save_dir(&target).unwrap());
    }
}
