//! Fatal analyzer errors.
//!
//! Only an unusable input path, a broken config file and a failure to write
//! the artifacts stop a run. Everything that goes wrong for a single file is
//! recorded as a [`FileFailure`] instead.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("input path does not exist: {0}")]
    InputNotFound(PathBuf),
    #[error("input path is not a directory: {0}")]
    InputNotDirectory(PathBuf),
    #[error("failed to write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize analysis: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },
}

/// A file that could not be analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub reason: String,
}

impl FileFailure {
    pub fn new(path: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
