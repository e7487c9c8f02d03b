//! Error types for loading, merging and writing question files.

use std::io;
use std::path::PathBuf;

/// Everything that can stop a merge run before the output is written.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// A required input file does not exist.
    #[error("input file not found: {}", path.display())]
    MissingInput { path: PathBuf },

    /// The input exists but is unreadable, not JSON, or not an array of objects.
    #[error("malformed input {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },

    /// The output could not be created, written or moved into place.
    #[error("cannot write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MergeError {
    pub fn malformed<T: std::fmt::Display>(path: impl Into<PathBuf>, reason: T) -> Self {
        MergeError::MalformedInput {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MergeError::Write {
            path: path.into(),
            source,
        }
    }
}

pub type MergeResult<T> = Result<T, MergeError>;
