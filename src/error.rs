//! Error types for behavior-bins

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while aggregating behavior logs
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed record in {video} at line {line}: expected {expected} fields, found {fields}")]
    MalformedRecord {
        video: String,
        line: u64,
        expected: usize,
        fields: usize,
    },

    #[error("Blank behavior label in {video} at line {line}")]
    BlankBehavior { video: String, line: u64 },

    #[error("No records found in input: {0}")]
    EmptyInput(String),

    #[error("Invalid bin configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

impl AggregateError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AggregateError::Io {
            path: path.into(),
            source,
        }
    }
}
