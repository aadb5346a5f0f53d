//! Storage Layer
//!
//! Keeps the most recent diagnosis sessions, newest first, optionally
//! mirrored to a JSON file.

mod history;

pub use history::{DiagnosisSession, HistoryStore, DEFAULT_HISTORY_CAPACITY};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
