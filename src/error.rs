//! Error types for startup and storage

use thiserror::Error;

/// Startup failures; the page cannot run without these handles
#[derive(Debug, Error)]
pub enum InitError {
    #[error("no global window")]
    NoWindow,

    #[error("no document on window")]
    NoDocument,

    #[error("missing element #{0}")]
    MissingElement(String),

    #[error("element #{0} has the wrong type")]
    WrongElementType(String),

    #[error("canvas has no 2d context")]
    NoContext2d,
}

/// Persistent storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("write rejected for key {0}")]
    WriteRejected(String),
}
