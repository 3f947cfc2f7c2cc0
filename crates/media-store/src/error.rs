//! Error types for the object-storage client.

use thiserror::Error;

/// Errors that can occur while talking to the object store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed (transport error, timeout).
    #[error("storage HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store rejected the upload.
    #[error("storage rejected upload of {key}: {status}")]
    Rejected { key: String, status: u16 },

    /// An object with this key already exists and no-clobber was requested.
    #[error("object already exists: {key}")]
    Conflict { key: String },
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
