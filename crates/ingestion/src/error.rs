//! Error types for ingestion.

use thiserror::Error;

/// Errors that abort processing of an inbound event.
///
/// Soft failures (media re-hosting, activity bumps, the message insert after
/// the deal committed) never surface here; they are logged and the event is
/// still acknowledged.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A contact or deal write failed. The provider will redeliver.
    #[error("database error: {0}")]
    Database(#[from] database::DatabaseError),

    /// The tenant has no position-1 stage in a default pipeline.
    /// Operator intervention required; redelivery cannot fix this.
    #[error("no initial pipeline stage configured for tenant {tenant}")]
    NoStage { tenant: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
