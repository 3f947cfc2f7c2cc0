//! Error types for the webhook server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors returned to the provider.
///
/// Everything maps to 500 so the provider treats the delivery as transient
/// and retries; ignorable events never reach this type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Ingestion aborted (fatal write or missing stage).
    #[error("Ingestion error: {0}")]
    Ingest(#[from] ingestion::IngestError),

    /// The whole event exceeded the request-scoped deadline.
    #[error("Ingestion timed out")]
    Timeout,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Ingest(err) => {
                tracing::error!("Ingestion error: {}", err);
                err.to_string()
            }
            ApiError::Timeout => {
                tracing::error!("Ingestion timed out");
                self.to_string()
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Result type for webhook handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
