//! Application state shared across handlers.

use ingestion::Ingestor;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Event ingestor.
    pub ingestor: Ingestor,
}

impl AppState {
    /// Create new application state.
    pub fn new(ingestor: Ingestor) -> Self {
        Self { ingestor }
    }
}
