//! Route handlers for the webhook server.

pub mod health;
pub mod whatsapp;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/webhooks/whatsapp/:tenant_id", post(whatsapp::receive))
}
