//! Inbound WhatsApp webhook server for the CRM.
//!
//! Receives provider deliveries, runs them through the ingestion pipeline and
//! acknowledges them the way the provider expects (200 for handled or
//! discarded events, 500 for transient failures worth redelivering).

mod config;
mod error;
mod routes;
mod state;

use database::Database;
use ingestion::{Ingestor, Materializer};
use media_store::{StoreClient, StoreConfig};
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting webhook server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Optional object store for media re-hosting
    let store = match &config.storage_url {
        Some(url) => Some(StoreClient::new(StoreConfig::new(
            url,
            &config.storage_bucket,
            &config.storage_key,
        ))?),
        None => {
            info!("STORAGE_URL not set; media will keep provider URLs");
            None
        }
    };

    // Build application state
    let ingestor = Ingestor::new(db, Materializer::new(store)?);
    let state = AppState::new(ingestor);

    // Build router
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "Webhook server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
