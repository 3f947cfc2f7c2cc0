//! Inbound WhatsApp webhook route.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::debug;

use ingestion::{Outcome, WebhookBody};

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Whole-event deadline; past this the provider should redeliver.
const INGEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Acknowledgment body for one delivery.
#[derive(Serialize)]
#[serde(untagged)]
pub enum Ack {
    /// Event was discarded (echo, status update, invalid identity).
    Ignored { message: &'static str },
    /// Event was ingested.
    Accepted {
        success: bool,
        #[serde(rename = "dealId")]
        deal_id: String,
    },
}

/// Receive one provider delivery for a tenant.
pub async fn receive(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(body): Json<WebhookBody>,
) -> Result<Json<Ack>> {
    debug!(tenant_id, provider_message_id = %body.data.key.id, "Webhook delivery received");

    let outcome = tokio::time::timeout(INGEST_TIMEOUT, state.ingestor.ingest(&tenant_id, &body))
        .await
        .map_err(|_| ApiError::Timeout)??;

    let ack = match outcome {
        Outcome::Ignored => Ack::Ignored { message: "Ignored" },
        Outcome::Accepted { deal_id, .. } => Ack::Accepted {
            success: true,
            deal_id,
        },
    };

    Ok(Json(ack))
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::{profile, stage, Database};
    use ingestion::{Ingestor, Materializer};
    use serde_json::json;

    async fn test_state() -> AppState {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();

        let pipeline_id = stage::create_pipeline(db.pool(), "t1", "Vendas", true)
            .await
            .unwrap();
        stage::create_stage(db.pool(), "t1", &pipeline_id, "Novo Lead", 1)
            .await
            .unwrap();
        profile::create_profile(db.pool(), "t1", "Ana", true)
            .await
            .unwrap();

        AppState::new(Ingestor::new(db, Materializer::new(None).unwrap()))
    }

    fn body(from_me: bool) -> WebhookBody {
        serde_json::from_value(json!({
            "data": {
                "key": {
                    "remoteJid": "5511999998888@s.whatsapp.net",
                    "fromMe": from_me,
                    "id": "WAMID.1"
                },
                "pushName": "Maria",
                "messageType": "conversation",
                "message": { "conversation": "Hello" }
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn accepted_delivery_returns_deal_id() {
        let state = test_state().await;

        let Json(ack) = receive(
            State(state),
            Path("t1".to_string()),
            Json(body(false)),
        )
        .await
        .unwrap();

        let value = serde_json::to_value(&ack).unwrap();
        assert_eq!(value["success"], true);
        assert!(value["dealId"].is_string());
    }

    #[tokio::test]
    async fn echo_delivery_is_acknowledged_as_ignored() {
        let state = test_state().await;

        let Json(ack) = receive(
            State(state),
            Path("t1".to_string()),
            Json(body(true)),
        )
        .await
        .unwrap();

        let value = serde_json::to_value(&ack).unwrap();
        assert_eq!(value["message"], "Ignored");
    }

    #[tokio::test]
    async fn unconfigured_tenant_is_an_error() {
        let state = test_state().await;

        let result = receive(
            State(state),
            Path("t-unknown".to_string()),
            Json(body(false)),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Ingest(_))));
    }
}
