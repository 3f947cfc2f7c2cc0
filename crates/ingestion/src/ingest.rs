//! The ingestion orchestrator.
//!
//! Sequences one webhook event through identity normalization,
//! classification, media materialization, contact and deal resolution, and
//! message persistence. Self echoes, content-free status updates and invalid
//! identities are acknowledged without side effects; database failures before
//! the deal commits are fatal; a message-insert failure after the deal
//! committed is logged and still acknowledged.

use tracing::{info, warn};
use uuid::Uuid;

use database::{message, Database, Direction, InsertOutcome, NewMessage};

use crate::classify::classify;
use crate::error::Result;
use crate::event::WebhookBody;
use crate::identity::normalize_sender;
use crate::media::Materializer;
use crate::resolver::{resolve_contact, resolve_deal};

/// Result of processing one webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Acknowledged without side effects (echo, status update, bad identity).
    Ignored,
    /// The event was ingested into a conversation.
    Accepted {
        deal_id: String,
        /// True when the provider redelivered a message we already stored.
        duplicate: bool,
    },
}

/// Processes inbound provider events.
#[derive(Clone)]
pub struct Ingestor {
    db: Database,
    materializer: Materializer,
}

impl Ingestor {
    pub fn new(db: Database, materializer: Materializer) -> Self {
        Self { db, materializer }
    }

    /// Ingest one webhook delivery for a tenant.
    pub async fn ingest(&self, tenant_id: &str, body: &WebhookBody) -> Result<Outcome> {
        let event = &body.data;
        let key = &event.key;

        if key.from_me {
            return Ok(Outcome::Ignored);
        }
        if event.is_content_free() {
            return Ok(Outcome::Ignored);
        }

        let phone = match normalize_sender(&key.remote_jid, key.sender_pn.as_deref()) {
            Some(phone) => phone,
            None => {
                // Permanently invalid; an error here would only trigger
                // provider retry storms.
                warn!(tenant_id, remote_jid = %key.remote_jid, "Discarding event with invalid sender identity");
                return Ok(Outcome::Ignored);
            }
        };

        let classified = classify(event);
        let media_url = match &classified.media {
            Some(media) => self.materializer.materialize(media).await,
            None => None,
        };

        let pool = self.db.pool();
        let contact = resolve_contact(pool, tenant_id, &phone, event.push_name.as_deref()).await?;
        let resolved = resolve_deal(pool, tenant_id, &contact).await?;

        let new_message = NewMessage {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            deal_id: resolved.deal_id.clone(),
            contact_id: contact.id.clone(),
            provider_message_id: key.id.clone(),
            direction: Direction::Inbound,
            kind: classified.kind,
            content: classified.content,
            media_url,
        };

        let duplicate = match message::insert_message(pool, &new_message).await {
            Ok(InsertOutcome::Inserted) => false,
            Ok(InsertOutcome::Duplicate) => {
                info!(tenant_id, provider_message_id = %key.id, "Redelivered message ignored");
                true
            }
            Err(e) => {
                // The contact and deal are already committed; acknowledging
                // keeps the provider from redelivering into the same failure.
                warn!(tenant_id, deal_id = %resolved.deal_id, error = %e, "Message insert failed after deal commit");
                false
            }
        };

        info!(
            tenant_id,
            deal_id = %resolved.deal_id,
            kind = new_message.kind.as_str(),
            created_deal = resolved.created,
            "Event ingested"
        );

        Ok(Outcome::Accepted {
            deal_id: resolved.deal_id,
            duplicate,
        })
    }
}
