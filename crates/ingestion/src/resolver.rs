//! Contact and deal resolution.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use database::{contact, deal, stage, Contact, NewDeal};

use crate::error::{IngestError, Result};
use crate::owner;

/// Find or create the contact for a canonical phone number.
///
/// The display name falls back to the phone number itself when the provider
/// supplied none, so the CRM never shows a blank contact.
pub async fn resolve_contact(
    pool: &SqlitePool,
    tenant_id: &str,
    phone: &str,
    push_name: Option<&str>,
) -> Result<Contact> {
    let name = match push_name {
        Some(name) if !name.trim().is_empty() => name,
        _ => phone,
    };

    let contact = contact::upsert_contact(pool, tenant_id, phone, name).await?;
    Ok(contact)
}

/// The resolved conversation for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDeal {
    pub deal_id: String,
    pub owner_id: Option<String>,
    /// Whether this event opened the deal.
    pub created: bool,
}

/// Find the contact's open deal or open a new one.
///
/// Reuse bumps the deal's last-activity timestamp; a failed bump is logged
/// and ignored. Creation requires a tenant-scoped initial stage and runs the
/// owner assignment policy.
pub async fn resolve_deal(
    pool: &SqlitePool,
    tenant_id: &str,
    contact: &Contact,
) -> Result<ResolvedDeal> {
    if let Some(existing) = deal::find_open_deal(pool, tenant_id, &contact.id).await? {
        if let Err(e) = deal::touch_deal(pool, tenant_id, &existing.id).await {
            warn!(deal_id = %existing.id, error = %e, "Failed to bump deal activity");
        }
        debug!(deal_id = %existing.id, "Reusing open deal");
        return Ok(ResolvedDeal {
            deal_id: existing.id,
            owner_id: existing.owner_id,
            created: false,
        });
    }

    let stage = stage::first_stage(pool, tenant_id)
        .await?
        .ok_or_else(|| IngestError::NoStage {
            tenant: tenant_id.to_string(),
        })?;

    let owner_id = owner::assign_owner(pool, tenant_id).await?;

    let new_deal = NewDeal {
        id: Uuid::new_v4().to_string(),
        tenant_id: tenant_id.to_string(),
        contact_id: contact.id.clone(),
        owner_id: owner_id.clone(),
        stage_id: stage.id,
        title: format!("Conversa com {}", contact.name),
    };
    deal::create_deal(pool, &new_deal).await?;

    info!(deal_id = %new_deal.id, contact_id = %contact.id, "Opened new deal");
    Ok(ResolvedDeal {
        deal_id: new_deal.id,
        owner_id,
        created: true,
    })
}
