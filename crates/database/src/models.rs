//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An external party, identified per tenant by a digits-only phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: String,
    pub tenant_id: String,
    /// Display name; empty until a push name is seen.
    pub name: String,
    /// Canonical digits-only phone number, unique per tenant.
    pub phone: String,
    pub created_at: String,
}

/// A pipeline stage. Position 1 of the default pipeline receives new deals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Stage {
    pub id: String,
    pub tenant_id: String,
    pub pipeline_id: String,
    pub name: String,
    pub position: i64,
}

/// An owner candidate for newly opened deals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    /// Whether the user is currently flagged online.
    pub online: bool,
    /// When this profile last received a deal, for fair rotation.
    pub last_assigned_at: Option<String>,
}

/// Deal lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    Open,
    Won,
    Lost,
}

/// One engagement thread with a contact; doubles as the chat anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Deal {
    pub id: String,
    pub tenant_id: String,
    pub contact_id: String,
    pub owner_id: Option<String>,
    pub stage_id: String,
    pub status: DealStatus,
    pub title: String,
    pub value: f64,
    pub last_activity_at: String,
    pub created_at: String,
}

/// Fields needed to open a new deal.
#[derive(Debug, Clone)]
pub struct NewDeal {
    pub id: String,
    pub tenant_id: String,
    pub contact_id: String,
    pub owner_id: Option<String>,
    pub stage_id: String,
    pub title: String,
}

/// Message direction relative to the CRM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// Classified message kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Audio,
    Video,
    Document,
    Pdf,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::Audio => "audio",
            MessageKind::Video => "video",
            MessageKind::Document => "document",
            MessageKind::Pdf => "pdf",
        }
    }
}

/// An immutable record of one communication event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: String,
    pub tenant_id: String,
    pub deal_id: String,
    pub contact_id: String,
    /// Provider-native message id, unique per tenant for dedup.
    pub provider_message_id: String,
    pub direction: Direction,
    pub kind: MessageKind,
    pub content: String,
    pub media_url: Option<String>,
    pub status: String,
    pub created_at: String,
}

/// Fields needed to persist a new message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub id: String,
    pub tenant_id: String,
    pub deal_id: String,
    pub contact_id: String,
    pub provider_message_id: String,
    pub direction: Direction,
    pub kind: MessageKind,
    pub content: String,
    pub media_url: Option<String>,
}
