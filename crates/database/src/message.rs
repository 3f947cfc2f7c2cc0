//! Message persistence.
//!
//! Messages are append-only. The insert is idempotent on the provider's
//! native message id, so a redelivered webhook cannot duplicate a row.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{Message, NewMessage};

/// Outcome of an idempotent message insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written.
    Inserted,
    /// A row with the same (tenant, provider message id) already existed.
    Duplicate,
}

/// Insert a message, ignoring redeliveries of the same provider message id.
pub async fn insert_message(pool: &SqlitePool, message: &NewMessage) -> Result<InsertOutcome> {
    let result = sqlx::query(
        r#"
        INSERT INTO messages (id, tenant_id, deal_id, contact_id, provider_message_id,
                              direction, kind, content, media_url)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(tenant_id, provider_message_id) DO NOTHING
        "#,
    )
    .bind(&message.id)
    .bind(&message.tenant_id)
    .bind(&message.deal_id)
    .bind(&message.contact_id)
    .bind(&message.provider_message_id)
    .bind(message.direction)
    .bind(message.kind)
    .bind(&message.content)
    .bind(&message.media_url)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        Ok(InsertOutcome::Duplicate)
    } else {
        Ok(InsertOutcome::Inserted)
    }
}

/// List a deal's messages in arrival order.
pub async fn list_messages(
    pool: &SqlitePool,
    tenant_id: &str,
    deal_id: &str,
) -> Result<Vec<Message>> {
    let messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, tenant_id, deal_id, contact_id, provider_message_id,
               direction, kind, content, media_url, status, created_at
        FROM messages
        WHERE tenant_id = ? AND deal_id = ?
        ORDER BY created_at ASC, rowid ASC
        "#,
    )
    .bind(tenant_id)
    .bind(deal_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}
