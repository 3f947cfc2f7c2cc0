//! Contact resolution.
//!
//! Contacts are keyed by (tenant, phone). Creation goes through a single
//! upsert statement so that two concurrent first messages from the same
//! number cannot race into two rows.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::Contact;

/// Find or create the contact for a (tenant, phone) pair.
///
/// If the contact already exists its row is returned unchanged, except that
/// an empty display name is backfilled from `name`. The insert and the
/// lookup are one statement, so the (tenant, phone) uniqueness invariant
/// holds under concurrent delivery.
pub async fn upsert_contact(
    pool: &SqlitePool,
    tenant_id: &str,
    phone: &str,
    name: &str,
) -> Result<Contact> {
    let id = Uuid::new_v4().to_string();

    let contact = sqlx::query_as::<_, Contact>(
        r#"
        INSERT INTO contacts (id, tenant_id, name, phone)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(tenant_id, phone) DO UPDATE SET
            name = CASE
                WHEN contacts.name = '' THEN excluded.name
                ELSE contacts.name
            END
        RETURNING id, tenant_id, name, phone, created_at
        "#,
    )
    .bind(&id)
    .bind(tenant_id)
    .bind(name)
    .bind(phone)
    .fetch_one(pool)
    .await?;

    Ok(contact)
}

/// Get a contact by ID.
pub async fn get_contact(pool: &SqlitePool, tenant_id: &str, id: &str) -> Result<Contact> {
    sqlx::query_as::<_, Contact>(
        r#"
        SELECT id, tenant_id, name, phone, created_at
        FROM contacts
        WHERE tenant_id = ? AND id = ?
        "#,
    )
    .bind(tenant_id)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Contact",
        id: id.to_string(),
    })
}

/// Get a contact by canonical phone number.
pub async fn get_contact_by_phone(
    pool: &SqlitePool,
    tenant_id: &str,
    phone: &str,
) -> Result<Option<Contact>> {
    let contact = sqlx::query_as::<_, Contact>(
        r#"
        SELECT id, tenant_id, name, phone, created_at
        FROM contacts
        WHERE tenant_id = ? AND phone = ?
        "#,
    )
    .bind(tenant_id)
    .bind(phone)
    .fetch_optional(pool)
    .await?;

    Ok(contact)
}

/// Count contacts for a tenant.
pub async fn count_contacts(pool: &SqlitePool, tenant_id: &str) -> Result<i64> {
    let count: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM contacts WHERE tenant_id = ?
        "#,
    )
    .bind(tenant_id)
    .fetch_one(pool)
    .await?;

    Ok(count.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn upsert_creates_then_reuses() {
        let db = test_db().await;

        let first = upsert_contact(db.pool(), "t1", "5511999998888", "Maria")
            .await
            .unwrap();
        assert_eq!(first.phone, "5511999998888");
        assert_eq!(first.name, "Maria");

        let second = upsert_contact(db.pool(), "t1", "5511999998888", "Other Name")
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.name, "Maria");

        assert_eq!(count_contacts(db.pool(), "t1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn upsert_backfills_empty_name() {
        let db = test_db().await;

        let first = upsert_contact(db.pool(), "t1", "5511999998888", "")
            .await
            .unwrap();
        assert_eq!(first.name, "");

        let second = upsert_contact(db.pool(), "t1", "5511999998888", "Maria")
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.name, "Maria");
    }

    #[tokio::test]
    async fn same_phone_different_tenants_are_distinct() {
        let db = test_db().await;

        let a = upsert_contact(db.pool(), "t1", "5511999998888", "Maria")
            .await
            .unwrap();
        let b = upsert_contact(db.pool(), "t2", "5511999998888", "Maria")
            .await
            .unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn concurrent_first_contact_yields_one_row() {
        let db = test_db().await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let pool = db.pool().clone();
            handles.push(tokio::spawn(async move {
                upsert_contact(&pool, "t1", "5511987654321", "Jo\u{e3}o").await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }

        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(count_contacts(db.pool(), "t1").await.unwrap(), 1);
    }
}
