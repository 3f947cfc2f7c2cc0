//! Deal (conversation) queries.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{Deal, NewDeal};

const DEAL_COLUMNS: &str = "id, tenant_id, contact_id, owner_id, stage_id, \
                            status, title, value, last_activity_at, created_at";

/// Find the contact's most recently opened deal that is still `open`.
pub async fn find_open_deal(
    pool: &SqlitePool,
    tenant_id: &str,
    contact_id: &str,
) -> Result<Option<Deal>> {
    let deal = sqlx::query_as::<_, Deal>(&format!(
        r#"
        SELECT {DEAL_COLUMNS}
        FROM deals
        WHERE tenant_id = ? AND contact_id = ? AND status = 'open'
        ORDER BY created_at DESC, rowid DESC
        LIMIT 1
        "#
    ))
    .bind(tenant_id)
    .bind(contact_id)
    .fetch_optional(pool)
    .await?;

    Ok(deal)
}

/// Open a new deal with status `open` and zero value.
pub async fn create_deal(pool: &SqlitePool, deal: &NewDeal) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO deals (id, tenant_id, contact_id, owner_id, stage_id, status, title, value)
        VALUES (?, ?, ?, ?, ?, 'open', ?, 0)
        "#,
    )
    .bind(&deal.id)
    .bind(&deal.tenant_id)
    .bind(&deal.contact_id)
    .bind(&deal.owner_id)
    .bind(&deal.stage_id)
    .bind(&deal.title)
    .execute(pool)
    .await?;

    Ok(())
}

/// Bump a deal's last-activity timestamp.
///
/// Callers treat failure here as non-fatal; an inbound message must not be
/// dropped because the activity bump failed.
pub async fn touch_deal(pool: &SqlitePool, tenant_id: &str, deal_id: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE deals
        SET last_activity_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
        WHERE tenant_id = ? AND id = ?
        "#,
    )
    .bind(tenant_id)
    .bind(deal_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a deal by ID.
pub async fn get_deal(pool: &SqlitePool, tenant_id: &str, id: &str) -> Result<Option<Deal>> {
    let deal = sqlx::query_as::<_, Deal>(&format!(
        r#"
        SELECT {DEAL_COLUMNS}
        FROM deals
        WHERE tenant_id = ? AND id = ?
        "#
    ))
    .bind(tenant_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(deal)
}

/// Count deals for a contact, regardless of status.
pub async fn count_deals_for_contact(
    pool: &SqlitePool,
    tenant_id: &str,
    contact_id: &str,
) -> Result<i64> {
    let count: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM deals WHERE tenant_id = ? AND contact_id = ?
        "#,
    )
    .bind(tenant_id)
    .bind(contact_id)
    .fetch_one(pool)
    .await?;

    Ok(count.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DealStatus;
    use crate::{contact, stage, Database};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn seed_stage(db: &Database, tenant: &str) -> String {
        let pipeline_id = stage::create_pipeline(db.pool(), tenant, "Vendas", true)
            .await
            .unwrap();
        stage::create_stage(db.pool(), tenant, &pipeline_id, "Novo Lead", 1)
            .await
            .unwrap()
            .id
    }

    fn new_deal(tenant: &str, contact_id: &str, stage_id: &str) -> NewDeal {
        NewDeal {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: tenant.to_string(),
            contact_id: contact_id.to_string(),
            owner_id: None,
            stage_id: stage_id.to_string(),
            title: "Conversa com Maria".to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_find_open() {
        let db = test_db().await;
        let stage_id = seed_stage(&db, "t1").await;
        let contact = contact::upsert_contact(db.pool(), "t1", "5511999998888", "Maria")
            .await
            .unwrap();

        assert!(find_open_deal(db.pool(), "t1", &contact.id)
            .await
            .unwrap()
            .is_none());

        let deal = new_deal("t1", &contact.id, &stage_id);
        create_deal(db.pool(), &deal).await.unwrap();

        let found = find_open_deal(db.pool(), "t1", &contact.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, deal.id);
        assert_eq!(found.status, DealStatus::Open);
        assert_eq!(found.value, 0.0);
    }

    #[tokio::test]
    async fn touch_advances_last_activity() {
        let db = test_db().await;
        let stage_id = seed_stage(&db, "t1").await;
        let contact = contact::upsert_contact(db.pool(), "t1", "5511999998888", "Maria")
            .await
            .unwrap();

        let deal = new_deal("t1", &contact.id, &stage_id);
        create_deal(db.pool(), &deal).await.unwrap();

        let before = get_deal(db.pool(), "t1", &deal.id)
            .await
            .unwrap()
            .unwrap()
            .last_activity_at;

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        touch_deal(db.pool(), "t1", &deal.id).await.unwrap();

        let after = get_deal(db.pool(), "t1", &deal.id)
            .await
            .unwrap()
            .unwrap()
            .last_activity_at;
        assert!(after > before, "expected {after} > {before}");
    }
}
