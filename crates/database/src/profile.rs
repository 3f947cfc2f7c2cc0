//! Owner-candidate profiles and the assignment ordering.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Profile;

/// Create a profile.
pub async fn create_profile(
    pool: &SqlitePool,
    tenant_id: &str,
    name: &str,
    online: bool,
) -> Result<Profile> {
    let profile = Profile {
        id: Uuid::new_v4().to_string(),
        tenant_id: tenant_id.to_string(),
        name: name.to_string(),
        online,
        last_assigned_at: None,
    };

    sqlx::query(
        r#"
        INSERT INTO profiles (id, tenant_id, name, online)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&profile.id)
    .bind(&profile.tenant_id)
    .bind(&profile.name)
    .bind(profile.online)
    .execute(pool)
    .await?;

    Ok(profile)
}

/// Set a profile's online flag.
pub async fn set_online(pool: &SqlitePool, tenant_id: &str, id: &str, online: bool) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE profiles SET online = ? WHERE tenant_id = ? AND id = ?
        "#,
    )
    .bind(online)
    .bind(tenant_id)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Pick the owner candidate for a newly opened deal.
///
/// Online profiles come first; within each group the ordering is
/// least-recently-assigned, with never-assigned profiles ahead of everyone.
/// Returns `None` when the tenant has no profiles at all.
pub async fn pick_owner(pool: &SqlitePool, tenant_id: &str) -> Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, tenant_id, name, online, last_assigned_at
        FROM profiles
        WHERE tenant_id = ?
        ORDER BY online DESC,
                 last_assigned_at IS NOT NULL,
                 last_assigned_at ASC
        LIMIT 1
        "#,
    )
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

/// Record that a profile just received a deal.
pub async fn mark_assigned(pool: &SqlitePool, tenant_id: &str, id: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE profiles
        SET last_assigned_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
        WHERE tenant_id = ? AND id = ?
        "#,
    )
    .bind(tenant_id)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
