//! Pipeline and stage queries.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Stage;

/// Create a pipeline and return its ID.
pub async fn create_pipeline(
    pool: &SqlitePool,
    tenant_id: &str,
    name: &str,
    is_default: bool,
) -> Result<String> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO pipelines (id, tenant_id, name, is_default)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(tenant_id)
    .bind(name)
    .bind(is_default)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Create a stage in a pipeline.
pub async fn create_stage(
    pool: &SqlitePool,
    tenant_id: &str,
    pipeline_id: &str,
    name: &str,
    position: i64,
) -> Result<Stage> {
    let stage = Stage {
        id: Uuid::new_v4().to_string(),
        tenant_id: tenant_id.to_string(),
        pipeline_id: pipeline_id.to_string(),
        name: name.to_string(),
        position,
    };

    sqlx::query(
        r#"
        INSERT INTO stages (id, tenant_id, pipeline_id, name, position)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&stage.id)
    .bind(&stage.tenant_id)
    .bind(&stage.pipeline_id)
    .bind(&stage.name)
    .bind(stage.position)
    .execute(pool)
    .await?;

    Ok(stage)
}

/// First stage (position 1) of the tenant's default pipeline.
///
/// The lookup is tenant-scoped; a tenant without a default pipeline or
/// without a position-1 stage gets `None`, which callers treat as a fatal
/// configuration error.
pub async fn first_stage(pool: &SqlitePool, tenant_id: &str) -> Result<Option<Stage>> {
    let stage = sqlx::query_as::<_, Stage>(
        r#"
        SELECT s.id, s.tenant_id, s.pipeline_id, s.name, s.position
        FROM stages s
        JOIN pipelines p ON p.id = s.pipeline_id
        WHERE s.tenant_id = ? AND p.is_default = 1 AND s.position = 1
        LIMIT 1
        "#,
    )
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?;

    Ok(stage)
}
