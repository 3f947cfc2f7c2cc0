//! Owner assignment policy.
//!
//! New deals go to an online profile when one exists, otherwise to any
//! existing profile, rotating by least-recently-assigned in both groups. A
//! tenant with no profiles gets ownerless deals rather than a failure.

use sqlx::SqlitePool;
use tracing::{debug, warn};

use database::profile;

use crate::error::Result;

/// Choose and record the owner for a newly opened deal.
pub async fn assign_owner(pool: &SqlitePool, tenant_id: &str) -> Result<Option<String>> {
    let picked = match profile::pick_owner(pool, tenant_id).await? {
        Some(profile) => profile,
        None => {
            debug!(tenant_id, "No profiles exist; deal will be ownerless");
            return Ok(None);
        }
    };

    // Recording the assignment keeps the rotation fair; losing the record
    // only skews fairness, so it does not fail the event.
    if let Err(e) = profile::mark_assigned(pool, tenant_id, &picked.id).await {
        warn!(tenant_id, profile_id = %picked.id, error = %e, "Failed to record owner assignment");
    }

    debug!(tenant_id, profile_id = %picked.id, online = picked.online, "Owner assigned");
    Ok(Some(picked.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::{profile, Database};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn assigns_and_records() {
        let db = test_db().await;
        let p = profile::create_profile(db.pool(), "t1", "Ana", true)
            .await
            .unwrap();

        let owner = assign_owner(db.pool(), "t1").await.unwrap();
        assert_eq!(owner.as_deref(), Some(p.id.as_str()));

        // The assignment must have been recorded for rotation.
        let picked = profile::pick_owner(db.pool(), "t1").await.unwrap().unwrap();
        assert!(picked.last_assigned_at.is_some() || picked.id != p.id);
    }

    #[tokio::test]
    async fn no_profiles_means_no_owner() {
        let db = test_db().await;
        assert_eq!(assign_owner(db.pool(), "t1").await.unwrap(), None);
    }
}
