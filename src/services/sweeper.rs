use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::services::error::BannerError;

/// Housekeeping for banners whose end time has passed: the resolver never
/// returns them anyway, but leaving them flagged active is stale data.
pub struct SweeperService;

impl SweeperService {
    /// Flip every still-active banner with `end_datetime < now` to inactive.
    /// One batch UPDATE, idempotent. Only the active flag changes.
    pub async fn disable_expired(
        pool: &SqlitePool,
        now: DateTime<Utc>,
    ) -> Result<u64, BannerError> {
        let result = sqlx::query(
            "UPDATE banners
             SET active = 0
             WHERE active = 1 AND end_datetime IS NOT NULL AND end_datetime < ?",
        )
        .bind(now)
        .execute(pool)
        .await?;

        let disabled = result.rows_affected();
        if disabled > 0 {
            tracing::info!("Disabled {} expired banner(s)", disabled);
        }
        Ok(disabled)
    }
}
