//! Usage ledger service.
//!
//! Maintains one monotonically increasing counter per (user, permission) pair.

use sqlx::PgPool;

use crate::error::Result;
use crate::models::usage::UsageLog;

/// Usage ledger service
pub struct UsageService {
    db: PgPool,
}

impl UsageService {
    /// Create a new usage ledger service
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Increment the counter for one (user, permission) key by exactly one.
    ///
    /// The row is created lazily on first use. Insert-or-increment runs as a
    /// single conditional upsert, so concurrent calls on the same key cannot
    /// lose an update.
    pub async fn increment(&self, user_id: i64, permission_id: i64) -> Result<UsageLog> {
        let log = sqlx::query_as::<_, UsageLog>(
            r#"
            INSERT INTO usage_logs (user_id, permission_id, count)
            VALUES ($1, $2, 1)
            ON CONFLICT (user_id, permission_id)
            DO UPDATE SET count = usage_logs.count + 1, updated_at = NOW()
            RETURNING id, user_id, permission_id, count, updated_at
            "#,
        )
        .bind(user_id)
        .bind(permission_id)
        .fetch_one(&self.db)
        .await?;

        Ok(log)
    }

    /// All ledger rows for a user. No ordering guarantee.
    pub async fn usage_for_user(&self, user_id: i64) -> Result<Vec<UsageLog>> {
        let logs = sqlx::query_as::<_, UsageLog>(
            "SELECT id, user_id, permission_id, count, updated_at FROM usage_logs WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(logs)
    }

    /// Current counter for one (user, permission) key; zero before first use.
    pub async fn usage_for_permission(&self, user_id: i64, permission_id: i64) -> Result<i64> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT count FROM usage_logs WHERE user_id = $1 AND permission_id = $2",
        )
        .bind(user_id)
        .bind(permission_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(count.unwrap_or(0))
    }

    /// Sum of all counters for a user across permissions
    pub async fn total_usage(&self, user_id: i64) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(count), 0)::BIGINT FROM usage_logs WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(total)
    }
}
