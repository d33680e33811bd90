//! Subscription management service.

use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::models::subscription::Subscription;

/// Subscription service: at most one active plan assignment per user.
pub struct SubscriptionService {
    db: PgPool,
}

impl SubscriptionService {
    /// Create a new subscription service
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Subscribe a user to a plan, replacing any existing assignment in place.
    ///
    /// Single-statement upsert keyed on the user: re-subscribing changes the
    /// plan on the existing row, never creates a second one. The plan id is
    /// deliberately not validated; a dangling plan shows up at evaluation time.
    pub async fn subscribe(&self, user_id: i64, plan_id: i64) -> Result<Subscription> {
        let sub = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (user_id, plan_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET plan_id = EXCLUDED.plan_id, updated_at = NOW()
            RETURNING id, user_id, plan_id, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_foreign_key_violation() => {
                AppError::NotFound("User not found.".to_string())
            }
            _ => AppError::from(e),
        })?;

        Ok(sub)
    }

    /// The user's current subscription, if any
    pub async fn get_by_user(&self, user_id: i64) -> Result<Option<Subscription>> {
        let sub = sqlx::query_as::<_, Subscription>(
            "SELECT id, user_id, plan_id, created_at, updated_at FROM subscriptions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(sub)
    }
}
