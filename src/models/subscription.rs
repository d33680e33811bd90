//! Subscription model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// The single active plan assignment for a user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub plan_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
