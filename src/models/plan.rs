//! Subscription plan model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A named bundle of permissions sharing one cumulative usage cap.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Plan {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub usage_limit: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
