//! Permission catalog model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A named, meterable API capability.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub api_endpoint: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
