//! Usage ledger model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Running counter of calls made against one permission by one user.
///
/// One row per (user, permission) pair, created lazily on first use. The
/// count never decreases over the lifetime of the row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UsageLog {
    pub id: i64,
    pub user_id: i64,
    pub permission_id: i64,
    pub count: i64,
    pub updated_at: DateTime<Utc>,
}
