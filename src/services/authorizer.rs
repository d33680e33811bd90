//! Admin authorization capability.
//!
//! Admin-gated requests carry the caller's user id; there is no token or
//! session verification. The check sits behind a trait so a real auth layer
//! can replace the implementation without touching handlers or the evaluator.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::models::user::Role;

/// Capability deciding whether a caller may perform admin operations
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Fail with `Forbidden` unless `admin_id` names an admin user
    async fn require_admin(&self, admin_id: i64) -> Result<()>;
}

/// Authorizer backed by the users table
pub struct DbAuthorizer {
    db: PgPool,
}

impl DbAuthorizer {
    /// Create a new database-backed authorizer
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Authorizer for DbAuthorizer {
    async fn require_admin(&self, admin_id: i64) -> Result<()> {
        let role: Option<Role> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
            .bind(admin_id)
            .fetch_optional(&self.db)
            .await?;

        match role {
            Some(Role::Admin) => Ok(()),
            _ => Err(AppError::Forbidden("Admin access required.".to_string())),
        }
    }
}
