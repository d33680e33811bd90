//! Permission and plan catalog service.
//!
//! CRUD for the permission catalog and subscription plans, including the
//! transactional full-replace of a plan's permission set.

use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{on_unique_violation, AppError, Result};
use crate::models::permission::Permission;
use crate::models::plan::Plan;

/// Fields of a permission, used for both create and in-place update
#[derive(Debug)]
pub struct PermissionInput {
    pub name: String,
    pub api_endpoint: String,
    pub description: String,
}

/// Fields of a plan plus its full permission set, used for both create and update
#[derive(Debug)]
pub struct PlanInput {
    pub name: String,
    pub description: String,
    pub usage_limit: i64,
    pub permission_ids: Vec<i64>,
}

/// Catalog service
pub struct CatalogService {
    db: PgPool,
}

impl CatalogService {
    /// Create a new catalog service
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a new permission
    pub async fn create_permission(&self, req: PermissionInput) -> Result<Permission> {
        let perm = sqlx::query_as::<_, Permission>(
            r#"
            INSERT INTO permissions (name, api_endpoint, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, api_endpoint, description, created_at
            "#,
        )
        .bind(&req.name)
        .bind(&req.api_endpoint)
        .bind(&req.description)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            on_unique_violation(e, &format!("Permission '{}' already exists", req.name))
        })?;

        Ok(perm)
    }

    /// Update a permission in place
    pub async fn update_permission(&self, id: i64, req: PermissionInput) -> Result<Permission> {
        sqlx::query_as::<_, Permission>(
            r#"
            UPDATE permissions
            SET name = $2, api_endpoint = $3, description = $4
            WHERE id = $1
            RETURNING id, name, api_endpoint, description, created_at
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.api_endpoint)
        .bind(&req.description)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| on_unique_violation(e, &format!("Permission '{}' already exists", req.name)))?
        .ok_or_else(|| AppError::NotFound("Permission not found.".to_string()))
    }

    /// Delete a permission.
    ///
    /// Plan links go with it; usage ledger rows are retained.
    pub async fn delete_permission(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Permission not found.".to_string()));
        }

        Ok(())
    }

    /// Create a plan and link its permission set in one transaction.
    pub async fn create_plan(&self, req: PlanInput) -> Result<(Plan, Vec<i64>)> {
        let mut tx = self.db.begin().await?;

        let plan = sqlx::query_as::<_, Plan>(
            r#"
            INSERT INTO plans (name, description, usage_limit)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, usage_limit, created_at, updated_at
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.usage_limit)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| on_unique_violation(e, &format!("Plan '{}' already exists", req.name)))?;

        let ids = Self::replace_links(&mut tx, plan.id, &req.permission_ids).await?;
        tx.commit().await?;

        Ok((plan, ids))
    }

    /// Update a plan and replace its entire permission set in one transaction.
    ///
    /// Full-replace semantics: the previous links are dropped and the new set
    /// inserted with all-or-nothing visibility, so a concurrent access
    /// evaluation never observes a transiently empty permission set.
    pub async fn update_plan(&self, id: i64, req: PlanInput) -> Result<(Plan, Vec<i64>)> {
        let mut tx = self.db.begin().await?;

        let plan = sqlx::query_as::<_, Plan>(
            r#"
            UPDATE plans
            SET name = $2, description = $3, usage_limit = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, usage_limit, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.usage_limit)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| on_unique_violation(e, &format!("Plan '{}' already exists", req.name)))?
        .ok_or_else(|| AppError::NotFound("Plan not found.".to_string()))?;

        let ids = Self::replace_links(&mut tx, plan.id, &req.permission_ids).await?;
        tx.commit().await?;

        Ok((plan, ids))
    }

    /// Delete a plan and its permission links.
    ///
    /// Subscriptions pointing at the plan are left in place; access evaluation
    /// for those users reports the missing plan from then on.
    pub async fn delete_plan(&self, id: i64) -> Result<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM plan_permissions WHERE plan_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM plans WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Plan not found.".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Fetch a plan by id
    pub async fn get_plan(&self, id: i64) -> Result<Option<Plan>> {
        let plan = sqlx::query_as::<_, Plan>(
            "SELECT id, name, description, usage_limit, created_at, updated_at FROM plans WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(plan)
    }

    /// Permission ids linked to a plan. Unknown plan ids yield an empty list.
    pub async fn plan_permission_ids(&self, plan_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT permission_id FROM plan_permissions WHERE plan_id = $1 ORDER BY permission_id",
        )
        .bind(plan_id)
        .fetch_all(&self.db)
        .await?;

        Ok(ids)
    }

    /// Full permission rows for a plan's permission set
    pub async fn permissions_for_plan(&self, plan_id: i64) -> Result<Vec<Permission>> {
        let perms = sqlx::query_as::<_, Permission>(
            r#"
            SELECT p.id, p.name, p.api_endpoint, p.description, p.created_at
            FROM permissions p
            JOIN plan_permissions pp ON pp.permission_id = p.id
            WHERE pp.plan_id = $1
            "#,
        )
        .bind(plan_id)
        .fetch_all(&self.db)
        .await?;

        Ok(perms)
    }

    /// Replace a plan's links inside the caller's transaction.
    ///
    /// Every id must name an existing permission; duplicates in the input
    /// collapse onto the composite key. Returns the resulting link set.
    async fn replace_links(
        tx: &mut Transaction<'_, Postgres>,
        plan_id: i64,
        permission_ids: &[i64],
    ) -> Result<Vec<i64>> {
        sqlx::query("DELETE FROM plan_permissions WHERE plan_id = $1")
            .bind(plan_id)
            .execute(&mut **tx)
            .await?;

        if permission_ids.is_empty() {
            return Ok(Vec::new());
        }

        let known: Vec<i64> = sqlx::query_scalar("SELECT id FROM permissions WHERE id = ANY($1)")
            .bind(permission_ids)
            .fetch_all(&mut **tx)
            .await?;
        let missing: Vec<i64> = permission_ids
            .iter()
            .copied()
            .filter(|id| !known.contains(id))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::NotFound(format!(
                "Permission ids not found: {missing:?}"
            )));
        }

        for pid in permission_ids {
            sqlx::query(
                r#"
                INSERT INTO plan_permissions (plan_id, permission_id)
                VALUES ($1, $2)
                ON CONFLICT (plan_id, permission_id) DO NOTHING
                "#,
            )
            .bind(plan_id)
            .bind(pid)
            .execute(&mut **tx)
            .await?;
        }

        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT permission_id FROM plan_permissions WHERE plan_id = $1 ORDER BY permission_id",
        )
        .bind(plan_id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(ids)
    }
}
