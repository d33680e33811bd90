//! Access evaluation and usage recording.
//!
//! The evaluator resolves subscription -> plan -> permission set -> usage
//! counter and produces an allow/deny decision; the recorder increments the
//! ledger for the permission the evaluator matched.

use std::fmt;

use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::models::usage::UsageLog;
use crate::services::catalog_service::CatalogService;
use crate::services::metrics_service;
use crate::services::subscription_service::SubscriptionService;
use crate::services::usage_service::UsageService;

/// Why an access request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DenyReason {
    /// The user has no subscription
    NoSubscription,
    /// The subscription points at a plan that no longer exists
    PlanNotFound,
    /// The requested API is not part of the plan's permission set
    ApiNotInPlan,
    /// The matched permission's counter has reached the plan limit
    LimitReached,
}

impl DenyReason {
    /// Wire message for this reason
    pub fn detail(self) -> &'static str {
        match self {
            DenyReason::NoSubscription => "No subscription found.",
            DenyReason::PlanNotFound => "No plan found for user.",
            DenyReason::ApiNotInPlan => "Requested API not in plan permissions.",
            DenyReason::LimitReached => "Usage limit reached.",
        }
    }

    /// Stable label for metrics
    pub fn as_str(self) -> &'static str {
        match self {
            DenyReason::NoSubscription => "no_subscription",
            DenyReason::PlanNotFound => "plan_not_found",
            DenyReason::ApiNotInPlan => "api_not_in_plan",
            DenyReason::LimitReached => "limit_reached",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.detail())
    }
}

/// Outcome of evaluating one (user, requested API) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Request is authorized; `permission_id` is the matched catalog entry
    Allowed { permission_id: i64 },
    /// Request is denied for the given reason
    Denied { reason: DenyReason },
}

/// Aggregate usage snapshot against the plan's single cap
#[derive(Debug, Clone)]
pub struct LimitStatus {
    pub total_usage: i64,
    pub limit: i64,
}

/// Access evaluation service composing the catalog, subscription and usage stores
pub struct AccessService {
    catalog: CatalogService,
    subscriptions: SubscriptionService,
    usage: UsageService,
}

impl AccessService {
    /// Create a new access service on the shared pool
    pub fn new(db: PgPool) -> Self {
        Self {
            catalog: CatalogService::new(db.clone()),
            subscriptions: SubscriptionService::new(db.clone()),
            usage: UsageService::new(db),
        }
    }

    /// Decide whether `user_id` may call the API named `requested_api`.
    ///
    /// Read-only. Checks short-circuit in order: subscription, plan, plan
    /// membership, then the matched permission's own counter against the plan
    /// limit. The plan-wide aggregate lives in [`Self::limit_status`] and is
    /// not consulted here.
    pub async fn evaluate(&self, user_id: i64, requested_api: &str) -> Result<AccessDecision> {
        let decision = self.evaluate_inner(user_id, requested_api).await?;

        match &decision {
            AccessDecision::Allowed { .. } => {
                metrics_service::record_access_decision(true, None);
            }
            AccessDecision::Denied { reason } => {
                tracing::debug!(
                    user_id,
                    requested_api,
                    reason = reason.as_str(),
                    "access denied"
                );
                metrics_service::record_access_decision(false, Some(*reason));
            }
        }

        Ok(decision)
    }

    async fn evaluate_inner(&self, user_id: i64, requested_api: &str) -> Result<AccessDecision> {
        let Some(sub) = self.subscriptions.get_by_user(user_id).await? else {
            return Ok(AccessDecision::Denied {
                reason: DenyReason::NoSubscription,
            });
        };

        let Some(plan) = self.catalog.get_plan(sub.plan_id).await? else {
            return Ok(AccessDecision::Denied {
                reason: DenyReason::PlanNotFound,
            });
        };

        let permissions = self.catalog.permissions_for_plan(plan.id).await?;
        let Some(permission) = permissions.iter().find(|p| p.name == requested_api) else {
            return Ok(AccessDecision::Denied {
                reason: DenyReason::ApiNotInPlan,
            });
        };

        let current = self
            .usage
            .usage_for_permission(user_id, permission.id)
            .await?;
        if current >= plan.usage_limit {
            return Ok(AccessDecision::Denied {
                reason: DenyReason::LimitReached,
            });
        }

        Ok(AccessDecision::Allowed {
            permission_id: permission.id,
        })
    }

    /// Record one metered use of `api_name` by `user_id`.
    ///
    /// Re-evaluates access and fails with the evaluator's reason when denied,
    /// so usage can never be recorded for a denied call. When allowed, the
    /// ledger increment targets the permission id the evaluator matched: check
    /// and write work from one snapshot of the plan's permission set.
    /// Enforcement across the evaluate/increment pair stays best-effort under
    /// concurrent plan changes; the increment itself is atomic.
    pub async fn record_usage(&self, user_id: i64, api_name: &str) -> Result<UsageLog> {
        match self.evaluate(user_id, api_name).await? {
            AccessDecision::Denied { reason } => Err(AppError::AccessDenied(reason)),
            AccessDecision::Allowed { permission_id } => {
                let log = self.usage.increment(user_id, permission_id).await?;
                metrics_service::record_usage_recorded();
                tracing::info!(user_id, api_name, count = log.count, "usage recorded");
                Ok(log)
            }
        }
    }

    /// Aggregate usage across all permissions against the plan's single cap.
    ///
    /// Snapshot only; this is not the gate `evaluate` applies (that one checks
    /// the matched permission's own counter).
    pub async fn limit_status(&self, user_id: i64) -> Result<LimitStatus> {
        let sub = self
            .subscriptions
            .get_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No subscription found.".to_string()))?;

        let plan = self
            .catalog
            .get_plan(sub.plan_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No plan found.".to_string()))?;

        let total_usage = self.usage.total_usage(user_id).await?;

        Ok(LimitStatus {
            total_usage,
            limit: plan.usage_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deny_reason_wire_messages() {
        assert_eq!(DenyReason::NoSubscription.detail(), "No subscription found.");
        assert_eq!(DenyReason::PlanNotFound.detail(), "No plan found for user.");
        assert_eq!(
            DenyReason::ApiNotInPlan.detail(),
            "Requested API not in plan permissions."
        );
        assert_eq!(DenyReason::LimitReached.detail(), "Usage limit reached.");
    }

    #[test]
    fn deny_reason_metric_labels_are_stable() {
        assert_eq!(DenyReason::NoSubscription.as_str(), "no_subscription");
        assert_eq!(DenyReason::PlanNotFound.as_str(), "plan_not_found");
        assert_eq!(DenyReason::ApiNotInPlan.as_str(), "api_not_in_plan");
        assert_eq!(DenyReason::LimitReached.as_str(), "limit_reached");
    }

    #[test]
    fn display_matches_wire_message() {
        assert_eq!(
            DenyReason::LimitReached.to_string(),
            "Usage limit reached."
        );
    }

    #[test]
    fn decisions_compare_by_content() {
        assert_eq!(
            AccessDecision::Allowed { permission_id: 7 },
            AccessDecision::Allowed { permission_id: 7 }
        );
        assert_ne!(
            AccessDecision::Denied {
                reason: DenyReason::LimitReached
            },
            AccessDecision::Denied {
                reason: DenyReason::ApiNotInPlan
            }
        );
    }
}
