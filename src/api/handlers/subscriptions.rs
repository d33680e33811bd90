//! User subscription handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::api::SharedState;
use crate::error::{AppError, Result};
use crate::models::subscription::Subscription;

/// OpenAPI paths and schemas contributed by this module
#[derive(OpenApi)]
#[openapi(
    paths(subscribe, get_subscription, list_usage, assign_plan),
    components(schemas(SubscribeRequest, SubscriptionResponse, UsageEntry))
)]
pub struct SubscriptionsApiDoc;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubscribeRequest {
    pub user_id: i64,
    pub plan_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: i64,
    pub user_id: i64,
    pub plan_id: i64,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(sub: Subscription) -> Self {
        Self {
            id: sub.id,
            user_id: sub.user_id,
            plan_id: sub.plan_id,
        }
    }
}

/// One ledger row in a usage listing
#[derive(Debug, Serialize, ToSchema)]
pub struct UsageEntry {
    pub permission_id: i64,
    pub count: i64,
}

/// Admin plan assignment carried in the query string
#[derive(Debug, Deserialize, IntoParams)]
pub struct AssignPlanQuery {
    pub plan_id: i64,
    /// Id of the user performing the operation; must have the admin role
    pub admin_id: i64,
}

/// Subscribe to a plan (upsert; re-subscribing switches the plan in place)
#[utoipa::path(
    post,
    path = "/subscriptions",
    tag = "subscriptions",
    request_body = SubscribeRequest,
    responses(
        (status = 200, description = "Subscription created or updated", body = SubscriptionResponse),
        (status = 404, description = "User not found"),
    )
)]
pub async fn subscribe(
    State(state): State<SharedState>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<Json<SubscriptionResponse>> {
    let sub = state
        .subscription_service()
        .subscribe(payload.user_id, payload.plan_id)
        .await?;

    Ok(Json(sub.into()))
}

/// View a user's subscription
#[utoipa::path(
    get,
    path = "/subscriptions/{user_id}",
    tag = "subscriptions",
    params(("user_id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Current subscription", body = SubscriptionResponse),
        (status = 404, description = "No subscription found"),
    )
)]
pub async fn get_subscription(
    State(state): State<SharedState>,
    Path(user_id): Path<i64>,
) -> Result<Json<SubscriptionResponse>> {
    let sub = state
        .subscription_service()
        .get_by_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No subscription found.".to_string()))?;

    Ok(Json(sub.into()))
}

/// View a user's per-permission usage counters
#[utoipa::path(
    get,
    path = "/subscriptions/{user_id}/usage",
    tag = "subscriptions",
    params(("user_id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Usage counters, one per permission", body = [UsageEntry]),
    )
)]
pub async fn list_usage(
    State(state): State<SharedState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<UsageEntry>>> {
    let entries = state
        .usage_service()
        .usage_for_user(user_id)
        .await?
        .into_iter()
        .map(|log| UsageEntry {
            permission_id: log.permission_id,
            count: log.count,
        })
        .collect();

    Ok(Json(entries))
}

/// Assign or change a user's plan (admin only)
#[utoipa::path(
    put,
    path = "/subscriptions/{user_id}",
    tag = "subscriptions",
    params(
        ("user_id" = i64, Path, description = "User id"),
        AssignPlanQuery,
    ),
    responses(
        (status = 200, description = "Subscription created or updated", body = SubscriptionResponse),
        (status = 403, description = "Caller is not an admin"),
    )
)]
pub async fn assign_plan(
    State(state): State<SharedState>,
    Path(user_id): Path<i64>,
    Query(query): Query<AssignPlanQuery>,
) -> Result<Json<SubscriptionResponse>> {
    state.authorizer.require_admin(query.admin_id).await?;

    let sub = state
        .subscription_service()
        .subscribe(user_id, query.plan_id)
        .await?;

    Ok(Json(sub.into()))
}
