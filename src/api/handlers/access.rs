//! Access control and usage tracking handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::api::dto::MessageResponse;
use crate::api::SharedState;
use crate::error::{AppError, Result};
use crate::services::access_service::AccessDecision;

/// OpenAPI paths and schemas contributed by this module
#[derive(OpenApi)]
#[openapi(
    paths(check_access, record_usage, limit_status),
    components(schemas(LimitStatusResponse))
)]
pub struct AccessApiDoc;

/// Metered API name carried in the query string
#[derive(Debug, Deserialize, IntoParams)]
pub struct RecordUsageQuery {
    pub api_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LimitStatusResponse {
    pub usage: i64,
    pub limit: i64,
}

/// Check whether a user may call an API, without recording usage
#[utoipa::path(
    get,
    path = "/access/{user_id}/{api_request}",
    tag = "access",
    params(
        ("user_id" = i64, Path, description = "User id"),
        ("api_request" = String, Path, description = "Requested API name"),
    ),
    responses(
        (status = 200, description = "Access granted", body = MessageResponse),
        (status = 403, description = "Access denied, with the reason as detail"),
    )
)]
pub async fn check_access(
    State(state): State<SharedState>,
    Path((user_id, api_request)): Path<(i64, String)>,
) -> Result<Json<MessageResponse>> {
    match state.access_service().evaluate(user_id, &api_request).await? {
        AccessDecision::Allowed { .. } => Ok(Json(MessageResponse::new("Access Granted."))),
        AccessDecision::Denied { reason } => Err(AppError::AccessDenied(reason)),
    }
}

/// Record one metered use of an API
#[utoipa::path(
    post,
    path = "/usage/{user_id}",
    tag = "access",
    params(
        ("user_id" = i64, Path, description = "User id"),
        RecordUsageQuery,
    ),
    responses(
        (status = 200, description = "Usage recorded", body = MessageResponse),
        (status = 403, description = "Access denied, with the reason as detail"),
    )
)]
pub async fn record_usage(
    State(state): State<SharedState>,
    Path(user_id): Path<i64>,
    Query(query): Query<RecordUsageQuery>,
) -> Result<Json<MessageResponse>> {
    state
        .access_service()
        .record_usage(user_id, &query.api_name)
        .await?;

    Ok(Json(MessageResponse::new("Usage recorded")))
}

/// Aggregate usage across all permissions against the plan limit
#[utoipa::path(
    get,
    path = "/usage/{user_id}/limit",
    tag = "access",
    params(("user_id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Usage snapshot", body = LimitStatusResponse),
        (status = 404, description = "No subscription or plan for the user"),
    )
)]
pub async fn limit_status(
    State(state): State<SharedState>,
    Path(user_id): Path<i64>,
) -> Result<Json<LimitStatusResponse>> {
    let status = state.access_service().limit_status(user_id).await?;

    Ok(Json(LimitStatusResponse {
        usage: status.total_usage,
        limit: status.limit,
    }))
}
