//! Subscription plan handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::api::dto::{AdminQuery, MessageResponse};
use crate::api::SharedState;
use crate::error::Result;
use crate::models::plan::Plan;
use crate::services::catalog_service::PlanInput;

/// OpenAPI paths and schemas contributed by this module
#[derive(OpenApi)]
#[openapi(
    paths(create_plan, update_plan, delete_plan),
    components(schemas(PlanRequest, PlanResponse))
)]
pub struct PlansApiDoc;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlanRequest {
    pub name: String,
    pub description: String,
    pub usage_limit: i64,
    pub permission_ids: Vec<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub usage_limit: i64,
    /// Ids of the permissions bundled in this plan
    pub permissions: Vec<i64>,
}

fn plan_response((plan, permission_ids): (Plan, Vec<i64>)) -> PlanResponse {
    PlanResponse {
        id: plan.id,
        name: plan.name,
        description: plan.description,
        usage_limit: plan.usage_limit,
        permissions: permission_ids,
    }
}

/// Create plan
#[utoipa::path(
    post,
    path = "/plans",
    tag = "plans",
    params(AdminQuery),
    request_body = PlanRequest,
    responses(
        (status = 201, description = "Plan created", body = PlanResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "A listed permission id does not exist"),
    )
)]
pub async fn create_plan(
    State(state): State<SharedState>,
    Query(query): Query<AdminQuery>,
    Json(payload): Json<PlanRequest>,
) -> Result<(StatusCode, Json<PlanResponse>)> {
    state.authorizer.require_admin(query.admin_id).await?;

    let created = state
        .catalog_service()
        .create_plan(PlanInput {
            name: payload.name,
            description: payload.description,
            usage_limit: payload.usage_limit,
            permission_ids: payload.permission_ids,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(plan_response(created))))
}

/// Update plan, replacing its entire permission set
#[utoipa::path(
    put,
    path = "/plans/{id}",
    tag = "plans",
    params(
        ("id" = i64, Path, description = "Plan id"),
        AdminQuery,
    ),
    request_body = PlanRequest,
    responses(
        (status = 200, description = "Plan updated", body = PlanResponse),
        (status = 404, description = "Plan not found"),
    )
)]
pub async fn update_plan(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Query(query): Query<AdminQuery>,
    Json(payload): Json<PlanRequest>,
) -> Result<Json<PlanResponse>> {
    // admin_id is accepted but not enforced on this route.
    tracing::debug!(plan_id = id, admin_id = query.admin_id, "updating plan");

    let updated = state
        .catalog_service()
        .update_plan(
            id,
            PlanInput {
                name: payload.name,
                description: payload.description,
                usage_limit: payload.usage_limit,
                permission_ids: payload.permission_ids,
            },
        )
        .await?;

    Ok(Json(plan_response(updated)))
}

/// Delete plan
#[utoipa::path(
    delete,
    path = "/plans/{id}",
    tag = "plans",
    params(
        ("id" = i64, Path, description = "Plan id"),
        AdminQuery,
    ),
    responses(
        (status = 200, description = "Plan deleted", body = MessageResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Plan not found"),
    )
)]
pub async fn delete_plan(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Query(query): Query<AdminQuery>,
) -> Result<Json<MessageResponse>> {
    state.authorizer.require_admin(query.admin_id).await?;
    state.catalog_service().delete_plan(id).await?;

    Ok(Json(MessageResponse::new("Plan deleted")))
}
