//! Permission catalog handlers (admin only).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::api::dto::{AdminQuery, MessageResponse};
use crate::api::SharedState;
use crate::error::Result;
use crate::models::permission::Permission;
use crate::services::catalog_service::PermissionInput;

/// OpenAPI paths and schemas contributed by this module
#[derive(OpenApi)]
#[openapi(
    paths(create_permission, update_permission, delete_permission),
    components(schemas(CreatePermissionRequest, PermissionResponse, MessageResponse))
)]
pub struct PermissionsApiDoc;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePermissionRequest {
    pub name: String,
    pub api_endpoint: String,
    pub description: String,
}

/// Query-string form of a permission update
#[derive(Debug, Deserialize, IntoParams)]
pub struct UpdatePermissionQuery {
    pub name: String,
    pub api_endpoint: String,
    pub description: String,
    /// Id of the user performing the operation; must have the admin role
    pub admin_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionResponse {
    pub id: i64,
    pub name: String,
    pub api_endpoint: String,
    pub description: String,
}

impl From<Permission> for PermissionResponse {
    fn from(perm: Permission) -> Self {
        Self {
            id: perm.id,
            name: perm.name,
            api_endpoint: perm.api_endpoint,
            description: perm.description,
        }
    }
}

/// Create permission
#[utoipa::path(
    post,
    path = "/permissions",
    tag = "permissions",
    params(AdminQuery),
    request_body = CreatePermissionRequest,
    responses(
        (status = 201, description = "Permission created", body = PermissionResponse),
        (status = 403, description = "Caller is not an admin"),
    )
)]
pub async fn create_permission(
    State(state): State<SharedState>,
    Query(query): Query<AdminQuery>,
    Json(payload): Json<CreatePermissionRequest>,
) -> Result<(StatusCode, Json<PermissionResponse>)> {
    state.authorizer.require_admin(query.admin_id).await?;

    let perm = state
        .catalog_service()
        .create_permission(PermissionInput {
            name: payload.name,
            api_endpoint: payload.api_endpoint,
            description: payload.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(perm.into())))
}

/// Update permission
#[utoipa::path(
    put,
    path = "/permissions/{id}",
    tag = "permissions",
    params(
        ("id" = i64, Path, description = "Permission id"),
        UpdatePermissionQuery,
    ),
    responses(
        (status = 200, description = "Permission updated", body = PermissionResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Permission not found"),
    )
)]
pub async fn update_permission(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Query(query): Query<UpdatePermissionQuery>,
) -> Result<Json<PermissionResponse>> {
    state.authorizer.require_admin(query.admin_id).await?;

    let perm = state
        .catalog_service()
        .update_permission(
            id,
            PermissionInput {
                name: query.name,
                api_endpoint: query.api_endpoint,
                description: query.description,
            },
        )
        .await?;

    Ok(Json(perm.into()))
}

/// Delete permission
#[utoipa::path(
    delete,
    path = "/permissions/{id}",
    tag = "permissions",
    params(
        ("id" = i64, Path, description = "Permission id"),
        AdminQuery,
    ),
    responses(
        (status = 200, description = "Permission deleted", body = MessageResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Permission not found"),
    )
)]
pub async fn delete_permission(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Query(query): Query<AdminQuery>,
) -> Result<Json<MessageResponse>> {
    state.authorizer.require_admin(query.admin_id).await?;
    state.catalog_service().delete_permission(id).await?;

    Ok(Json(MessageResponse::new("Permission deleted")))
}
