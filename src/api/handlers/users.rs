//! User management handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::api::SharedState;
use crate::error::{on_unique_violation, Result};
use crate::models::user::{Role, User};

/// OpenAPI paths and schemas contributed by this module
#[derive(OpenApi)]
#[openapi(
    paths(create_user),
    components(schemas(CreateUserRequest, UserResponse, Role))
)]
pub struct UsersApiDoc;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Create user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Username already registered"),
    )
)]
pub async fn create_user(
    State(state): State<SharedState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, role)
        VALUES ($1, $2)
        RETURNING id, username, role, created_at
        "#,
    )
    .bind(&payload.username)
    .bind(payload.role)
    .fetch_one(&state.db)
    .await
    .map_err(|e| on_unique_violation(e, "Username already registered"))?;

    tracing::info!(user_id = user.id, username = %user.username, "user created");

    Ok((StatusCode::CREATED, Json(user.into())))
}
