//! Application error types and result alias.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::access_service::DenyReason;

/// Application result type alias
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Conflict error (duplicate unique field)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// Forbidden error (non-admin calling an admin operation)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Access denied by the evaluator, with the decision reason
    #[error("Access denied: {0}")]
    AccessDenied(DenyReason),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Address parse error
    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        AppError::Migration(e.to_string())
    }
}

/// Map a sqlx error to `Conflict` with the given message when it is a
/// unique-constraint violation, otherwise to `Database`.
pub fn on_unique_violation(e: sqlx::Error, conflict_msg: &str) -> AppError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => AppError::Conflict(conflict_msg.to_string()),
        _ => AppError::from(e),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::Config(msg) => {
                tracing::error!("configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Database(msg) => {
                tracing::error!("database error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Migration(msg) => {
                tracing::error!("migration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Io(e) => {
                tracing::error!("io error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::AddrParse(e) => {
                tracing::error!("address parse error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            // Duplicate unique fields surface as 400 on this API, not 409.
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::AccessDenied(reason) => (StatusCode::FORBIDDEN, reason.detail().to_string()),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_bad_request() {
        let resp = AppError::Conflict("Username already registered".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = AppError::NotFound("Plan not found.".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn forbidden_and_access_denied_map_to_403() {
        let resp = AppError::Forbidden("Admin access required.".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = AppError::AccessDenied(DenyReason::LimitReached).into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn database_errors_are_opaque_500s() {
        let resp = AppError::from(sqlx::Error::RowNotFound).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn non_unique_violations_stay_database_errors() {
        let err = on_unique_violation(sqlx::Error::RowNotFound, "should not appear");
        assert!(matches!(err, AppError::Database(_)));
    }
}
