//! Route definitions for the API.

use axum::{
    routing::{get, post, put},
    Json, Router,
};

use super::handlers;
use super::SharedState;

/// Create the main API router
pub fn create_router(state: SharedState) -> Router {
    // Build the OpenAPI document once at startup
    let openapi = super::openapi::build_openapi();

    Router::new()
        // Health and observability (no gating)
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::health::metrics))
        .route(
            "/api-docs/openapi.json",
            get(move || {
                let doc = openapi.clone();
                async move { Json(doc) }
            }),
        )
        // User management
        .route("/users", post(handlers::users::create_user))
        // Permission management (admin only)
        .route("/permissions", post(handlers::permissions::create_permission))
        .route(
            "/permissions/:id",
            put(handlers::permissions::update_permission)
                .delete(handlers::permissions::delete_permission),
        )
        // Subscription plan management
        .route("/plans", post(handlers::plans::create_plan))
        .route(
            "/plans/:id",
            put(handlers::plans::update_plan).delete(handlers::plans::delete_plan),
        )
        // User subscription handling
        .route("/subscriptions", post(handlers::subscriptions::subscribe))
        .route(
            "/subscriptions/:user_id",
            get(handlers::subscriptions::get_subscription)
                .put(handlers::subscriptions::assign_plan),
        )
        .route(
            "/subscriptions/:user_id/usage",
            get(handlers::subscriptions::list_usage),
        )
        // Access control and usage tracking
        .route(
            "/access/:user_id/:api_request",
            get(handlers::access::check_access),
        )
        .route("/usage/:user_id", post(handlers::access::record_usage))
        .route("/usage/:user_id/limit", get(handlers::access::limit_status))
        // Stand-ins for the metered cloud services
        .route("/service1", get(handlers::cloud_services::service1))
        .route("/service2", get(handlers::cloud_services::service2))
        .route("/service3", get(handlers::cloud_services::service3))
        .route("/service4", get(handlers::cloud_services::service4))
        .route("/service5", get(handlers::cloud_services::service5))
        .route("/service6", get(handlers::cloud_services::service6))
        .with_state(state)
}
