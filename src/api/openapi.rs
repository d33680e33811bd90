//! OpenAPI specification generated from handler annotations via utoipa.

use utoipa::OpenApi;

/// Top-level OpenAPI document for the QuotaGate API.
///
/// Each handler module contributes its own paths and schemas via per-module
/// `#[derive(OpenApi)]` structs that are merged into this root document at
/// startup.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "QuotaGate API",
        description = "Subscription-based access control and usage metering for cloud service APIs.",
        version = "0.1.0",
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "users", description = "User management"),
        (name = "permissions", description = "Permission catalog management"),
        (name = "plans", description = "Subscription plan management"),
        (name = "subscriptions", description = "User subscription handling"),
        (name = "access", description = "Access control and usage tracking"),
    ),
    components(schemas(ErrorResponse))
)]
pub struct ApiDoc;

/// Standard error response body returned by all endpoints on failure.
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub detail: String,
}

/// Build the merged OpenAPI document from all handler modules.
pub fn build_openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();

    doc.merge(super::handlers::users::UsersApiDoc::openapi());
    doc.merge(super::handlers::permissions::PermissionsApiDoc::openapi());
    doc.merge(super::handlers::plans::PlansApiDoc::openapi());
    doc.merge(super::handlers::subscriptions::SubscriptionsApiDoc::openapi());
    doc.merge(super::handlers::access::AccessApiDoc::openapi());

    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_document_covers_the_public_surface() {
        let doc = build_openapi();
        let paths = &doc.paths.paths;

        for expected in [
            "/users",
            "/permissions",
            "/permissions/{id}",
            "/plans",
            "/plans/{id}",
            "/subscriptions",
            "/subscriptions/{user_id}",
            "/subscriptions/{user_id}/usage",
            "/access/{user_id}/{api_request}",
            "/usage/{user_id}",
            "/usage/{user_id}/limit",
        ] {
            assert!(paths.contains_key(expected), "missing path {expected}");
        }
    }
}
