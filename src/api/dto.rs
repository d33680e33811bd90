//! Shared Data Transfer Objects (DTOs) for API handlers.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Plain `{"detail": ...}` acknowledgement body
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable outcome message
    pub detail: String,
}

impl MessageResponse {
    /// Build a message response from any string-ish value
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Admin credential carried in the query string of admin-gated requests
#[derive(Debug, Deserialize, IntoParams)]
pub struct AdminQuery {
    /// Id of the user performing the operation; must have the admin role
    pub admin_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_response_shape() {
        let json = serde_json::to_string(&MessageResponse::new("Usage recorded")).unwrap();
        assert_eq!(json, "{\"detail\":\"Usage recorded\"}");
    }
}
