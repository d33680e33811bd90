//! Stub handlers standing in for the six metered cloud services.
//!
//! These carry no logic; real services would live behind their own deployments
//! and only their permission names matter to the engine.

use axum::Json;

use crate::api::dto::MessageResponse;

fn service_detail(n: u8) -> Json<MessageResponse> {
    Json(MessageResponse::new(format!("This is Cloud Service {n}")))
}

/// Cloud service 1
pub async fn service1() -> Json<MessageResponse> {
    service_detail(1)
}

/// Cloud service 2
pub async fn service2() -> Json<MessageResponse> {
    service_detail(2)
}

/// Cloud service 3
pub async fn service3() -> Json<MessageResponse> {
    service_detail(3)
}

/// Cloud service 4
pub async fn service4() -> Json<MessageResponse> {
    service_detail(4)
}

/// Cloud service 5
pub async fn service5() -> Json<MessageResponse> {
    service_detail(5)
}

/// Cloud service 6
pub async fn service6() -> Json<MessageResponse> {
    service_detail(6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_service_stub_responses() {
        let app = Router::new()
            .route("/service1", get(service1))
            .route("/service6", get(service6));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/service1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"detail":"This is Cloud Service 1"}"#);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/service6")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"detail":"This is Cloud Service 6"}"#);
    }
}
