//! HTTP integration tests for the QuotaGate backend.
//!
//! These tests require a running backend HTTP server.
//! Set the TEST_BASE_URL environment variable to specify the server URL.
//!
//! Example:
//! ```sh
//! export TEST_BASE_URL="http://127.0.0.1:8080"
//! cargo test --test integration_tests -- --ignored
//! ```

mod common;

use common::test_id;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

/// Test server configuration
struct TestServer {
    base_url: String,
    client: Client,
}

impl TestServer {
    fn new() -> Self {
        let base_url =
            std::env::var("TEST_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".into());
        Self {
            base_url,
            client: Client::new(),
        }
    }

    async fn create_user(&self, username: &str, role: &str) -> Value {
        let resp = self
            .client
            .post(format!("{}/users", self.base_url))
            .json(&json!({ "username": username, "role": role }))
            .send()
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::CREATED);
        resp.json().await.expect("invalid json")
    }

    async fn create_permission(&self, admin_id: i64, name: &str, endpoint: &str) -> Value {
        let resp = self
            .client
            .post(format!("{}/permissions?admin_id={}", self.base_url, admin_id))
            .json(&json!({
                "name": name,
                "api_endpoint": endpoint,
                "description": "metered capability"
            }))
            .send()
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::CREATED);
        resp.json().await.expect("invalid json")
    }

    async fn create_plan(
        &self,
        admin_id: i64,
        name: &str,
        usage_limit: i64,
        permission_ids: &[i64],
    ) -> Value {
        let resp = self
            .client
            .post(format!("{}/plans?admin_id={}", self.base_url, admin_id))
            .json(&json!({
                "name": name,
                "description": "",
                "usage_limit": usage_limit,
                "permission_ids": permission_ids
            }))
            .send()
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::CREATED);
        resp.json().await.expect("invalid json")
    }

    async fn subscribe(&self, user_id: i64, plan_id: i64) -> Value {
        let resp = self
            .client
            .post(format!("{}/subscriptions", self.base_url))
            .json(&json!({ "user_id": user_id, "plan_id": plan_id }))
            .send()
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::OK);
        resp.json().await.expect("invalid json")
    }
}

#[tokio::test]
#[ignore]
async fn full_access_and_metering_flow() {
    let server = TestServer::new();

    let admin = server
        .create_user(&format!("admin_{}", test_id()), "admin")
        .await;
    let admin_id = admin["id"].as_i64().unwrap();
    let user = server
        .create_user(&format!("user_{}", test_id()), "customer")
        .await;
    let user_id = user["id"].as_i64().unwrap();

    let api_name = format!("svc1_{}", test_id());
    let perm = server
        .create_permission(admin_id, &api_name, "/service1")
        .await;
    let perm_id = perm["id"].as_i64().unwrap();

    let plan = server
        .create_plan(admin_id, &format!("basic_{}", test_id()), 2, &[perm_id])
        .await;
    let plan_id = plan["id"].as_i64().unwrap();
    assert_eq!(plan["permissions"], json!([perm_id]));

    server.subscribe(user_id, plan_id).await;

    // An access check does not consume quota.
    let resp = server
        .client
        .get(format!(
            "{}/access/{}/{}",
            server.base_url, user_id, api_name
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Access Granted.");

    // Two metered uses succeed, the third hits the limit.
    for _ in 0..2 {
        let resp = server
            .client
            .post(format!(
                "{}/usage/{}?api_name={}",
                server.base_url, user_id, api_name
            ))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["detail"], "Usage recorded");
    }
    let resp = server
        .client
        .post(format!(
            "{}/usage/{}?api_name={}",
            server.base_url, user_id, api_name
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Usage limit reached.");

    // Aggregate snapshot reflects both recorded uses.
    let resp = server
        .client
        .get(format!("{}/usage/{}/limit", server.base_url, user_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["usage"], 2);
    assert_eq!(body["limit"], 2);

    // The per-permission counter shows up in the usage listing.
    let resp = server
        .client
        .get(format!(
            "{}/subscriptions/{}/usage",
            server.base_url, user_id
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body[0]["permission_id"].as_i64().unwrap(), perm_id);
    assert_eq!(body[0]["count"], 2);
}

#[tokio::test]
#[ignore]
async fn admin_operations_reject_customers() {
    let server = TestServer::new();
    let user = server
        .create_user(&format!("user_{}", test_id()), "customer")
        .await;
    let user_id = user["id"].as_i64().unwrap();

    let resp = server
        .client
        .post(format!("{}/permissions?admin_id={}", server.base_url, user_id))
        .json(&json!({
            "name": format!("p_{}", test_id()),
            "api_endpoint": "/service2",
            "description": ""
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Admin access required.");
}

#[tokio::test]
#[ignore]
async fn duplicate_username_is_rejected() {
    let server = TestServer::new();
    let username = format!("user_{}", test_id());
    server.create_user(&username, "customer").await;

    let resp = server
        .client
        .post(format!("{}/users", server.base_url))
        .json(&json!({ "username": username, "role": "customer" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Username already registered");
}

#[tokio::test]
#[ignore]
async fn missing_subscription_denies_access() {
    let server = TestServer::new();
    let user = server
        .create_user(&format!("user_{}", test_id()), "customer")
        .await;
    let user_id = user["id"].as_i64().unwrap();

    let resp = server
        .client
        .get(format!("{}/access/{}/anything", server.base_url, user_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "No subscription found.");

    let resp = server
        .client
        .get(format!("{}/subscriptions/{}", server.base_url, user_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn cloud_service_stubs_answer() {
    let server = TestServer::new();

    for n in 1..=6 {
        let resp = server
            .client
            .get(format!("{}/service{}", server.base_url, n))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["detail"], format!("This is Cloud Service {}", n));
    }
}
