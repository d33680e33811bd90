//! Prometheus metrics collection and HTTP request instrumentation.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

use axum::{
    body::Body,
    http::{Request, Response},
    middleware::Next,
};

use crate::services::access_service::DenyReason;

/// Initialize the Prometheus metrics recorder and return the handle for rendering.
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    builder
        .install_recorder()
        .expect("failed to install Prometheus recorder")
}

/// Axum middleware that records HTTP request metrics.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    let start = Instant::now();
    counter!("qg_http_requests_total", "method" => method.clone(), "path" => path.clone())
        .increment(1);

    let response = next.run(request).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();
    histogram!("qg_http_request_duration_seconds", "method" => method.clone(), "path" => path.clone(), "status" => status.clone()).record(duration);
    counter!("qg_http_responses_total", "method" => method, "path" => path, "status" => status)
        .increment(1);

    response
}

/// Normalize URL paths to reduce label cardinality.
/// Numeric ids and the free-form API name in access paths become placeholders.
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let mut normalized: Vec<String> = segments
        .iter()
        .map(|seg| {
            if !seg.is_empty() && seg.parse::<i64>().is_ok() {
                ":id".to_string()
            } else {
                seg.to_string()
            }
        })
        .collect();

    // /access/:id/<api> carries the requested API name in the last segment.
    if normalized.len() == 4 && normalized[1] == "access" {
        normalized[3] = ":api".to_string();
    }

    normalized.join("/")
}

/// Record an access decision outcome.
pub fn record_access_decision(allowed: bool, reason: Option<DenyReason>) {
    let outcome = if allowed { "allowed" } else { "denied" };
    let reason_label = reason.map_or("none", DenyReason::as_str);
    counter!("qg_access_decisions_total", "outcome" => outcome, "reason" => reason_label)
        .increment(1);
}

/// Record one metered use written to the ledger.
pub fn record_usage_recorded() {
    counter!("qg_usage_recorded_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_numeric() {
        assert_eq!(normalize_path("/subscriptions/123/usage"), "/subscriptions/:id/usage");
        assert_eq!(normalize_path("/usage/42/limit"), "/usage/:id/limit");
    }

    #[test]
    fn test_normalize_path_access_api_name() {
        assert_eq!(normalize_path("/access/7/storage_read"), "/access/:id/:api");
    }

    #[test]
    fn test_normalize_path_no_change() {
        assert_eq!(normalize_path("/health"), "/health");
        assert_eq!(normalize_path("/service1"), "/service1");
    }
}
