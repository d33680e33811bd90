//! API module - HTTP handlers and application state.

pub mod dto;
pub mod handlers;
pub mod openapi;
pub mod routes;

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;

use crate::config::Config;
use crate::services::access_service::AccessService;
use crate::services::authorizer::{Authorizer, DbAuthorizer};
use crate::services::catalog_service::CatalogService;
use crate::services::subscription_service::SubscriptionService;
use crate::services::usage_service::UsageService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: PgPool,
    pub authorizer: Arc<dyn Authorizer>,
    pub metrics_handle: Option<Arc<PrometheusHandle>>,
}

impl AppState {
    /// Create application state with the database-backed authorizer
    pub fn new(config: Config, db: PgPool) -> Self {
        let authorizer: Arc<dyn Authorizer> = Arc::new(DbAuthorizer::new(db.clone()));
        Self {
            config,
            db,
            authorizer,
            metrics_handle: None,
        }
    }

    /// Set the Prometheus metrics handle for rendering /metrics output.
    pub fn set_metrics_handle(&mut self, handle: PrometheusHandle) {
        self.metrics_handle = Some(Arc::new(handle));
    }

    /// Create a CatalogService on the shared pool.
    pub fn catalog_service(&self) -> CatalogService {
        CatalogService::new(self.db.clone())
    }

    /// Create a SubscriptionService on the shared pool.
    pub fn subscription_service(&self) -> SubscriptionService {
        SubscriptionService::new(self.db.clone())
    }

    /// Create a UsageService on the shared pool.
    pub fn usage_service(&self) -> UsageService {
        UsageService::new(self.db.clone())
    }

    /// Create an AccessService on the shared pool.
    pub fn access_service(&self) -> AccessService {
        AccessService::new(self.db.clone())
    }
}

pub type SharedState = Arc<AppState>;
