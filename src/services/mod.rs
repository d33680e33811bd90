//! Business logic services.

pub mod access_service;
pub mod authorizer;
pub mod catalog_service;
pub mod metrics_service;
pub mod subscription_service;
pub mod usage_service;
