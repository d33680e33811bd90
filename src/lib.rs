//! QuotaGate - Backend Library
//!
//! Subscription-based access control and usage metering for cloud service APIs.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, Result};
