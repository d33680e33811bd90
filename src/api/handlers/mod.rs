//! API handlers.

pub mod access;
pub mod cloud_services;
pub mod health;
pub mod permissions;
pub mod plans;
pub mod subscriptions;
pub mod users;
