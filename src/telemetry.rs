//! Telemetry initialization: tracing subscriber with env-based filtering.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Honors `RUST_LOG` when set; otherwise defaults to debug-level output for
/// the service itself and quieter output for the HTTP and query layers.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "quotagate_backend=debug,tower_http=debug,sqlx::query=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
