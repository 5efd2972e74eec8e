//! Campusdesk Observability
//!
//! Provides configurable observability features:
//! - Structured logging to the console and rolling files
//! - Per-request logging with request IDs
//! - Prometheus metrics for HTTP traffic and the calendar cache
//!
//! File logging and metrics are compiled in with the `observability` feature
//! (default) and can be switched off at runtime with
//! `OBSERVABILITY_ENABLED=false`, in which case only console logging is set up.
//!
//! # Examples
//!
//! ```no_run
//! use campusdesk_observability::{init_metrics, init_tracing};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_tracing()?;
//!     let metrics = init_metrics()?;
//!     // ... application code ...
//!     Ok(())
//! }
//! ```

use std::sync::OnceLock;

pub mod basic_logging;
pub mod request_logging;

#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use basic_logging::init_basic_console_logging;
pub use request_logging::logging_middleware;

#[cfg(feature = "observability")]
pub use logging::init_tracing;
#[cfg(feature = "observability")]
pub use self::metrics::{
    PrometheusHandle, init_metrics, metrics_app, metrics_middleware, track_calendar_cache_hit,
    track_calendar_cache_miss, track_calendar_fallback, track_calendar_feed_failure,
};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if observability is enabled via the `OBSERVABILITY_ENABLED` env var.
///
/// Always `false` when the `observability` feature is not compiled in.
pub fn is_observability_enabled() -> bool {
    cfg!(feature = "observability")
        && *OBSERVABILITY_ENABLED.get_or_init(|| {
            std::env::var("OBSERVABILITY_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true)
        })
}

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{Router, extract::Request, middleware::Next, response::Response};

    /// Console logging only when the feature is disabled
    pub fn init_tracing() -> anyhow::Result<()> {
        super::init_basic_console_logging();
        Ok(())
    }

    /// Placeholder handle so callers can keep the same signatures
    #[derive(Clone, Debug)]
    pub struct PrometheusHandle;

    impl PrometheusHandle {
        pub fn render(&self) -> String {
            String::new()
        }
    }

    pub fn init_metrics() -> anyhow::Result<Option<PrometheusHandle>> {
        Ok(None)
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub fn metrics_app(_handle: PrometheusHandle) -> Router {
        Router::new()
    }

    pub fn track_calendar_cache_hit() {}
    pub fn track_calendar_cache_miss() {}
    pub fn track_calendar_feed_failure(_reason: &str) {}
    pub fn track_calendar_fallback() {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
