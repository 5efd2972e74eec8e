//! # Campusdesk Config
//!
//! Configuration types for the Campusdesk API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`calendar`]: Holiday feed location, country/region and month cache policy
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: Listen address
//!
//! # Example
//!
//! ```ignore
//! use campusdesk_config::{CalendarConfig, CorsConfig, ServerConfig};
//!
//! let calendar = CalendarConfig::from_env();
//! let cors = CorsConfig::from_env();
//! let server = ServerConfig::from_env();
//! ```

pub mod calendar;
pub mod cors;
pub mod server;

pub use calendar::CalendarConfig;
pub use cors::CorsConfig;
pub use server::ServerConfig;

/// Reads and parses an environment variable, falling back to `default` when
/// it is unset or malformed.
pub(crate) fn env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Invalid value in environment, using default");
            default
        }),
        Err(_) => default,
    }
}
