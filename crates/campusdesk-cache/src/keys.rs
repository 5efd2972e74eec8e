//! Cache key generation.
//!
//! Keys are namespaced strings so that unrelated snapshots sharing one
//! [`MonthCache`](crate::MonthCache) cannot collide.

use std::fmt::Display;

/// Prefix for all cache keys.
const CACHE_PREFIX: &str = "campusdesk";

/// Builds a cache key with the standard prefix.
fn build_key(parts: &[&str]) -> String {
    format!("{}:{}", CACHE_PREFIX, parts.join(":"))
}

/// Cache keys for calendar data.
pub mod calendar {
    use super::*;

    /// Key for one month scoped to a country/region.
    pub fn month_for_region(month: impl Display, country: &str, region: Option<&str>) -> String {
        let month = month.to_string();
        match region {
            Some(region) => build_key(&["calendar", country, region, "month", &month]),
            None => build_key(&["calendar", country, "month", &month]),
        }
    }
}
