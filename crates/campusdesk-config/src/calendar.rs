//! Calendar configuration.
//!
//! # Environment Variables
//!
//! - `CALENDAR_COUNTRY_CODE`: ISO 3166-1 alpha-2 country for public holidays (default: `IN`)
//! - `CALENDAR_REGION_CODE`: Optional subdivision, e.g. `KA` (default: unset)
//! - `HOLIDAY_API_URL`: Base URL of the public holiday API (default: `https://date.nager.at/api/v3`)
//! - `HOLIDAY_API_TIMEOUT_SECONDS`: Request timeout for the holiday API (default: `10`)
//! - `CALENDAR_CACHE_MAX_AGE_SECONDS`: `Cache-Control` max-age on month responses (default: `60`)

use std::time::Duration;

use crate::env_or;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarConfig {
    pub country_code: String,
    pub region_code: Option<String>,
    pub holiday_api_url: String,
    pub holiday_api_timeout: Duration,
    pub cache_max_age: Duration,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            country_code: "IN".to_string(),
            region_code: None,
            holiday_api_url: "https://date.nager.at/api/v3".to_string(),
            holiday_api_timeout: Duration::from_secs(10),
            cache_max_age: Duration::from_secs(60),
        }
    }
}

impl CalendarConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let country_code = std::env::var("CALENDAR_COUNTRY_CODE")
            .ok()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or(defaults.country_code);

        let region_code = std::env::var("CALENDAR_REGION_CODE")
            .ok()
            .map(|r| r.trim().to_uppercase())
            .filter(|r| !r.is_empty());

        let holiday_api_url = std::env::var("HOLIDAY_API_URL")
            .ok()
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or(defaults.holiday_api_url);

        Self {
            country_code,
            region_code,
            holiday_api_url,
            holiday_api_timeout: Duration::from_secs(env_or(
                "HOLIDAY_API_TIMEOUT_SECONDS",
                defaults.holiday_api_timeout.as_secs(),
            )),
            cache_max_age: Duration::from_secs(env_or(
                "CALENDAR_CACHE_MAX_AGE_SECONDS",
                defaults.cache_max_age.as_secs(),
            )),
        }
    }
}
