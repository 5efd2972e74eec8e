use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, instrument};

use campusdesk_config::CalendarConfig;
use campusdesk_models::calendar::{MonthKey, PublicHoliday};

use super::{PublicHolidaySource, SourceError};

/// Entry of `GET {base}/PublicHolidays/{year}/{country}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiHoliday {
    date: NaiveDate,
    local_name: String,
    name: String,
    /// ISO 3166-2 subdivisions the holiday applies to; absent for nationwide holidays
    #[serde(default)]
    counties: Option<Vec<String>>,
}

impl ApiHoliday {
    /// Nationwide holidays always apply; regional ones only to a configured
    /// region they list.
    fn applies_to(&self, country_code: &str, region_code: Option<&str>) -> bool {
        let Some(counties) = &self.counties else {
            return true;
        };

        let Some(region) = region_code else {
            return false;
        };

        let qualified = if region.contains('-') {
            region.to_uppercase()
        } else {
            format!("{}-{}", country_code, region).to_uppercase()
        };

        counties.iter().any(|c| c.eq_ignore_ascii_case(&qualified))
    }
}

fn select_month(
    holidays: Vec<ApiHoliday>,
    month: MonthKey,
    country_code: &str,
    region_code: Option<&str>,
) -> Vec<PublicHoliday> {
    holidays
        .into_iter()
        .filter(|h| month.contains(h.date) && h.applies_to(country_code, region_code))
        .map(|h| PublicHoliday {
            date: h.date,
            name: h.name,
            local_name: h.local_name,
        })
        .collect()
}

/// Client for a Nager.Date-compatible public holiday API.
#[derive(Clone, Debug)]
pub struct PublicHolidayClient {
    http: reqwest::Client,
    base_url: String,
}

impl PublicHolidayClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("campusdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &CalendarConfig) -> Result<Self, SourceError> {
        Self::new(&config.holiday_api_url, config.holiday_api_timeout)
    }

    fn year_url(&self, year: i32, country_code: &str) -> String {
        format!("{}/PublicHolidays/{}/{}", self.base_url, year, country_code)
    }
}

#[async_trait]
impl PublicHolidaySource for PublicHolidayClient {
    #[instrument(skip(self))]
    async fn public_holidays(
        &self,
        month: MonthKey,
        country_code: &str,
        region_code: Option<&str>,
    ) -> Result<Vec<PublicHoliday>, SourceError> {
        let response = self
            .http
            .get(self.year_url(month.year(), country_code))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let holidays: Vec<ApiHoliday> = response.json().await?;
        let selected = select_month(holidays, month, country_code, region_code);

        debug!(count = selected.len(), "Fetched public holidays");
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"[
        {"date": "2026-10-02", "localName": "Gandhi Jayanti", "name": "Gandhi Jayanti", "countryCode": "IN", "global": true, "counties": null},
        {"date": "2026-11-01", "localName": "Kannada Rajyotsava", "name": "Karnataka Formation Day", "countryCode": "IN", "global": false, "counties": ["IN-KA"]},
        {"date": "2026-11-08", "localName": "Deepavali", "name": "Diwali", "countryCode": "IN", "global": true}
    ]"#;

    fn holidays() -> Vec<ApiHoliday> {
        serde_json::from_str(PAYLOAD).unwrap()
    }

    #[test]
    fn test_selects_only_requested_month() {
        let october = MonthKey::new(2026, 10).unwrap();
        let selected = select_month(holidays(), october, "IN", None);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "Gandhi Jayanti");
    }

    #[test]
    fn test_regional_holidays_need_matching_region() {
        let november = MonthKey::new(2026, 11).unwrap();

        let national = select_month(holidays(), november, "IN", None);
        assert_eq!(national.len(), 1);
        assert_eq!(national[0].local_name, "Deepavali");

        let karnataka = select_month(holidays(), november, "IN", Some("KA"));
        assert_eq!(karnataka.len(), 2);

        let tamil_nadu = select_month(holidays(), november, "IN", Some("IN-TN"));
        assert_eq!(tamil_nadu.len(), 1);
    }

    #[test]
    fn test_year_url() {
        let client =
            PublicHolidayClient::new("https://date.nager.at/api/v3/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            client.year_url(2026, "IN"),
            "https://date.nager.at/api/v3/PublicHolidays/2026/IN"
        );
    }
}
