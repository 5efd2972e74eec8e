//! Calendar month models.
//!
//! A month is composed from independent sources: computed Sundays, public
//! holidays from an external feed, institute holidays declared by
//! administrators, and per-day attendance status. [`CalendarMonthData`] is the
//! normalized snapshot of those sources for one [`MonthKey`]; it is replaced
//! wholesale on refresh and never patched.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

static MONTH_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("month key pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MonthKeyError {
    #[error("Invalid month key '{0}': expected YYYY-MM")]
    Format(String),

    #[error("Invalid month key '{0}': month must be between 01 and 12")]
    OutOfRange(String),
}

/// An ISO `"YYYY-MM"` month identifier.
///
/// Internally the first day of the month, so every key maps to a real date.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ToSchema)]
#[schema(value_type = String, example = "2026-10")]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthKeyError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| MonthKeyError::OutOfRange(format!("{:04}-{:02}", year, month)))
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// All dates of the month in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let month = self.0.month();
        self.0.iter_days().take_while(move |d| d.month() == month)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.days().last().unwrap_or(self.0)
    }

    pub fn days_in_month(&self) -> u32 {
        self.days().count() as u32
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// The weekly rest days (Sundays) of the month.
    pub fn sundays(&self) -> BTreeSet<NaiveDate> {
        self.days().filter(|d| d.weekday() == Weekday::Sun).collect()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl fmt::Debug for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MonthKey({})", self)
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = MONTH_KEY
            .captures(s.trim())
            .ok_or_else(|| MonthKeyError::Format(s.to_string()))?;

        let year = caps[1]
            .parse::<i32>()
            .map_err(|_| MonthKeyError::Format(s.to_string()))?;
        let month = caps[2]
            .parse::<u32>()
            .map_err(|_| MonthKeyError::Format(s.to_string()))?;

        Self::new(year, month).map_err(|_| MonthKeyError::OutOfRange(s.to_string()))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses a feed date, ignoring any time component
/// (`"2026-10-02"`, `"2026-10-02T00:00:00Z"`, `"2026-10-02 09:30"`).
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid calendar date '{}'", raw)))
}

/// One list entry that is kept if it parses and skipped otherwise.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    Invalid(serde::de::IgnoredAny),
}

/// Optional list whose malformed entries are dropped instead of failing the
/// whole document.
fn deserialize_lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw = Option::<Vec<Lenient<T>>>::deserialize(deserializer)?;
    Ok(raw.map(|entries| {
        entries
            .into_iter()
            .filter_map(|entry| match entry {
                Lenient::Valid(value) => Some(value),
                Lenient::Invalid(_) => None,
            })
            .collect()
    }))
}

/// Externally sourced public holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PublicHoliday {
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub date: NaiveDate,
    pub name: String,
    #[serde(alias = "localName")]
    pub local_name: String,
}

/// Administrator-declared non-working day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InstituteHoliday {
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub date: NaiveDate,
    pub title: String,
    pub description: Option<String>,
}

/// DTO for declaring an institute holiday.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateInstituteHolidayDto {
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 120, message = "title must be 1-120 characters"))]
    pub title: String,
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Attendance bookkeeping state for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Submitted,
    NotMarked,
    Pending,
    Upcoming,
}

/// Raw month payload as returned by the holiday feed collaborator.
///
/// Every collection is optional; [`HolidayMonthPayload::into_month_data`]
/// fills the gaps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayMonthPayload {
    pub month: Option<String>,
    pub country_code: Option<String>,
    pub region_code: Option<String>,
    pub sundays: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_lenient_list")]
    pub public_holidays: Option<Vec<PublicHoliday>>,
    #[serde(default, deserialize_with = "deserialize_lenient_list")]
    pub custom_holidays: Option<Vec<InstituteHoliday>>,
    pub attendance_status: Option<HashMap<String, AttendanceStatus>>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub from_cache: Option<bool>,
}

impl HolidayMonthPayload {
    /// Normalizes the payload into a month snapshot for `month`.
    ///
    /// Missing holiday lists become empty, missing Sundays are computed,
    /// missing attendance becomes an empty map and a missing fetch time
    /// becomes `now`. Entries with unparseable dates are dropped, including
    /// holidays, which are filtered while the payload is deserialized.
    pub fn into_month_data(
        self,
        month: MonthKey,
        country_code: &str,
        region_code: Option<&str>,
        now: DateTime<Utc>,
    ) -> CalendarMonthData {
        let sundays = match self.sundays {
            Some(raw) => raw.iter().filter_map(|d| parse_calendar_date(d)).collect(),
            None => month.sundays(),
        };

        let attendance_status = self
            .attendance_status
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(day, status)| parse_calendar_date(&day).map(|date| (date, status)))
            .collect();

        CalendarMonthData {
            month,
            country_code: self
                .country_code
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| country_code.to_string()),
            region_code: self
                .region_code
                .or_else(|| region_code.map(str::to_string)),
            sundays,
            public_holidays: self.public_holidays.unwrap_or_default(),
            custom_holidays: self.custom_holidays.unwrap_or_default(),
            attendance_status,
            fetched_at: self.fetched_at.unwrap_or(now),
            from_cache: self.from_cache.unwrap_or(false),
        }
    }
}

/// Normalized sources for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CalendarMonthData {
    pub month: MonthKey,
    pub country_code: String,
    pub region_code: Option<String>,
    #[schema(value_type = Vec<NaiveDate>)]
    pub sundays: BTreeSet<NaiveDate>,
    pub public_holidays: Vec<PublicHoliday>,
    pub custom_holidays: Vec<InstituteHoliday>,
    #[schema(value_type = HashMap<String, AttendanceStatus>)]
    pub attendance_status: BTreeMap<NaiveDate, AttendanceStatus>,
    pub fetched_at: DateTime<Utc>,
    /// Whether the feed itself answered from its own cache
    pub from_cache: bool,
}

impl CalendarMonthData {
    /// Minimal month built from computed Sundays only.
    pub fn fallback(
        month: MonthKey,
        country_code: &str,
        region_code: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            month,
            country_code: country_code.to_string(),
            region_code: region_code.map(str::to_string),
            sundays: month.sundays(),
            public_holidays: Vec::new(),
            custom_holidays: Vec::new(),
            attendance_status: BTreeMap::new(),
            fetched_at: now,
            from_cache: false,
        }
    }

    pub fn public_holiday_on(&self, date: NaiveDate) -> Option<&PublicHoliday> {
        self.public_holidays.iter().find(|h| h.date == date)
    }

    pub fn institute_holiday_on(&self, date: NaiveDate) -> Option<&InstituteHoliday> {
        self.custom_holidays.iter().find(|h| h.date == date)
    }

    /// Weekly rest day. Dates of this month use the snapshot's Sundays;
    /// dates of adjacent months (grid filler) are judged by weekday.
    pub fn is_sunday(&self, date: NaiveDate) -> bool {
        if self.month.contains(date) {
            self.sundays.contains(&date)
        } else {
            date.weekday() == Weekday::Sun
        }
    }

    pub fn attendance_on(&self, date: NaiveDate) -> Option<AttendanceStatus> {
        self.attendance_status.get(&date).copied()
    }
}

/// Single authoritative classification of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum DayClassification {
    PublicHoliday,
    InstituteHoliday,
    Sunday,
    #[serde(rename = "attendance_status")]
    Attendance(AttendanceStatus),
    WorkingDay,
}

impl DayClassification {
    pub fn is_holiday(&self) -> bool {
        matches!(self, Self::PublicHoliday | Self::InstituteHoliday)
    }
}

/// One cell of a month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// `false` for leading/trailing filler days from adjacent months
    pub is_current_month: bool,
    pub classification: DayClassification,
    /// Holiday name for holiday cells
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_key_parse_and_display() {
        let key: MonthKey = "2026-02".parse().unwrap();
        assert_eq!(key.year(), 2026);
        assert_eq!(key.month(), 2);
        assert_eq!(key.to_string(), "2026-02");
        assert_eq!(key.days_in_month(), 28);
    }

    #[test]
    fn test_month_key_rejects_bad_input() {
        assert!(matches!(
            "2026-2".parse::<MonthKey>(),
            Err(MonthKeyError::Format(_))
        ));
        assert!(matches!(
            "2026-13".parse::<MonthKey>(),
            Err(MonthKeyError::OutOfRange(_))
        ));
        assert!("october".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_leap_february() {
        let key = MonthKey::new(2028, 2).unwrap();
        assert_eq!(key.days_in_month(), 29);
    }

    #[test]
    fn test_sundays_of_october_2026() {
        let sundays = MonthKey::new(2026, 10).unwrap().sundays();
        let expected: BTreeSet<_> = [4, 11, 18, 25].iter().map(|d| date(2026, 10, *d)).collect();
        assert_eq!(sundays, expected);
    }

    #[test]
    fn test_month_key_serde_as_string() {
        let key = MonthKey::new(2026, 10).unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), r#""2026-10""#);
        let back: MonthKey = serde_json::from_str(r#""2026-10""#).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_parse_calendar_date_ignores_time() {
        assert_eq!(parse_calendar_date("2026-10-02"), Some(date(2026, 10, 2)));
        assert_eq!(
            parse_calendar_date("2026-10-02T18:30:00.000Z"),
            Some(date(2026, 10, 2))
        );
        assert_eq!(parse_calendar_date("02/10/2026"), None);
        assert_eq!(parse_calendar_date(""), None);
    }

    #[test]
    fn test_payload_defaults_fill_gaps() {
        let month = MonthKey::new(2026, 10).unwrap();
        let now = Utc::now();
        let data = HolidayMonthPayload::default().into_month_data(month, "IN", Some("KA"), now);

        assert_eq!(data.sundays, month.sundays());
        assert!(data.public_holidays.is_empty());
        assert!(data.custom_holidays.is_empty());
        assert!(data.attendance_status.is_empty());
        assert_eq!(data.country_code, "IN");
        assert_eq!(data.region_code.as_deref(), Some("KA"));
        assert_eq!(data.fetched_at, now);
        assert!(!data.from_cache);
    }

    #[test]
    fn test_payload_from_feed_json() {
        let json = r#"{
            "month": "2026-10",
            "countryCode": "IN",
            "publicHolidays": [
                {"date": "2026-10-02T00:00:00Z", "name": "Gandhi Jayanti", "localName": "Gandhi Jayanti"}
            ],
            "customHolidays": [
                {"date": "2026-10-20", "title": "Founders Day", "description": null}
            ],
            "attendanceStatus": {"2026-10-01": "submitted", "garbage": "pending"}
        }"#;
        let payload: HolidayMonthPayload = serde_json::from_str(json).unwrap();
        let data =
            payload.into_month_data(MonthKey::new(2026, 10).unwrap(), "US", None, Utc::now());

        assert_eq!(data.country_code, "IN");
        assert_eq!(data.public_holidays[0].date, date(2026, 10, 2));
        assert!(data.institute_holiday_on(date(2026, 10, 20)).is_some());
        assert_eq!(
            data.attendance_on(date(2026, 10, 1)),
            Some(AttendanceStatus::Submitted)
        );
        assert_eq!(data.attendance_status.len(), 1);
    }

    #[test]
    fn test_malformed_holiday_entries_are_skipped() {
        let json = r#"{
            "publicHolidays": [
                {"date": "2026-10-02", "name": "Gandhi Jayanti", "localName": "Gandhi Jayanti"},
                {"date": "TBD", "name": "Diwali", "localName": "Deepavali"}
            ],
            "customHolidays": [
                {"date": "someday", "title": "Founders Day", "description": null},
                {"date": "2026-10-20", "title": "Convocation", "description": null}
            ]
        }"#;
        let payload: HolidayMonthPayload = serde_json::from_str(json).unwrap();
        let data =
            payload.into_month_data(MonthKey::new(2026, 10).unwrap(), "IN", None, Utc::now());

        assert_eq!(data.public_holidays.len(), 1);
        assert_eq!(data.public_holidays[0].date, date(2026, 10, 2));
        assert_eq!(data.custom_holidays.len(), 1);
        assert_eq!(data.custom_holidays[0].title, "Convocation");
    }

    #[test]
    fn test_null_holiday_lists_become_empty() {
        let payload: HolidayMonthPayload =
            serde_json::from_str(r#"{"publicHolidays": null}"#).unwrap();
        assert!(payload.public_holidays.is_none());
        assert!(payload.custom_holidays.is_none());

        let data =
            payload.into_month_data(MonthKey::new(2026, 10).unwrap(), "IN", None, Utc::now());
        assert!(data.public_holidays.is_empty());
    }

    #[test]
    fn test_fallback_has_only_sundays() {
        let month = MonthKey::new(2026, 11).unwrap();
        let data = CalendarMonthData::fallback(month, "IN", None, Utc::now());
        assert_eq!(data.sundays.len(), 5);
        assert!(data.public_holidays.is_empty());
        assert!(data.custom_holidays.is_empty());
        assert!(data.attendance_status.is_empty());
        assert!(!data.from_cache);
    }

    #[test]
    fn test_is_sunday_outside_month_uses_weekday() {
        let month = MonthKey::new(2026, 10).unwrap();
        let mut data = CalendarMonthData::fallback(month, "IN", None, Utc::now());
        data.sundays.remove(&date(2026, 10, 4));

        assert!(!data.is_sunday(date(2026, 10, 4)));
        assert!(data.is_sunday(date(2026, 10, 11)));
        assert!(data.is_sunday(date(2026, 9, 27)));
        assert!(data.is_sunday(date(2026, 11, 1)));
        assert!(!data.is_sunday(date(2026, 9, 30)));
    }

    #[test]
    fn test_classification_serialization() {
        let json = serde_json::to_value(DayClassification::Attendance(AttendanceStatus::NotMarked))
            .unwrap();
        assert_eq!(json["kind"], "attendance_status");
        assert_eq!(json["status"], "not_marked");

        let json = serde_json::to_value(DayClassification::PublicHoliday).unwrap();
        assert_eq!(json["kind"], "public_holiday");
    }

    #[test]
    fn test_create_institute_holiday_dto_validation() {
        let valid = CreateInstituteHolidayDto {
            date: date(2026, 10, 20),
            title: "Founders Day".to_string(),
            description: None,
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateInstituteHolidayDto {
            title: String::new(),
            ..valid.clone()
        };
        assert!(empty_title.validate().is_err());

        let long_description = CreateInstituteHolidayDto {
            description: Some("x".repeat(501)),
            ..valid
        };
        assert!(long_description.validate().is_err());
    }
}
