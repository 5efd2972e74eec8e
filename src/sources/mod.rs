//! Collaborators the portal core composes data from.
//!
//! The core never persists anything itself. Academic records, institute
//! holidays, attendance submissions and public holidays all come through
//! the traits below, so services can be exercised against in-memory stubs.
//!
//! Shipped implementations:
//! - [`PgRecords`]: Postgres-backed records, institute holidays and attendance
//! - [`PublicHolidayClient`]: Nager.Date-compatible public holiday API
//! - [`PortalHolidayFeed`]: composes the above into a [`HolidayFeed`]

use std::collections::BTreeSet;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::NaiveDate;

use campusdesk_core::AppError;
use campusdesk_models::calendar::{
    CreateInstituteHolidayDto, HolidayMonthPayload, InstituteHoliday, MonthKey, PublicHoliday,
};
use campusdesk_models::courses::Course;
use campusdesk_models::ids::{CollegeId, CourseId};
use campusdesk_models::{CreateTermDto, PersistedAcademicYear, Term, TermFilterParams};

pub mod feed;
pub mod holiday_api;
pub mod postgres;

pub use feed::{PortalHolidayFeed, derive_attendance_status};
pub use holiday_api::PublicHolidayClient;
pub use postgres::PgRecords;

/// Error type for collaborator calls.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Holiday API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Holiday API returned status {status}")]
    Status { status: u16 },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The store refused the write (missing reference, duplicate)
    #[error("{0}")]
    Rejected(String),
}

impl SourceError {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Database(_) => "database",
            Self::Http(e) if e.is_timeout() => "timeout",
            Self::Http(_) => "http",
            Self::Status { .. } => "status",
            Self::InvalidData(_) => "invalid_data",
            Self::Rejected(_) => "rejected",
        }
    }

    /// Maps the failure onto an HTTP error: rejected writes are the
    /// caller's fault, everything else is an upstream failure.
    pub fn into_app_error(self) -> AppError {
        match self {
            Self::Rejected(_) => AppError::new(StatusCode::CONFLICT, self),
            other => AppError::bad_gateway(other),
        }
    }
}

/// Source of one month's holidays and attendance.
#[async_trait]
pub trait HolidayFeed: Send + Sync {
    async fn fetch_holiday_month(
        &self,
        month: MonthKey,
        country_code: &str,
        region_code: Option<&str>,
    ) -> Result<HolidayMonthPayload, SourceError>;
}

/// External public holiday calendar.
#[async_trait]
pub trait PublicHolidaySource: Send + Sync {
    async fn public_holidays(
        &self,
        month: MonthKey,
        country_code: &str,
        region_code: Option<&str>,
    ) -> Result<Vec<PublicHoliday>, SourceError>;
}

/// Administrator-declared institute holidays.
#[async_trait]
pub trait InstituteHolidayStore: Send + Sync {
    async fn list_institute_holidays(
        &self,
        month: MonthKey,
    ) -> Result<Vec<InstituteHoliday>, SourceError>;

    /// Declares a holiday; an existing declaration for the same date is replaced.
    async fn create_institute_holiday(
        &self,
        dto: &CreateInstituteHolidayDto,
    ) -> Result<InstituteHoliday, SourceError>;

    /// Removes the declaration for `date`, if any.
    async fn delete_institute_holiday(&self, date: NaiveDate) -> Result<(), SourceError>;
}

/// Days on which attendance was submitted.
#[async_trait]
pub trait AttendanceLedger: Send + Sync {
    async fn submitted_dates(&self, month: MonthKey) -> Result<BTreeSet<NaiveDate>, SourceError>;
}

/// Academic years, courses and terms.
#[async_trait]
pub trait AcademicRecords: Send + Sync {
    async fn list_persisted_academic_years(
        &self,
    ) -> Result<Vec<PersistedAcademicYear>, SourceError>;

    async fn list_courses(&self, college_id: Option<CollegeId>)
    -> Result<Vec<Course>, SourceError>;

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, SourceError>;

    async fn list_terms(&self, filters: &TermFilterParams) -> Result<Vec<Term>, SourceError>;

    async fn create_term(&self, dto: &CreateTermDto) -> Result<Term, SourceError>;
}
