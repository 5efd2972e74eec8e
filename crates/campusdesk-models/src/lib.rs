//! # Campusdesk Models
//!
//! Domain models and DTOs for the Campusdesk API.
//!
//! # Modules
//!
//! - [`academic_years`]: Academic year labels, batch derivation and window entries
//! - [`calendar`]: Month keys, holiday sources, attendance and day classification
//! - [`courses`]: Courses and their per-year semester configuration
//! - [`ids`]: Strongly-typed UUID newtypes
//! - [`terms`]: Terms, term-picker options and DTOs

pub mod academic_years;
pub mod calendar;
pub mod courses;
pub mod ids;
pub mod terms;

pub use academic_years::{
    AcademicYear, PersistedAcademicYear, derive_batch, normalize_year_label, year_label,
};

pub use calendar::{
    AttendanceStatus, CalendarCell, CalendarMonthData, CreateInstituteHolidayDto,
    DayClassification, HolidayMonthPayload, InstituteHoliday, MonthKey, MonthKeyError,
    PublicHoliday,
};

pub use courses::{Course, CourseFilterParams, DEFAULT_SEMESTERS_PER_YEAR, YearSemesterConfig};

pub use terms::{
    CreateTermDto, Term, TermFilterParams, TermOptions, TermOptionsQuery, TermWithBatch,
};
