//! Course models.
//!
//! A course runs for `total_years` years of study. Most courses have the same
//! number of semesters every year, but some (e.g. a foundation year followed
//! by regular years) override it per year via `year_semester_config`.

use crate::ids::{CollegeId, CourseId};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Semesters per year when a course does not configure it.
pub const DEFAULT_SEMESTERS_PER_YEAR: i32 = 2;

/// Per-year semester override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct YearSemesterConfig {
    /// Year of study (1-based)
    pub year: i32,
    /// Number of semesters in that year
    pub semesters: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Course {
    pub id: CourseId,
    pub college_id: CollegeId,
    pub name: String,
    pub code: Option<String>,
    /// Duration of the course in years (>= 1)
    pub total_years: i32,
    /// Default semester count per year; 2 when unset
    pub semesters_per_year: Option<i32>,
    /// Ordered per-year overrides of the semester count
    pub year_semester_config: Option<Vec<YearSemesterConfig>>,
}

impl Course {
    /// Semester count for one year of study.
    ///
    /// The override table is consulted first and only for `year_of_study`;
    /// a missing entry falls back to the course-level default.
    pub fn semester_count(&self, year_of_study: i32) -> i32 {
        self.year_semester_config
            .as_deref()
            .and_then(|config| config.iter().find(|entry| entry.year == year_of_study))
            .map(|entry| entry.semesters)
            .unwrap_or_else(|| self.default_semesters())
    }

    pub fn default_semesters(&self) -> i32 {
        self.semesters_per_year.unwrap_or(DEFAULT_SEMESTERS_PER_YEAR)
    }
}

/// Query parameters for listing courses.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseFilterParams {
    /// Restrict to one college
    #[serde(default, deserialize_with = "campusdesk_core::serde::deserialize_optional_uuid")]
    pub college_id: Option<Uuid>,
}

impl CourseFilterParams {
    pub fn college_id(&self) -> Option<CollegeId> {
        self.college_id.map(CollegeId::from)
    }
}
