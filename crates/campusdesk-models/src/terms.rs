//! Term domain models and DTOs.
//!
//! A term is a concrete (college, course, batch, year of study, semester)
//! tuple with explicit start and end dates. It references its academic year
//! either by ID (persisted year) or by label (year not yet saved).

use crate::academic_years::{AcademicYear, PersistedAcademicYear, derive_batch};
use crate::ids::{AcademicYearId, CollegeId, CourseId, TermId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Term {
    pub id: TermId,
    pub college_id: CollegeId,
    pub course_id: CourseId,
    /// Batch stored explicitly by an administrator, if any
    pub batch_label: Option<String>,
    pub academic_year_id: Option<AcademicYearId>,
    pub academic_year_label: Option<String>,
    pub year_of_study: i32,
    pub semester_number: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Term {
    /// The stored batch label when present, else the batch derived from the
    /// academic year label and year of study.
    pub fn effective_batch(&self) -> Option<String> {
        self.batch_label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .or_else(|| {
                derive_batch(
                    self.academic_year_label.as_deref(),
                    Some(self.year_of_study),
                )
            })
    }
}

/// Term with its effective batch resolved, as returned by list endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TermWithBatch {
    #[serde(flatten)]
    pub term: Term,
    pub effective_batch: Option<String>,
}

impl From<Term> for TermWithBatch {
    fn from(term: Term) -> Self {
        let effective_batch = term.effective_batch();
        Self {
            term,
            effective_batch,
        }
    }
}

impl TermWithBatch {
    /// Like `From<Term>`, but a term that references its academic year by ID
    /// takes the normalized label of the matching persisted year first.
    pub fn resolve(mut term: Term, persisted: &[PersistedAcademicYear]) -> Self {
        if term.academic_year_label.is_none()
            && let Some(id) = term.academic_year_id
        {
            term.academic_year_label = persisted
                .iter()
                .find(|year| year.id == id)
                .and_then(PersistedAcademicYear::normalized_label);
        }

        Self::from(term)
    }
}

/// DTO for creating a term.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_create_term"))]
pub struct CreateTermDto {
    pub college_id: CollegeId,
    pub course_id: CourseId,
    #[validate(length(min = 1, max = 20, message = "batch_label must be 1-20 characters"))]
    pub batch_label: Option<String>,
    pub academic_year_id: Option<AcademicYearId>,
    pub academic_year_label: Option<String>,
    #[validate(range(min = 1, message = "year_of_study must be at least 1"))]
    pub year_of_study: i32,
    #[validate(range(min = 1, message = "semester_number must be at least 1"))]
    pub semester_number: i32,
    pub start_date: NaiveDate,
    /// Must be after start_date
    pub end_date: NaiveDate,
}

fn validate_create_term(dto: &CreateTermDto) -> Result<(), ValidationError> {
    if dto.start_date >= dto.end_date {
        return Err(ValidationError::new("date_order")
            .with_message("Start date must be before end date".into()));
    }

    let has_label = dto
        .academic_year_label
        .as_deref()
        .is_some_and(|label| !label.trim().is_empty());

    if dto.academic_year_id.is_some() == has_label {
        return Err(ValidationError::new("academic_year")
            .with_message("Provide exactly one of academic_year_id or academic_year_label".into()));
    }

    Ok(())
}

/// Query parameters for filtering terms.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TermFilterParams {
    #[serde(default, deserialize_with = "campusdesk_core::serde::deserialize_optional_uuid")]
    pub college_id: Option<Uuid>,
    #[serde(default, deserialize_with = "campusdesk_core::serde::deserialize_optional_uuid")]
    pub course_id: Option<Uuid>,
    #[serde(default, deserialize_with = "campusdesk_core::serde::deserialize_optional_i32")]
    pub year_of_study: Option<i32>,
    #[serde(default, deserialize_with = "campusdesk_core::serde::deserialize_optional_i32")]
    pub semester_number: Option<i32>,
}

impl TermFilterParams {
    pub fn college_id(&self) -> Option<CollegeId> {
        self.college_id.map(CollegeId::from)
    }

    pub fn course_id(&self) -> Option<CourseId> {
        self.course_id.map(CourseId::from)
    }
}

/// Query parameters for the term-options picker.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TermOptionsQuery {
    /// Selected year of study
    #[serde(default, deserialize_with = "campusdesk_core::serde::deserialize_optional_i32")]
    pub year_of_study: Option<i32>,
    /// Selected academic year label, used to derive the batch
    #[serde(default, deserialize_with = "campusdesk_core::serde::deserialize_optional_string")]
    pub academic_year: Option<String>,
    /// Reference date for the academic-year window (defaults to today)
    pub today: Option<NaiveDate>,
}

/// Everything a term picker needs for one course.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TermOptions {
    pub course_id: CourseId,
    /// `1..=total_years`
    pub years_of_study: Vec<i32>,
    /// Valid semesters for the selected year; empty when no year is selected
    pub semesters: Vec<i32>,
    /// Prior, current and next academic years
    pub academic_years: Vec<AcademicYear>,
    /// Batch derived from the selected academic year and year of study
    pub batch: Option<String>,
}
