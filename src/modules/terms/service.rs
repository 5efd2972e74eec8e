use chrono::{Datelike, NaiveDate};
use tracing::{debug, instrument};

use campusdesk_core::AppError;
use campusdesk_models::academic_years::{
    AcademicYear, PersistedAcademicYear, derive_batch, year_label,
};
use campusdesk_models::courses::Course;
use campusdesk_models::ids::CourseId;

use crate::modules::terms::model::{
    CreateTermDto, Term, TermFilterParams, TermOptions, TermOptionsQuery, TermWithBatch,
};
use crate::sources::{AcademicRecords, SourceError};

pub struct TermService;

impl TermService {
    /// Prior, current and next academic years relative to `today`.
    ///
    /// Each generated year adopts the `id` and `is_active` of a persisted
    /// record whose normalized label matches; otherwise it is synthetic.
    pub fn academic_year_window(
        today: NaiveDate,
        persisted: &[PersistedAcademicYear],
    ) -> [AcademicYear; 3] {
        let current = today.year();

        [current - 1, current, current + 1].map(|start_year| {
            let label = year_label(start_year);
            persisted
                .iter()
                .find(|record| record.normalized_label().as_deref() == Some(label.as_str()))
                .map(|record| AcademicYear::with_persisted(start_year, record))
                .unwrap_or_else(|| AcademicYear::synthetic(start_year))
        })
    }

    /// `1..=total_years`, or nothing without a course.
    pub fn years_of_study(course: Option<&Course>) -> Vec<i32> {
        course
            .map(|course| (1..=course.total_years).collect())
            .unwrap_or_default()
    }

    /// Semesters offered in one year of study: the year's override entry,
    /// else the course default. Empty when the course or year is missing.
    ///
    /// The year is not checked against the course's duration here;
    /// [`TermService::create_term`] does that.
    pub fn semester_options(course: Option<&Course>, year_of_study: Option<i32>) -> Vec<i32> {
        let (Some(course), Some(year)) = (course, year_of_study) else {
            return Vec::new();
        };

        (1..=course.semester_count(year)).collect()
    }

    /// Everything a term picker needs for one course.
    #[instrument(skip(records))]
    pub async fn term_options(
        records: &dyn AcademicRecords,
        course_id: CourseId,
        query: &TermOptionsQuery,
        today: NaiveDate,
    ) -> Result<TermOptions, AppError> {
        let course = Self::require_course(records, course_id).await?;
        let persisted = records
            .list_persisted_academic_years()
            .await
            .map_err(SourceError::into_app_error)?;

        Ok(TermOptions {
            course_id,
            years_of_study: Self::years_of_study(Some(&course)),
            semesters: Self::semester_options(Some(&course), query.year_of_study),
            academic_years: Self::academic_year_window(today, &persisted).to_vec(),
            batch: derive_batch(query.academic_year.as_deref(), query.year_of_study),
        })
    }

    #[instrument(skip(records))]
    pub async fn list_terms(
        records: &dyn AcademicRecords,
        filters: &TermFilterParams,
    ) -> Result<Vec<TermWithBatch>, AppError> {
        let terms = records
            .list_terms(filters)
            .await
            .map_err(SourceError::into_app_error)?;

        // Terms saved against a persisted year carry only its ID
        let persisted = if terms.iter().any(|t| t.academic_year_label.is_none()) {
            records
                .list_persisted_academic_years()
                .await
                .map_err(SourceError::into_app_error)?
        } else {
            Vec::new()
        };

        Ok(terms
            .into_iter()
            .map(|term| TermWithBatch::resolve(term, &persisted))
            .collect())
    }

    /// Create a term after checking it against the course's structure.
    #[instrument(skip(records))]
    pub async fn create_term(
        records: &dyn AcademicRecords,
        dto: CreateTermDto,
    ) -> Result<Term, AppError> {
        let course = Self::require_course(records, dto.course_id).await?;

        if course.college_id != dto.college_id {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Course {} does not belong to college {}",
                course.id,
                dto.college_id
            )));
        }

        if !Self::years_of_study(Some(&course)).contains(&dto.year_of_study) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Year of study must be between 1 and {}",
                course.total_years
            )));
        }

        let semesters = Self::semester_options(Some(&course), Some(dto.year_of_study));
        if !semesters.contains(&dto.semester_number) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Year {} of {} has {} semester(s)",
                dto.year_of_study,
                course.name,
                semesters.len()
            )));
        }

        if let Some(academic_year_id) = dto.academic_year_id {
            let persisted = records
                .list_persisted_academic_years()
                .await
                .map_err(SourceError::into_app_error)?;

            if !persisted.iter().any(|year| year.id == academic_year_id) {
                return Err(AppError::not_found(anyhow::anyhow!(
                    "Academic year not found"
                )));
            }
        }

        let term = records
            .create_term(&dto)
            .await
            .map_err(SourceError::into_app_error)?;

        debug!(term_id = %term.id, "Term created");
        Ok(term)
    }

    async fn require_course(
        records: &dyn AcademicRecords,
        course_id: CourseId,
    ) -> Result<Course, AppError> {
        records
            .get_course(course_id)
            .await
            .map_err(SourceError::into_app_error)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusdesk_models::courses::YearSemesterConfig;
    use campusdesk_models::ids::{AcademicYearId, CollegeId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn course(total_years: i32, config: Option<Vec<(i32, i32)>>) -> Course {
        Course {
            id: CourseId::from_u128(10),
            college_id: CollegeId::from_u128(1),
            name: "B.Tech".to_string(),
            code: Some("BT".to_string()),
            total_years,
            semesters_per_year: None,
            year_semester_config: config.map(|entries| {
                entries
                    .into_iter()
                    .map(|(year, semesters)| YearSemesterConfig { year, semesters })
                    .collect()
            }),
        }
    }

    #[test]
    fn test_window_without_persisted_years_is_synthetic() {
        let window = TermService::academic_year_window(date(2026, 10, 19), &[]);
        let labels: Vec<_> = window.iter().map(|y| y.year_label.as_str()).collect();

        assert_eq!(labels, ["2025-2026", "2026-2027", "2027-2028"]);
        assert!(window.iter().all(|y| !y.exists_in_db && y.id.is_none() && y.is_active));
    }

    #[test]
    fn test_window_merges_persisted_by_normalized_label() {
        let persisted = vec![
            PersistedAcademicYear {
                id: AcademicYearId::from_u128(7),
                year_label: "2026".to_string(),
                is_active: false,
            },
            PersistedAcademicYear {
                id: AcademicYearId::from_u128(8),
                year_label: "2019-2020".to_string(),
                is_active: true,
            },
        ];

        let window = TermService::academic_year_window(date(2026, 1, 5), &persisted);

        assert!(!window[0].exists_in_db);
        assert_eq!(window[1].year_label, "2026-2027");
        assert_eq!(window[1].id, Some(AcademicYearId::from_u128(7)));
        assert!(window[1].exists_in_db);
        assert!(!window[1].is_active);
        assert!(!window[2].exists_in_db);
    }

    #[test]
    fn test_years_of_study() {
        assert_eq!(TermService::years_of_study(Some(&course(4, None))), [1, 2, 3, 4]);
        assert!(TermService::years_of_study(None).is_empty());
    }

    #[test]
    fn test_override_applies_only_to_its_year() {
        let course = course(3, Some(vec![(1, 1), (2, 2)]));

        assert_eq!(TermService::semester_options(Some(&course), Some(1)), [1]);
        assert_eq!(TermService::semester_options(Some(&course), Some(2)), [1, 2]);
        assert_eq!(TermService::semester_options(Some(&course), Some(3)), [1, 2]);
    }

    #[test]
    fn test_semester_options_need_course_and_year() {
        let course = course(2, None);

        assert!(TermService::semester_options(None, Some(1)).is_empty());
        assert!(TermService::semester_options(Some(&course), None).is_empty());
    }

    #[test]
    fn test_year_without_override_uses_default_even_beyond_duration() {
        let course = course(2, Some(vec![(1, 1)]));
        assert_eq!(TermService::semester_options(Some(&course), Some(3)), [1, 2]);
    }

    #[test]
    fn test_non_positive_override_offers_nothing() {
        let course = course(2, Some(vec![(1, 0)]));
        assert!(TermService::semester_options(Some(&course), Some(1)).is_empty());
    }
}
