use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use campusdesk_models::calendar::{CreateInstituteHolidayDto, InstituteHoliday, MonthKey};
use campusdesk_models::courses::{Course, YearSemesterConfig};
use campusdesk_models::ids::{CollegeId, CourseId};
use campusdesk_models::{
    CreateTermDto, PersistedAcademicYear, Term, TermFilterParams, normalize_year_label,
};

use super::{AcademicRecords, AttendanceLedger, InstituteHolidayStore, SourceError};

const TERM_COLUMNS: &str = "id, college_id, course_id, batch_label, academic_year_id, \
     academic_year_label, year_of_study, semester_number, start_date, end_date";

/// Postgres-backed academic records, institute holidays and attendance.
#[derive(Clone, Debug)]
pub struct PgRecords {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct CourseRow {
    id: CourseId,
    college_id: CollegeId,
    name: String,
    code: Option<String>,
    total_years: i32,
    semesters_per_year: Option<i32>,
    year_semester_config: Option<Json<Vec<YearSemesterConfig>>>,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Self {
            id: row.id,
            college_id: row.college_id,
            name: row.name,
            code: row.code,
            total_years: row.total_years,
            semesters_per_year: row.semesters_per_year,
            year_semester_config: row.year_semester_config.map(|Json(config)| config),
        }
    }
}

/// Turns constraint violations into a rejection the caller can act on.
fn map_write_error(e: sqlx::Error) -> SourceError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return SourceError::Rejected(
                "Referenced college, course or academic year does not exist".to_string(),
            );
        }
        if db_err.is_check_violation() {
            return SourceError::Rejected(format!(
                "Record violates constraint {}",
                db_err.constraint().unwrap_or("unknown")
            ));
        }
    }
    SourceError::Database(e)
}

impl PgRecords {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }
}

#[async_trait]
impl AcademicRecords for PgRecords {
    #[instrument(skip(self))]
    async fn list_persisted_academic_years(
        &self,
    ) -> Result<Vec<PersistedAcademicYear>, SourceError> {
        let years = sqlx::query_as::<_, PersistedAcademicYear>(
            "SELECT id, year_label, is_active FROM academic_years ORDER BY year_label",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(years)
    }

    #[instrument(skip(self))]
    async fn list_courses(
        &self,
        college_id: Option<CollegeId>,
    ) -> Result<Vec<Course>, SourceError> {
        let rows = sqlx::query_as::<_, CourseRow>(
            r#"SELECT id, college_id, name, code, total_years, semesters_per_year, year_semester_config
               FROM courses
               WHERE ($1::uuid IS NULL OR college_id = $1)
               ORDER BY name"#,
        )
        .bind(college_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Course::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, SourceError> {
        let row = sqlx::query_as::<_, CourseRow>(
            r#"SELECT id, college_id, name, code, total_years, semesters_per_year, year_semester_config
               FROM courses WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Course::from))
    }

    #[instrument(skip(self))]
    async fn list_terms(&self, filters: &TermFilterParams) -> Result<Vec<Term>, SourceError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {TERM_COLUMNS} FROM terms WHERE TRUE"));

        if let Some(college_id) = filters.college_id() {
            query.push(" AND college_id = ").push_bind(college_id);
        }
        if let Some(course_id) = filters.course_id() {
            query.push(" AND course_id = ").push_bind(course_id);
        }
        if let Some(year) = filters.year_of_study {
            query.push(" AND year_of_study = ").push_bind(year);
        }
        if let Some(semester) = filters.semester_number {
            query.push(" AND semester_number = ").push_bind(semester);
        }
        query.push(" ORDER BY start_date DESC, year_of_study, semester_number");

        let terms = query.build_query_as::<Term>().fetch_all(&self.db).await?;
        Ok(terms)
    }

    #[instrument(skip(self))]
    async fn create_term(&self, dto: &CreateTermDto) -> Result<Term, SourceError> {
        let batch_label = dto
            .batch_label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty());

        let term = sqlx::query_as::<_, Term>(&format!(
            r#"INSERT INTO terms (college_id, course_id, batch_label, academic_year_id,
                   academic_year_label, year_of_study, semester_number, start_date, end_date)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING {TERM_COLUMNS}"#
        ))
        .bind(dto.college_id)
        .bind(dto.course_id)
        .bind(batch_label)
        .bind(dto.academic_year_id)
        .bind(normalize_year_label(dto.academic_year_label.as_deref()))
        .bind(dto.year_of_study)
        .bind(dto.semester_number)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .fetch_one(&self.db)
        .await
        .map_err(map_write_error)?;

        Ok(term)
    }
}

#[async_trait]
impl InstituteHolidayStore for PgRecords {
    #[instrument(skip(self))]
    async fn list_institute_holidays(
        &self,
        month: MonthKey,
    ) -> Result<Vec<InstituteHoliday>, SourceError> {
        let holidays = sqlx::query_as::<_, InstituteHoliday>(
            r#"SELECT holiday_date AS date, title, description
               FROM institute_holidays
               WHERE holiday_date BETWEEN $1 AND $2
               ORDER BY holiday_date"#,
        )
        .bind(month.first_day())
        .bind(month.last_day())
        .fetch_all(&self.db)
        .await?;

        Ok(holidays)
    }

    #[instrument(skip(self))]
    async fn create_institute_holiday(
        &self,
        dto: &CreateInstituteHolidayDto,
    ) -> Result<InstituteHoliday, SourceError> {
        let holiday = sqlx::query_as::<_, InstituteHoliday>(
            r#"INSERT INTO institute_holidays (holiday_date, title, description)
               VALUES ($1, $2, $3)
               ON CONFLICT (holiday_date)
               DO UPDATE SET title = EXCLUDED.title, description = EXCLUDED.description
               RETURNING holiday_date AS date, title, description"#,
        )
        .bind(dto.date)
        .bind(dto.title.trim())
        .bind(dto.description.as_deref())
        .fetch_one(&self.db)
        .await
        .map_err(map_write_error)?;

        Ok(holiday)
    }

    #[instrument(skip(self))]
    async fn delete_institute_holiday(&self, date: NaiveDate) -> Result<(), SourceError> {
        sqlx::query("DELETE FROM institute_holidays WHERE holiday_date = $1")
            .bind(date)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl AttendanceLedger for PgRecords {
    #[instrument(skip(self))]
    async fn submitted_dates(&self, month: MonthKey) -> Result<BTreeSet<NaiveDate>, SourceError> {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            r#"SELECT DISTINCT attendance_date
               FROM attendance_submissions
               WHERE attendance_date BETWEEN $1 AND $2"#,
        )
        .bind(month.first_day())
        .bind(month.last_day())
        .fetch_all(&self.db)
        .await?;

        Ok(dates.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_row_unwraps_json_config() {
        let row = CourseRow {
            id: CourseId::from_u128(1),
            college_id: CollegeId::from_u128(2),
            name: "Diploma".to_string(),
            code: None,
            total_years: 2,
            semesters_per_year: None,
            year_semester_config: Some(Json(vec![YearSemesterConfig {
                year: 1,
                semesters: 1,
            }])),
        };

        let course = Course::from(row);
        assert_eq!(course.semester_count(1), 1);
        assert_eq!(course.semester_count(2), 2);
    }

    #[test]
    fn test_non_database_errors_pass_through() {
        let err = map_write_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, SourceError::Database(sqlx::Error::RowNotFound)));
    }
}
