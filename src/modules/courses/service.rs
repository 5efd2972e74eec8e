use tracing::instrument;

use campusdesk_core::AppError;
use campusdesk_models::ids::CourseId;

use crate::modules::courses::model::{Course, CourseFilterParams};
use crate::sources::{AcademicRecords, SourceError};

pub struct CourseService;

impl CourseService {
    #[instrument(skip(records))]
    pub async fn list_courses(
        records: &dyn AcademicRecords,
        filters: &CourseFilterParams,
    ) -> Result<Vec<Course>, AppError> {
        records
            .list_courses(filters.college_id())
            .await
            .map_err(SourceError::into_app_error)
    }

    #[instrument(skip(records))]
    pub async fn get_course(
        records: &dyn AcademicRecords,
        id: CourseId,
    ) -> Result<Course, AppError> {
        records
            .get_course(id)
            .await
            .map_err(SourceError::into_app_error)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }
}
