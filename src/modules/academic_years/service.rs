use chrono::NaiveDate;
use tracing::instrument;

use campusdesk_core::AppError;

use crate::modules::academic_years::model::{AcademicYear, PersistedAcademicYear};
use crate::modules::terms::service::TermService;
use crate::sources::{AcademicRecords, SourceError};

pub struct AcademicYearService;

impl AcademicYearService {
    #[instrument(skip(records))]
    pub async fn list_academic_years(
        records: &dyn AcademicRecords,
    ) -> Result<Vec<PersistedAcademicYear>, AppError> {
        records
            .list_persisted_academic_years()
            .await
            .map_err(SourceError::into_app_error)
    }

    /// Prior, current and next academic years around `today`.
    #[instrument(skip(records))]
    pub async fn window(
        records: &dyn AcademicRecords,
        today: NaiveDate,
    ) -> Result<Vec<AcademicYear>, AppError> {
        let persisted = Self::list_academic_years(records).await?;
        Ok(TermService::academic_year_window(today, &persisted).to_vec())
    }
}
