use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Local;
use tracing::instrument;

use campusdesk_core::AppError;

use crate::modules::academic_years::model::{AcademicYear, PersistedAcademicYear, WindowQuery};
use crate::modules::academic_years::service::AcademicYearService;
use crate::state::AppState;

/// List persisted academic years
#[utoipa::path(
    get,
    path = "/api/academic-years",
    summary = "List academic years",
    responses(
        (status = 200, description = "Academic years as stored", body = Vec<PersistedAcademicYear>),
        (status = 502, description = "Records store unavailable")
    ),
    tag = "Academic Years"
)]
#[instrument(skip(state))]
pub async fn get_academic_years(
    State(state): State<AppState>,
) -> Result<Json<Vec<PersistedAcademicYear>>, AppError> {
    let years = AcademicYearService::list_academic_years(state.records.as_ref()).await?;
    Ok(Json(years))
}

/// Get the academic-year window around a date
#[utoipa::path(
    get,
    path = "/api/academic-years/window",
    summary = "Get academic-year window",
    params(WindowQuery),
    responses(
        (status = 200, description = "Prior, current and next academic years", body = Vec<AcademicYear>),
        (status = 502, description = "Records store unavailable")
    ),
    tag = "Academic Years"
)]
#[instrument(skip(state))]
pub async fn get_academic_year_window(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<Vec<AcademicYear>>, AppError> {
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    let window = AcademicYearService::window(state.records.as_ref(), today).await?;
    Ok(Json(window))
}
