use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderName, HeaderValue, StatusCode},
};
use chrono::NaiveDate;
use tracing::instrument;

use campusdesk_cache::MonthState;
use campusdesk_core::AppError;

use crate::modules::calendar::grid::build_month_matrix;
use crate::modules::calendar::model::{
    CalendarMonthView, CalendarQuery, CreateInstituteHolidayDto, InstituteHoliday, MonthKey,
    MonthStateResponse,
};
use crate::state::AppState;
use crate::validator::ValidatedJson;

fn parse_month(raw: &str) -> Result<MonthKey, AppError> {
    raw.parse::<MonthKey>().map_err(AppError::bad_request)
}

/// Get a month's calendar
#[utoipa::path(
    get,
    path = "/api/calendar/{month}",
    summary = "Get calendar month",
    params(
        ("month" = String, Path, description = "Month as YYYY-MM", example = "2026-10"),
        CalendarQuery
    ),
    responses(
        (status = 200, description = "Month snapshot and grid; X-Cache is HIT, MISS or FALLBACK", body = CalendarMonthView),
        (status = 304, description = "Not modified (If-None-Match)"),
        (status = 400, description = "Invalid month"),
        (status = 502, description = "Holiday feed failed and fallback=false")
    ),
    tag = "Calendar"
)]
#[instrument(skip(state))]
pub async fn get_calendar_month(
    State(state): State<AppState>,
    Path(month): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> Result<([(HeaderName, HeaderValue); 1], Json<CalendarMonthView>), AppError> {
    let month = parse_month(&month)?;

    let lookup = if query.fallback_enabled() {
        state.calendar.get_or_fallback(month, query.force).await
    } else {
        state.calendar.lookup(month, query.force).await?
    };

    let cells = build_month_matrix(month, Some(&lookup.data));
    let view = CalendarMonthView {
        data: (*lookup.data).clone(),
        cells,
    };

    Ok(([lookup.status.header()], Json(view)))
}

/// Get the cache state of a month
#[utoipa::path(
    get,
    path = "/api/calendar/{month}/state",
    summary = "Get calendar month cache state",
    params(
        ("month" = String, Path, description = "Month as YYYY-MM", example = "2026-10")
    ),
    responses(
        (status = 200, description = "Cache state", body = MonthStateResponse),
        (status = 400, description = "Invalid month")
    ),
    tag = "Calendar"
)]
#[instrument(skip(state))]
pub async fn get_month_state(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<Json<MonthStateResponse>, AppError> {
    let month = parse_month(&month)?;
    let current = state.calendar.state(month)?;

    let error = match &current {
        MonthState::Error(message) => Some(message.clone()),
        _ => None,
    };

    Ok(Json(MonthStateResponse {
        month,
        state: current.as_str().to_string(),
        error,
    }))
}

/// Declare an institute holiday
#[utoipa::path(
    post,
    path = "/api/calendar/holidays",
    summary = "Create institute holiday",
    request_body = CreateInstituteHolidayDto,
    responses(
        (status = 201, description = "Holiday declared; its month is refreshed", body = InstituteHoliday),
        (status = 400, description = "Invalid input"),
        (status = 502, description = "Holiday store unavailable")
    ),
    tag = "Calendar"
)]
#[instrument(skip(state))]
pub async fn create_institute_holiday(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateInstituteHolidayDto>,
) -> Result<(StatusCode, Json<InstituteHoliday>), AppError> {
    let holiday = state
        .calendar
        .create_institute_holiday(state.holiday_store.as_ref(), dto)
        .await?;

    Ok((StatusCode::CREATED, Json(holiday)))
}

/// Remove an institute holiday
#[utoipa::path(
    delete,
    path = "/api/calendar/holidays/{date}",
    summary = "Delete institute holiday",
    params(
        ("date" = NaiveDate, Path, description = "Holiday date (YYYY-MM-DD)")
    ),
    responses(
        (status = 204, description = "Holiday removed; its month is refreshed"),
        (status = 400, description = "Invalid date"),
        (status = 502, description = "Holiday store unavailable")
    ),
    tag = "Calendar"
)]
#[instrument(skip(state))]
pub async fn delete_institute_holiday(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<StatusCode, AppError> {
    state
        .calendar
        .delete_institute_holiday(state.holiday_store.as_ref(), date)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
