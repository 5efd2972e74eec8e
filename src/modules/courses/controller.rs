use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Local;
use tracing::instrument;
use uuid::Uuid;

use campusdesk_core::AppError;
use campusdesk_models::ids::CourseId;

use crate::modules::courses::model::{Course, CourseFilterParams};
use crate::modules::courses::service::CourseService;
use crate::modules::terms::model::{TermOptions, TermOptionsQuery};
use crate::modules::terms::service::TermService;
use crate::state::AppState;

/// List courses
#[utoipa::path(
    get,
    path = "/api/courses",
    summary = "List courses",
    params(CourseFilterParams),
    responses(
        (status = 200, description = "Courses ordered by name", body = Vec<Course>),
        (status = 502, description = "Records store unavailable")
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_courses(
    State(state): State<AppState>,
    Query(filters): Query<CourseFilterParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = CourseService::list_courses(state.records.as_ref(), &filters).await?;
    Ok(Json(courses))
}

/// Get a course by ID
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    summary = "Get course by ID",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course details", body = Course),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::get_course(state.records.as_ref(), CourseId::from(id)).await?;
    Ok(Json(course))
}

/// Get the term-picker options for a course
#[utoipa::path(
    get,
    path = "/api/courses/{id}/term-options",
    summary = "Get term options",
    params(
        ("id" = Uuid, Path, description = "Course ID"),
        TermOptionsQuery
    ),
    responses(
        (status = 200, description = "Years of study, semesters, academic-year window and batch", body = TermOptions),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_term_options(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TermOptionsQuery>,
) -> Result<Json<TermOptions>, AppError> {
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    let options =
        TermService::term_options(state.records.as_ref(), CourseId::from(id), &query, today)
            .await?;

    Ok(Json(options))
}
