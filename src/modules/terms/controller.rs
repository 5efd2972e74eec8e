use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::instrument;

use campusdesk_core::AppError;

use crate::modules::terms::model::{CreateTermDto, Term, TermFilterParams, TermWithBatch};
use crate::modules::terms::service::TermService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List terms with their effective batch
#[utoipa::path(
    get,
    path = "/api/terms",
    summary = "List terms",
    params(TermFilterParams),
    responses(
        (status = 200, description = "Terms, newest first", body = Vec<TermWithBatch>),
        (status = 502, description = "Records store unavailable")
    ),
    tag = "Terms"
)]
#[instrument(skip(state))]
pub async fn get_terms(
    State(state): State<AppState>,
    Query(filters): Query<TermFilterParams>,
) -> Result<Json<Vec<TermWithBatch>>, AppError> {
    let terms = TermService::list_terms(state.records.as_ref(), &filters).await?;
    Ok(Json(terms))
}

/// Create a term for a course
#[utoipa::path(
    post,
    path = "/api/terms",
    summary = "Create term",
    request_body = CreateTermDto,
    responses(
        (status = 201, description = "Term created", body = Term),
        (status = 400, description = "Invalid input, dates out of order or semester not offered"),
        (status = 404, description = "Course or academic year not found"),
        (status = 409, description = "Term rejected by the records store"),
        (status = 502, description = "Records store unavailable")
    ),
    tag = "Terms"
)]
#[instrument(skip(state))]
pub async fn create_term(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateTermDto>,
) -> Result<(StatusCode, Json<Term>), AppError> {
    let term = TermService::create_term(state.records.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(term)))
}
