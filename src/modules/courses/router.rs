use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_course, get_courses, get_term_options};

/// Initialize the courses router
/// Routes: GET /, GET /{id}, GET /{id}/term-options
pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_courses))
        .route("/{id}", get(get_course))
        .route("/{id}/term-options", get(get_term_options))
}
