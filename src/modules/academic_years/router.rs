use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_academic_year_window, get_academic_years};

/// Initialize the academic years router
/// Routes: GET /, GET /window
pub fn init_academic_years_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_academic_years))
        .route("/window", get(get_academic_year_window))
}
