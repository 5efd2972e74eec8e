use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_term, get_terms};

/// Initialize the terms router
/// Routes: GET /, POST /
pub fn init_terms_router() -> Router<AppState> {
    Router::new().route("/", get(get_terms).post(create_term))
}
