use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use campusdesk_cache::{CacheControlConfig, cache_control, etag_middleware};

use crate::state::AppState;

use super::controller::{
    create_institute_holiday, delete_institute_holiday, get_calendar_month, get_month_state,
};

/// Routes: GET /{month}, GET /{month}/state, POST /holidays, DELETE /holidays/{date}
///
/// Month views carry `Cache-Control` (browser-private, `max_age`) and an
/// `ETag` for conditional requests.
pub fn init_calendar_router(max_age: Duration) -> Router<AppState> {
    let month_views = Router::new()
        .route("/{month}", get(get_calendar_month))
        .layer(cache_control(
            CacheControlConfig::private(max_age.as_secs()).with_must_revalidate(),
        ))
        .layer(middleware::from_fn(etag_middleware));

    Router::new()
        .merge(month_views)
        .route("/{month}/state", get(get_month_state))
        .route("/holidays", post(create_institute_holiday))
        .route("/holidays/{date}", delete(delete_institute_holiday))
}
