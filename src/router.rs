use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use campusdesk_cache::X_CACHE;
use campusdesk_config::CorsConfig;
use campusdesk_observability::{logging_middleware, metrics_app, metrics_middleware};
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::modules::academic_years::router::init_academic_years_router;
use crate::modules::calendar::router::init_calendar_router;
use crate::modules::courses::router::init_courses_router;
use crate::modules::terms::router::init_terms_router;
use crate::state::AppState;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allows_any() {
        AllowOrigin::any()
    } else {
        let allowed_origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        AllowOrigin::list(allowed_origins)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::IF_NONE_MATCH,
        ])
        .expose_headers([header::ETAG, X_CACHE])
}

pub fn init_router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/academic-years", init_academic_years_router())
                .nest("/courses", init_courses_router())
                .nest("/terms", init_terms_router())
                .nest(
                    "/calendar",
                    init_calendar_router(state.calendar_config.cache_max_age),
                ),
        )
        .with_state(state.clone());

    if let Some(handle) = state.metrics.clone() {
        router = router.merge(metrics_app(handle));
    }

    router
        .layer(cors_layer(&state.cors_config))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
