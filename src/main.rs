use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use campusdesk::router::init_router;
use campusdesk::state::init_app_state;
use campusdesk_config::ServerConfig;
use campusdesk_db::{init_db_pool, run_migrations};
use campusdesk_observability::{init_metrics, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing()?;
    let metrics = init_metrics()?;

    let db = init_db_pool().await?;
    run_migrations(&db).await?;

    let state = init_app_state(db, metrics)?;
    let app = init_router(state);

    let server = ServerConfig::from_env();
    let address = server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!(%address, "Server running");
    info!("Swagger UI available at http://{address}/swagger-ui");
    info!("Scalar UI available at http://{address}/scalar");

    axum::serve(listener, app)
        .await
        .context("Server error")
}
