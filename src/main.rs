use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use servicemart::config::AppConfig;
use servicemart::db;
use servicemart::handlers;
use servicemart::services::backend::rest::RestBackend;
use servicemart::services::notify::rest::RestNotifications;
use servicemart::state::{AppState, BackendState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    if config.serve_backend {
        let conn = db::init_db(&config.database_url)?;
        let backend_app = handlers::backend::router(Arc::new(BackendState::new(conn)))
            .layer(TraceLayer::new_for_http());

        let addr = format!("0.0.0.0:{}", config.backend_port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("starting embedded backend on {addr}");

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, backend_app).await {
                tracing::error!(error = %e, "embedded backend stopped");
            }
        });
    }

    tracing::info!("using booking backend at {}", config.backend_url);
    let state = Arc::new(AppState::new(
        Box::new(RestBackend::new(config.backend_url.clone(), config.request_timeout)?),
        Box::new(RestBackend::new(config.backend_url.clone(), config.request_timeout)?),
        Box::new(RestNotifications::new(config.backend_url.clone(), config.request_timeout)?),
        Box::new(RestNotifications::new(config.backend_url.clone(), config.request_timeout)?),
    ));

    let app = handlers::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
