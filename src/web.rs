use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::{self, AppState};
use crate::config::SnowDayConfig;

/// Full application router with the API nested under `/api`
pub fn app(config: SnowDayConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(Arc::new(AppState { config })))
        .layer(cors)
}

pub async fn run(config: SnowDayConfig) -> Result<()> {
    let addr = config.bind_address();
    let port = config.server.port;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", port);

    axum::serve(listener, app(config))
        .await
        .context("Web server terminated unexpectedly")?;
    Ok(())
}
