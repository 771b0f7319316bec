use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::{self, AppState};
use crate::config::ClimascopeConfig;
use crate::lookup::LiveOrchestrator;

/// Build the full application: JSON API under `/api`, optional widget files as fallback
pub fn app(config: &ClimascopeConfig, orchestrator: LiveOrchestrator) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = Arc::new(AppState::new(orchestrator, &config.map));
    let app = Router::new().nest("/api", api::router(state));

    let app = match &config.server.static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    };

    app.layer(ServiceBuilder::new().layer(cors))
}

pub async fn run(config: &ClimascopeConfig, port: u16) -> Result<()> {
    let orchestrator = LiveOrchestrator::from_config(config)?;
    let app = app(config, orchestrator);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", port);
    axum::serve(listener, app)
        .await
        .with_context(|| "Web server stopped unexpectedly")?;
    Ok(())
}
