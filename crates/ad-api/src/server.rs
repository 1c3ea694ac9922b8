//! HTTP API Server
//!
//! Starts and manages the axum-based HTTP server, including static serving
//! of the captured completion screenshots.

use axum::Router;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;

use ad_core::Config;

use crate::routes::routes;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}

/// Start the HTTP API server
pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let port = config.api.port;
    let screenshots_dir = config.artifacts.dir.clone();

    let state = AppState { config };

    let app = Router::new()
        .merge(routes())
        .nest_service("/screenshots", ServeDir::new(&screenshots_dir))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("HTTP API listening on {}", addr);
    info!("Serving screenshots from: {}", screenshots_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
