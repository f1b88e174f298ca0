//! Local demo authentication server

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::LocalAuthBackend;
use crate::config::Config;
use crate::error::Result;

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub backend: LocalAuthBackend,
}

pub type SharedState = Arc<AppState>;

/// Run the demo server on the configured host and port
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Demo authentication server listening on {}", addr);
    serve(config, listener).await
}

/// Serve on an already bound listener
pub async fn serve(config: Config, listener: TcpListener) -> Result<()> {
    let backend = LocalAuthBackend::from_config(&config.server)?;
    let state = Arc::new(AppState { backend });

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/auth/login/", post(routes::login))
        .route("/api/auth/refresh/", post(routes::refresh))
        .route("/api/token/refresh/", post(routes::refresh))
        .route("/api/auth/user/", get(routes::current_user))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
