//! `careline serve` -- HTTP JSON API for journey generation and explain.
//!
//! Endpoints:
//! - GET  /health                 - Server status
//! - GET  /api/knowledge-base     - Static topic guidance
//! - GET  /api/profile            - Member profile
//! - GET  /api/specialists        - Care team roster
//! - POST /api/generate-journey   - Generate a journey (`?split=true` for two lists)
//! - POST /api/explain-decision   - Explain a query against journey data
//!
//! All responses use Content-Type: application/json. CORS is permissive.

mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware as axum_middleware, Json, Router};
use careline_core::JourneyConfig;
use log::{error, info};
use tower_http::cors::{Any, CorsLayer};

use self::handlers::{
    handle_explain_decision, handle_generate_journey, handle_health, handle_knowledge_base,
    handle_not_found, handle_profile, handle_specialists,
};
use self::middleware::log_requests;
use self::state::AppState;

/// Maximum request body size: 10 MB.
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"error": message})))
}

fn router(config: JourneyConfig) -> Router {
    let state = Arc::new(AppState::new(config));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/knowledge-base", get(handle_knowledge_base))
        .route("/api/profile", get(handle_profile))
        .route("/api/specialists", get(handle_specialists))
        .route("/api/generate-journey", post(handle_generate_journey))
        .route("/api/explain-decision", post(handle_explain_decision))
        .fallback(handle_not_found)
        .layer(axum_middleware::from_fn(log_requests))
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// Start the HTTP server on the given port. Every generated journey
/// starts from `config`; requests may override the seed and length.
pub async fn start_server(port: u16, config: JourneyConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(config);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("careline listening on http://{}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("server shut down");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received shutdown signal"),
        Err(e) => {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
