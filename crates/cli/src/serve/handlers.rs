//! HTTP route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use careline_core::{knowledge, persona, JourneyError};
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use super::json_error;
use super::state::AppState;
use crate::config::Overrides;
use crate::history::parse_history;

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "service": "careline",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(response))
}

/// GET /api/knowledge-base
pub(crate) async fn handle_knowledge_base() -> impl IntoResponse {
    (StatusCode::OK, Json(knowledge::catalog()))
}

/// GET /api/profile
pub(crate) async fn handle_profile() -> impl IntoResponse {
    (StatusCode::OK, Json(persona::member_profile()))
}

/// GET /api/specialists
pub(crate) async fn handle_specialists() -> impl IntoResponse {
    (StatusCode::OK, Json(persona::team_roster()))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateParams {
    #[serde(default)]
    split: bool,
}

/// POST /api/generate-journey
///
/// The body is optional. A JSON object may carry `seed` and `weeks`;
/// anything unreadable is ignored.
pub(crate) async fn handle_generate_journey(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GenerateParams>,
    body: Bytes,
) -> impl IntoResponse {
    let overrides: Overrides = if body.iter().all(u8::is_ascii_whitespace) {
        Overrides::default()
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|e| {
            warn!("ignoring unreadable generate-journey body: {}", e);
            Overrides::default()
        })
    };

    let config = match overrides.apply(state.config.clone()) {
        Ok(c) => c,
        Err(e) => return json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response(),
    };

    let result = tokio::task::spawn_blocking(move || careline_core::generate(&config)).await;
    let journey = match result {
        Ok(Ok(journey)) => journey,
        Ok(Err(e)) => return json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response(),
        Err(e) => {
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("generation task failed: {}", e),
            )
            .into_response()
        }
    };

    if params.split {
        (StatusCode::OK, Json(journey.split())).into_response()
    } else {
        (StatusCode::OK, Json(journey.events)).into_response()
    }
}

/// POST /api/explain-decision
///
/// Body: `{"query": string, "journeyData": [...]}`. A missing, empty or
/// non-string query is a 400.
pub(crate) async fn handle_explain_decision(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> impl IntoResponse {
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap_or_default();
    let query = parsed
        .get("query")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    let history = parsed
        .get("journeyData")
        .map(parse_history)
        .unwrap_or_default();

    let mut rng = match state.config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    match careline_core::explain(&query, &history, &mut rng) {
        Ok(explanation) => {
            info!(
                "explain: query={:?} source={:?} items={}",
                query,
                explanation.source,
                history.len()
            );
            (StatusCode::OK, Json(explanation)).into_response()
        }
        Err(e @ JourneyError::EmptyQuery) => {
            json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response()
        }
        Err(e) => json_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()).into_response(),
    }
}
