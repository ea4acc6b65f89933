//! HTTP routes exposing the build error workflow.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::types::{AnalyzeRequest, AnalyzeResponse, HealthResponse};
use crate::agent::Agent;
use crate::workflow::analyze_build_log;

/// Shared state for all handlers.
pub struct AppState {
    pub agent: Agent,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/analyze", post(analyze))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api/health - Liveness and model info.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.agent.model().to_string(),
    })
}

/// POST /api/analyze - Run the workflow for one log source.
async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, String)> {
    let log_source = req.log_source.trim();
    if log_source.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "log_source must not be empty".to_string(),
        ));
    }

    let response = analyze_build_log(&state.agent, log_source)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, log_source, "Build error workflow failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Analysis failed: {}", e),
            )
        })?;

    Ok(Json(AnalyzeResponse {
        response: response.content,
        iterations: response.iterations,
        log: response.log,
    }))
}
