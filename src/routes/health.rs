use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .route("/database", get(database_health))
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSecs": state.uptime_secs(),
        "gapQuestions": state.gap().pool().len(),
        "technicalQuestions": state.technical().bank().len(),
        "llmEnabled": state.llm().is_enabled(),
    }))
}

async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Ready once the store answers; empty question banks are reported but do
/// not fail readiness.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let store_ok = state.store().user_exists("__health_check__").is_ok();
    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(serde_json::json!({
            "ready": store_ok,
            "gapBankLoaded": !state.gap().pool().is_empty(),
            "technicalBankLoaded": !state.technical().bank().is_empty(),
        })),
    )
}

async fn database_health(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let healthy = state.store().user_exists("__health_check__").is_ok();
    let latency_us = start.elapsed().as_micros() as u64;

    Json(serde_json::json!({
        "healthy": healthy,
        "latencyUs": latency_us,
        "users": state.store().count_users(),
    }))
}
