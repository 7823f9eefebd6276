use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::assessment::personality;
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::routes::require_user;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/:username/personality-test", post(submit))
        .route("/users/:username/personality-test/result", get(result))
}

#[derive(Debug, Deserialize)]
struct SubmitRequest {
    /// Question id (as a JSON object key) to Likert value.
    responses: BTreeMap<u32, i32>,
}

async fn submit(
    State(state): State<AppState>,
    Path(username): Path<String>,
    JsonBody(req): JsonBody<SubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = require_user(&state, &username)?;
    let outcome = personality::analyze(&req.responses)?;
    state
        .store()
        .set_personality_result(&user.username, &outcome)?;
    tracing::info!(
        username = %user.username,
        personality_type = %outcome.personality_type,
        answered = outcome.answered,
        "Personality test scored"
    );
    Ok(ok(outcome))
}

async fn result(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = require_user(&state, &username)?;
    let stored = state
        .store()
        .get_personality_result(&user.username)?
        .ok_or_else(|| AppError::not_found("Personality result not found"))?;
    Ok(ok(stored))
}
