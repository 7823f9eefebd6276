use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;

use crate::assessment::report;
use crate::response::{created, ok, AppError};
use crate::routes::require_user;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/users/:username/final-report",
        post(generate).get(get_report),
    )
}

async fn generate(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = require_user(&state, &username)?;
    let generated =
        report::generate(state.store(), state.gap(), state.llm(), &user.username).await?;
    Ok(created(generated))
}

async fn get_report(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = require_user(&state, &username)?;
    let stored = state
        .store()
        .get_final_report(&user.username)?
        .ok_or_else(|| AppError::not_found("Final report not found"))?;
    Ok(ok(stored))
}
