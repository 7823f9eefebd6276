pub mod final_report;
pub mod health;
pub mod personality_test;
pub mod users;

use axum::extract::DefaultBodyLimit;
use axum::Router;

use crate::constants::MAX_BODY_BYTES;
use crate::middleware::request_id;
use crate::response::AppError;
use crate::state::AppState;
use crate::store::operations::users::User;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(users::router())
        .merge(gap_test::router())
        .merge(technical_test::router())
        .merge(personality_test::router())
        .merge(final_report::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::router())
        .fallback(fallback_404)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}

async fn fallback_404() -> AppError {
    AppError::not_found("Route not found")
}

/// Every per-user route works on a registered user only.
pub(crate) fn require_user(state: &AppState, username: &str) -> Result<User, AppError> {
    state
        .store()
        .get_user(username)?
        .ok_or_else(|| AppError::not_found("User not found"))
}
