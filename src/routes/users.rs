use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::extractors::JsonBody;
use crate::response::{created, ok, paginated, AppError};
use crate::routes::require_user;
use crate::state::AppState;
use crate::store::operations::users::User;
use crate::validation::{is_valid_email, validate_fullname, validate_username};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:username", get(get_user))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserRequest {
    username: String,
    fullname: String,
    email: String,
}

async fn create_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let username = req.username.trim();
    validate_username(username).map_err(|msg| AppError::bad_request("INVALID_USERNAME", msg))?;
    validate_fullname(&req.fullname)
        .map_err(|msg| AppError::bad_request("INVALID_FULLNAME", msg))?;
    let email = req.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::bad_request("INVALID_EMAIL", "Email address is invalid"));
    }

    let user = User {
        username: username.to_string(),
        fullname: req.fullname.trim().to_string(),
        email,
        created_at: Utc::now(),
    };
    state.store().create_user(&user)?;
    tracing::info!(username = %user.username, "User registered");

    Ok(created(user))
}

async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(ok(require_user(&state, &username)?))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<usize>,
    offset: Option<usize>,
}

async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);
    let users = state.store().list_users(limit, offset)?;
    Ok(paginated(users, state.store().count_users(), limit, offset))
}
