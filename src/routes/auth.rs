use axum::{extract::State, Json};

use crate::auth::{self as credentials, Credentials, UserSummary, INVALID_CREDENTIALS};
use crate::error::AppError;
use crate::AppState;

/// Check an email/password pair
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Credentials accepted", body = UserSummary),
        (status = 401, description = "Invalid credentials.")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<Json<UserSummary>, AppError> {
    match credentials::authenticate(&state.db, &body).await? {
        Some(user) => Ok(Json(user)),
        None => Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string())),
    }
}
