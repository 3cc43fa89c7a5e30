//! Authentication handler: email/password login issuing a JWT.

use crate::api::AppError;
use crate::auth::{jwt::encode_jwt, password};
use crate::store::EntityStore;
use crate::AppState;
use axum::{extract::State, Json};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/login — verify credentials and return a signed token.
///
/// The response body is the bare token string. Error messages never reveal
/// whether the email exists.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<String, AppError> {
    let invalid_credentials = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = state
        .store
        .get_user_by_email(&req.email)
        .await
        .map_err(|e| AppError::from(e))?
        .ok_or_else(invalid_credentials)?;

    if !password::verify(&req.password, &user.password_digest) {
        return Err(invalid_credentials());
    }

    let token = encode_jwt(
        user.id,
        &user.email,
        &state.config.jwt_secret,
        state.config.jwt_expiry_secs,
    )
    .map_err(AppError::Internal)?;

    tracing::debug!(user_id = user.id, "issued token");
    Ok(token)
}
