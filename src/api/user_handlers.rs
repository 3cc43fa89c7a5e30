//! User API handlers

use crate::api::AppError;
use crate::domain::{UserCreate, UserPatch};
use crate::store::models::User;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Response types
// ============================================================================

/// Wire representation of a user; the password digest never leaves the store.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.users().list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(state.users().get(id).await?.into()))
}

/// Registration — the one write endpoint that requires no token.
pub async fn create_user(
    State(state): State<AppState>,
    Json(data): Json<UserCreate>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = state.users().create(data).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(state.users().update(id, patch).await?.into()))
}

/// Rejected with 409 while the user is still an author or assignee of any
/// task.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.users().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
