//! Task status API handlers

use crate::api::AppError;
use crate::domain::{StatusCreate, StatusPatch};
use crate::store::models::TaskStatus;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct StatusResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<TaskStatus> for StatusResponse {
    fn from(status: TaskStatus) -> Self {
        Self {
            id: status.id,
            name: status.name,
            slug: status.slug,
            created_at: status.created_at,
        }
    }
}

pub async fn list_statuses(
    State(state): State<AppState>,
) -> Result<Json<Vec<StatusResponse>>, AppError> {
    let statuses = state.statuses().list().await?;
    Ok(Json(statuses.into_iter().map(StatusResponse::from).collect()))
}

pub async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusResponse>, AppError> {
    Ok(Json(state.statuses().get(id).await?.into()))
}

pub async fn create_status(
    State(state): State<AppState>,
    Json(data): Json<StatusCreate>,
) -> Result<(StatusCode, Json<StatusResponse>), AppError> {
    let status = state.statuses().create(data).await?;
    Ok((StatusCode::CREATED, Json(status.into())))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<StatusPatch>,
) -> Result<Json<StatusResponse>, AppError> {
    Ok(Json(state.statuses().update(id, patch).await?.into()))
}

/// Rejected with 409 while any task still carries this status.
pub async fn delete_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.statuses().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
