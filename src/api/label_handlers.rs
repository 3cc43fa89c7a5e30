//! Label API handlers

use crate::api::AppError;
use crate::domain::{LabelCreate, LabelPatch};
use crate::store::models::Label;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct LabelResponse {
    pub id: i64,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<Label> for LabelResponse {
    fn from(label: Label) -> Self {
        Self {
            id: label.id,
            name: label.name,
            created_at: label.created_at,
        }
    }
}

pub async fn list_labels(
    State(state): State<AppState>,
) -> Result<Json<Vec<LabelResponse>>, AppError> {
    let labels = state.labels().list().await?;
    Ok(Json(labels.into_iter().map(LabelResponse::from).collect()))
}

pub async fn get_label(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LabelResponse>, AppError> {
    Ok(Json(state.labels().get(id).await?.into()))
}

pub async fn create_label(
    State(state): State<AppState>,
    Json(data): Json<LabelCreate>,
) -> Result<(StatusCode, Json<LabelResponse>), AppError> {
    let label = state.labels().create(data).await?;
    Ok((StatusCode::CREATED, Json(label.into())))
}

pub async fn update_label(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<LabelPatch>,
) -> Result<Json<LabelResponse>, AppError> {
    Ok(Json(state.labels().update(id, patch).await?.into()))
}

/// Rejected with 409 while any task still carries this label.
pub async fn delete_label(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.labels().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
