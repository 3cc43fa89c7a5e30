//! Task API handlers

use crate::api::AppError;
use crate::auth::AuthUser;
use crate::domain::{TaskCreate, TaskFilter, TaskPatch};
use crate::store::models::Task;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

// ============================================================================
// Response types
// ============================================================================

/// Wire representation of a task. The status travels as its slug; the label
/// set as `taskLabelIds`, matching the create/update payload field.
#[derive(Serialize)]
pub struct TaskResponse {
    pub id: i64,
    pub index: Option<i64>,
    pub title: String,
    pub content: Option<String>,
    pub author_id: i64,
    pub assignee_id: Option<i64>,
    pub status: String,
    #[serde(rename = "taskLabelIds")]
    pub label_ids: Vec<i64>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl TaskResponse {
    fn new(task: Task, status_slug: String) -> Self {
        Self {
            id: task.id,
            index: task.index,
            title: task.title,
            content: task.content,
            author_id: task.author_id,
            assignee_id: task.assignee_id,
            status: status_slug,
            label_ids: task.label_ids.into_iter().collect(),
            created_at: task.created_at,
        }
    }
}

/// Resolve the status slug for a single task response. The store enforces
/// the status foreign key, so a missing row is an internal inconsistency.
async fn respond(state: &AppState, task: Task) -> Result<TaskResponse, AppError> {
    let status = state
        .statuses()
        .get(task.status_id)
        .await
        .map_err(|_| AppError::Internal(anyhow::anyhow!("task {} has no status row", task.id)))?;
    Ok(TaskResponse::new(task, status.slug))
}

// ============================================================================
// Handlers
// ============================================================================

/// List tasks matching the query filter. Sets `X-Total-Count` to the number
/// of results.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> Result<impl IntoResponse, AppError> {
    let tasks = state.tasks().list(&filter).await?;

    let slugs: HashMap<i64, String> = state
        .statuses()
        .list()
        .await?
        .into_iter()
        .map(|s| (s.id, s.slug))
        .collect();

    let responses: Vec<TaskResponse> = tasks
        .into_iter()
        .map(|task| {
            let slug = slugs.get(&task.status_id).cloned().unwrap_or_default();
            TaskResponse::new(task, slug)
        })
        .collect();

    Ok((
        [("x-total-count", responses.len().to_string())],
        Json(responses),
    ))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TaskResponse>, AppError> {
    let task = state.tasks().get(id).await?;
    Ok(Json(respond(&state, task).await?))
}

/// Create a task authored by the authenticated user.
pub async fn create_task(
    State(state): State<AppState>,
    user: AuthUser,
    Json(data): Json<TaskCreate>,
) -> Result<(StatusCode, Json<TaskResponse>), AppError> {
    let task = state.tasks().create(data, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(respond(&state, task).await?)))
}

/// Apply a sparse update. Fields absent from the body stay unchanged;
/// explicit nulls clear clearable fields.
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<TaskResponse>, AppError> {
    let task = state.tasks().update(id, patch).await?;
    Ok(Json(respond(&state, task).await?))
}

/// Delete a task; only its author may do so.
pub async fn delete_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.tasks().delete(id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
