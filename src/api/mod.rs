//! HTTP API: error mapping, routes and per-entity handlers.

pub mod auth_handlers;
pub mod label_handlers;
pub mod routes;
pub mod status_handlers;
pub mod task_handlers;
pub mod user_handlers;

pub use routes::create_router;

use crate::domain;
use axum::{http::StatusCode, response::IntoResponse, Json};

/// API error type, translated into a protocol response at the boundary.
#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(e) => {
                tracing::error!("internal error: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<domain::Error> for AppError {
    fn from(err: domain::Error) -> Self {
        match err {
            domain::Error::NotFound { .. } => AppError::NotFound(err.to_string()),
            domain::Error::MissingReference(_) | domain::Error::Validation(_) => {
                AppError::BadRequest(err.to_string())
            }
            domain::Error::Conflict(_) => AppError::Conflict(err.to_string()),
            domain::Error::Internal(e) => AppError::Internal(e),
        }
    }
}
