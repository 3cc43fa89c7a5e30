//! API route definitions

use super::{auth_handlers, label_handlers, status_handlers, task_handlers, user_handlers};
use crate::auth::require_auth;
use crate::AppState;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Liveness probe
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Create the API router.
///
/// Login and registration are public; everything else requires a Bearer
/// token.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new()
        .route("/health", get(health))
        .route("/api/login", post(auth_handlers::login))
        .route("/api/users", post(user_handlers::create_user));

    let protected = Router::new()
        // ====================================================================
        // Users
        // ====================================================================
        .route("/api/users", get(user_handlers::list_users))
        .route(
            "/api/users/{id}",
            get(user_handlers::get_user)
                .put(user_handlers::update_user)
                .delete(user_handlers::delete_user),
        )
        // ====================================================================
        // Task statuses
        // ====================================================================
        .route(
            "/api/task_statuses",
            get(status_handlers::list_statuses).post(status_handlers::create_status),
        )
        .route(
            "/api/task_statuses/{id}",
            get(status_handlers::get_status)
                .put(status_handlers::update_status)
                .delete(status_handlers::delete_status),
        )
        // ====================================================================
        // Labels
        // ====================================================================
        .route(
            "/api/labels",
            get(label_handlers::list_labels).post(label_handlers::create_label),
        )
        .route(
            "/api/labels/{id}",
            get(label_handlers::get_label)
                .put(label_handlers::update_label)
                .delete(label_handlers::delete_label),
        )
        // ====================================================================
        // Tasks
        // ====================================================================
        .route(
            "/api/tasks",
            get(task_handlers::list_tasks).post(task_handlers::create_task),
        )
        .route(
            "/api/tasks/{id}",
            get(task_handlers::get_task)
                .put(task_handlers::update_task)
                .delete(task_handlers::delete_task),
        )
        .layer(from_fn_with_state(state.clone(), require_auth));

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
