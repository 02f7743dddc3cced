use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::model::TodoItem;
use crate::service::ServiceError;

use super::{
    models::{ErrorResponse, HealthResponse, StatusResponse, TodoResponse},
    AppState,
};

pub async fn index() -> impl IntoResponse {
    Html(include_str!("../../templates/index.html"))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            uptime_secs,
        }),
    )
}

pub async fn list_todos(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.get_all() {
        Ok(todos) => {
            let todos: Vec<TodoResponse> = todos
                .into_iter()
                .map(|(id, item)| TodoResponse::new(id, item))
                .collect();
            Json(todos).into_response()
        }
        Err(err) => internal_error("listing todos", &err),
    }
}

pub async fn add_todo(
    State(state): State<AppState>,
    Json(item): Json<TodoItem>,
) -> impl IntoResponse {
    match state.service.add(item) {
        Ok(stored) => Json(TodoResponse::new(stored.id, stored.item)).into_response(),
        Err(err) => internal_error("adding todo", &err),
    }
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(item): Json<TodoItem>,
) -> impl IntoResponse {
    match state.service.update(id, item) {
        Ok(success) => Json(StatusResponse { success }).into_response(),
        Err(err) => internal_error("updating todo", &err),
    }
}

pub async fn remove_todo(State(state): State<AppState>, Path(id): Path<u64>) -> impl IntoResponse {
    match state.service.remove(id) {
        Ok(success) => Json(StatusResponse { success }).into_response(),
        Err(err) => internal_error("removing todo", &err),
    }
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "endpoint not found".to_string(),
        }),
    )
}

fn internal_error(what: &str, err: &ServiceError) -> Response {
    log::error!("Failed {}: {}", what, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            message: err.to_string(),
        }),
    )
        .into_response()
}
