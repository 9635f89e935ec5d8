use axum::{extract::State, routing::get, Json, Router};
use axum_extra::extract::WithRejection;
use tracing::instrument;

use super::{
    dto::{CreateTodoRequest, TodoListResponse, TodoResponse},
    services::create_todo,
};
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn todo_routes() -> Router<AppState> {
    Router::new().route("/todos", get(list_todos).post(post_todo))
}

#[instrument(skip(state))]
pub async fn list_todos(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<TodoListResponse>, AppError> {
    let todos = state.todos.list(identity.id).await?;
    Ok(Json(TodoListResponse {
        success: true,
        todos,
    }))
}

#[instrument(skip(state, payload))]
pub async fn post_todo(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    WithRejection(Json(payload), _): WithRejection<Json<CreateTodoRequest>, AppError>,
) -> Result<Json<TodoResponse>, AppError> {
    let todo = create_todo(state.todos.as_ref(), identity.id, payload.text.as_deref()).await?;
    Ok(Json(TodoResponse {
        success: true,
        todo,
    }))
}
