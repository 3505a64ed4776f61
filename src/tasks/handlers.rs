use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreateTaskRequest, DeleteTaskResponse, TaskQuery, UpdateTaskRequest},
    repo::{TaskFilter, TaskPatch},
    repo_types::Task,
    services,
};
use crate::{auth::extractors::CurrentUser, error::AppError, state::AppState};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
}

#[instrument(skip_all)]
pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, AppError> {
    let Json(payload) = payload?;
    let task = services::create_task(state.tasks.as_ref(), user.id, payload).await?;
    Ok(Json(task))
}

#[instrument(skip_all)]
pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    query: Result<Query<TaskQuery>, QueryRejection>,
) -> Result<Json<Vec<Task>>, AppError> {
    let Query(query) = query?;
    let filter = TaskFilter::try_from(query)?;
    let tasks = services::list_tasks(state.tasks.as_ref(), user.id, &filter).await?;
    Ok(Json(tasks))
}

#[instrument(skip(state, user))]
pub async fn get_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Task>, AppError> {
    let task_id = services::parse_task_id(&id)?;
    let task = services::get_task(state.tasks.as_ref(), user.id, task_id).await?;
    Ok(Json(task))
}

#[instrument(skip(state, user, payload))]
pub async fn update_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, AppError> {
    let Json(payload) = payload?;
    let task_id = services::parse_task_id(&id)?;
    let patch = TaskPatch::try_from(payload)?;
    let task = services::update_task(state.tasks.as_ref(), user.id, task_id, &patch).await?;
    Ok(Json(task))
}

#[instrument(skip(state, user))]
pub async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteTaskResponse>, AppError> {
    let task_id = services::parse_task_id(&id)?;
    services::delete_task(state.tasks.as_ref(), user.id, task_id).await?;
    Ok(Json(DeleteTaskResponse {
        message: "Task deleted successfully",
    }))
}
