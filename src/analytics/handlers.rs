use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::{
    dto::{Summary, TrendsResponse},
    services,
};
use crate::{
    auth::extractors::CurrentUser,
    error::AppError,
    state::AppState,
    tasks::{repo_types::Task, services::recent_tasks},
};

pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/summary", get(get_summary))
        .route("/analytics/trends", get(get_trends))
}

async fn all_tasks(state: &AppState, user: &CurrentUser) -> Result<Vec<Task>, AppError> {
    recent_tasks(state.tasks.as_ref(), user.0.id).await
}

#[instrument(skip_all)]
pub async fn get_summary(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Summary>, AppError> {
    let tasks = all_tasks(&state, &user).await?;
    Ok(Json(services::summary(&tasks)))
}

#[instrument(skip_all)]
pub async fn get_trends(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<TrendsResponse>, AppError> {
    let tasks = all_tasks(&state, &user).await?;
    Ok(Json(TrendsResponse {
        trends: services::trends(&tasks),
    }))
}
