use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::CreateTaskRequest,
    repo::{TaskFilter, TaskPatch, TaskStore, LIST_LIMIT},
    repo_types::Task,
};
use crate::{error::AppError, timestamp};

/// Task ids that are not UUIDs cannot name a stored task.
pub fn parse_task_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

#[instrument(skip(store, req))]
pub async fn create_task(
    store: &dyn TaskStore,
    user_id: Uuid,
    req: CreateTaskRequest,
) -> Result<Task, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::validation("title", "Title must not be empty"));
    }

    let now = timestamp::now();
    let task = Task {
        id: Uuid::new_v4(),
        user_id,
        title: req.title,
        description: req.description,
        due_date: req.due_date,
        priority: req.priority,
        category: req.category,
        status: req.status,
        created_at: now.clone(),
        updated_at: now,
    };
    store.insert(&task).await?;

    info!(task_id = %task.id, "task created");
    Ok(task)
}

#[instrument(skip(store))]
pub async fn list_tasks(
    store: &dyn TaskStore,
    user_id: Uuid,
    filter: &TaskFilter,
) -> Result<Vec<Task>, AppError> {
    Ok(store.list(user_id, filter, LIST_LIMIT).await?)
}

/// The owner's newest tasks, up to the list cap, for aggregation.
#[instrument(skip(store))]
pub async fn recent_tasks(store: &dyn TaskStore, user_id: Uuid) -> Result<Vec<Task>, AppError> {
    Ok(store.list_recent(user_id, LIST_LIMIT).await?)
}

#[instrument(skip(store))]
pub async fn get_task(store: &dyn TaskStore, user_id: Uuid, task_id: Uuid) -> Result<Task, AppError> {
    store.get(user_id, task_id).await?.ok_or(AppError::NotFound)
}

#[instrument(skip(store, patch))]
pub async fn update_task(
    store: &dyn TaskStore,
    user_id: Uuid,
    task_id: Uuid,
    patch: &TaskPatch,
) -> Result<Task, AppError> {
    let updated = store
        .update(user_id, task_id, patch, &timestamp::now())
        .await?
        .ok_or_else(|| {
            warn!("update of missing or foreign task");
            AppError::NotFound
        })?;
    info!("task updated");
    Ok(updated)
}

#[instrument(skip(store))]
pub async fn delete_task(store: &dyn TaskStore, user_id: Uuid, task_id: Uuid) -> Result<(), AppError> {
    if !store.delete(user_id, task_id).await? {
        warn!("delete of missing or foreign task");
        return Err(AppError::NotFound);
    }
    info!("task deleted");
    Ok(())
}
