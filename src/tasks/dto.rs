use serde::{Deserialize, Serialize};

use super::{
    repo::{TaskFilter, TaskPatch},
    repo_types::{Category, Priority, Status},
};
use crate::error::AppError;

/// Request body for task creation.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub status: Status,
}

/// Request body for a partial update. Absent fields stay untouched; an
/// explicit empty string is applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub status: Option<Status>,
}

impl TryFrom<UpdateTaskRequest> for TaskPatch {
    type Error = AppError;

    fn try_from(req: UpdateTaskRequest) -> Result<Self, Self::Error> {
        if req.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AppError::validation("title", "Title must not be empty"));
        }
        Ok(Self {
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            priority: req.priority,
            category: req.category,
            status: req.status,
        })
    }
}

/// Query string of `GET /tasks`. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    pub category: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

fn parse_field<T: std::str::FromStr<Err = String>>(
    field: &str,
    v: Option<String>,
) -> Result<Option<T>, AppError> {
    non_empty(v)
        .map(|s| s.parse::<T>().map_err(|e| AppError::validation(field, e)))
        .transpose()
}

impl TryFrom<TaskQuery> for TaskFilter {
    type Error = AppError;

    fn try_from(q: TaskQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            category: parse_field("category", q.category)?,
            priority: parse_field("priority", q.priority)?,
            status: parse_field("status", q.status)?,
            search: non_empty(q.search),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    pub message: &'static str,
}
