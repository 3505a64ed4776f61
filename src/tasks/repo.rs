use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Category, Priority, Status, Task, TaskRow};
use crate::error::StoreError;

/// Maximum number of tasks a single query returns.
pub const LIST_LIMIT: i64 = 1000;

/// Optional, AND-combined filters applied on top of the owner predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    /// Case-insensitive substring of the title or the description.
    pub search: Option<String>,
}

#[cfg(test)]
impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if self.category.is_some_and(|c| c != task.category)
            || self.priority.is_some_and(|p| p != task.priority)
            || self.status.is_some_and(|s| s != task.status)
        {
            return false;
        }
        match &self.search {
            Some(needle) => {
                let needle = needle.to_lowercase();
                task.title.to_lowercase().contains(&needle)
                    || task.description.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

/// Partial update: `None` leaves the field as stored, `Some` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub status: Option<Status>,
}

#[cfg(test)]
impl TaskPatch {
    pub fn apply(&self, task: &mut Task, updated_at: &str) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(due_date) = &self.due_date {
            task.due_date = due_date.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        task.updated_at = updated_at.to_string();
    }
}

/// Task repository storage. Every read and write is scoped by `user_id`.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert(&self, task: &Task) -> Result<(), StoreError>;
    async fn list(
        &self,
        user_id: Uuid,
        filter: &TaskFilter,
        limit: i64,
    ) -> Result<Vec<Task>, StoreError>;
    /// Unfiltered, newest `created_at` first.
    async fn list_recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<Task>, StoreError>;
    async fn get(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<Task>, StoreError>;
    /// Returns the stored record after the update, or `None` if no task with
    /// that id belongs to `user_id`.
    async fn update(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        patch: &TaskPatch,
        updated_at: &str,
    ) -> Result<Option<Task>, StoreError>;
    /// Returns whether a record was removed.
    async fn delete(&self, user_id: Uuid, task_id: Uuid) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgTaskStore {
    db: PgPool,
}

impl PgTaskStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn into_task(row: TaskRow) -> Result<Task, StoreError> {
    Task::try_from(row).map_err(|e| StoreError::Database(sqlx::Error::Decode(e.into())))
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn insert(&self, task: &Task) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, user_id, title, description, due_date,
                               priority, category, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(task.id)
        .bind(task.user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.due_date)
        .bind(task.priority.as_str())
        .bind(task.category.as_str())
        .bind(task.status.as_str())
        .bind(&task.created_at)
        .bind(&task.updated_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn list(
        &self,
        user_id: Uuid,
        filter: &TaskFilter,
        limit: i64,
    ) -> Result<Vec<Task>, StoreError> {
        // strpos keeps the search term literal; no LIKE/regex metacharacters
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, user_id, title, description, due_date,
                   priority, category, status, created_at, updated_at
            FROM tasks
            WHERE user_id = $1
              AND ($2::text IS NULL OR category = $2)
              AND ($3::text IS NULL OR priority = $3)
              AND ($4::text IS NULL OR status = $4)
              AND ($5::text IS NULL
                   OR strpos(lower(title), lower($5)) > 0
                   OR strpos(lower(description), lower($5)) > 0)
            ORDER BY created_at ASC, id ASC
            LIMIT $6
            "#,
        )
        .bind(user_id)
        .bind(filter.category.map(|c| c.as_str()))
        .bind(filter.priority.map(|p| p.as_str()))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.search.as_deref())
        .bind(limit)
        .fetch_all(&self.db)
        .await?;
        rows.into_iter().map(into_task).collect()
    }

    async fn list_recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, user_id, title, description, due_date,
                   priority, category, status, created_at, updated_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;
        rows.into_iter().map(into_task).collect()
    }

    async fn get(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<Task>, StoreError> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, user_id, title, description, due_date,
                   priority, category, status, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        row.map(into_task).transpose()
    }

    async fn update(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        patch: &TaskPatch,
        updated_at: &str,
    ) -> Result<Option<Task>, StoreError> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            UPDATE tasks SET
                title       = COALESCE($3, title),
                description = COALESCE($4, description),
                due_date    = COALESCE($5, due_date),
                priority    = COALESCE($6, priority),
                category    = COALESCE($7, category),
                status      = COALESCE($8, status),
                updated_at  = $9
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, due_date,
                      priority, category, status, created_at, updated_at
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.due_date.as_deref())
        .bind(patch.priority.map(|p| p.as_str()))
        .bind(patch.category.map(|c| c.as_str()))
        .bind(patch.status.map(|s| s.as_str()))
        .bind(updated_at)
        .fetch_optional(&self.db)
        .await?;
        row.map(into_task).transpose()
    }

    async fn delete(&self, user_id: Uuid, task_id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query(r#"DELETE FROM tasks WHERE id = $1 AND user_id = $2"#)
            .bind(task_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
