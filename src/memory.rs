//! In-process stores used by the test suite in place of Postgres.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    auth::{repo::UserStore, repo_types::User},
    error::StoreError,
    tasks::{
        repo::{TaskFilter, TaskPatch, TaskStore},
        repo_types::Task,
    },
    timestamp,
};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        // check and insert under one write lock, like a unique index
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: timestamp::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, task: &Task) -> Result<(), StoreError> {
        self.tasks.write().await.push(task.clone());
        Ok(())
    }

    async fn list(
        &self,
        user_id: Uuid,
        filter: &TaskFilter,
        limit: i64,
    ) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .filter(|t| t.user_id == user_id && filter.matches(t))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn list_recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        let mut owned: Vec<Task> = tasks.iter().filter(|t| t.user_id == user_id).cloned().collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        owned.truncate(limit.max(0) as usize);
        Ok(owned)
    }

    async fn get(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .find(|t| t.id == task_id && t.user_id == user_id)
            .cloned())
    }

    async fn update(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        patch: &TaskPatch,
        updated_at: &str,
    ) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks
            .iter_mut()
            .find(|t| t.id == task_id && t.user_id == user_id)
            .map(|t| {
                patch.apply(t, updated_at);
                t.clone()
            }))
    }

    async fn delete(&self, user_id: Uuid, task_id: Uuid) -> Result<bool, StoreError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| !(t.id == task_id && t.user_id == user_id));
        Ok(tasks.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn user_create_rejects_duplicate_email() {
        let store = MemoryUserStore::default();
        let first = store.create("dup@example.com", "hash-a").await.unwrap();

        let err = store.create("dup@example.com", "hash-b").await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));

        let stored = store.find_by_email("dup@example.com").await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.password_hash, "hash-a");
    }

    #[tokio::test]
    async fn user_create_treats_case_variants_as_distinct() {
        let store = MemoryUserStore::default();
        store.create("Case@example.com", "h").await.unwrap();
        assert!(store.create("case@example.com", "h").await.is_ok());
    }
}
