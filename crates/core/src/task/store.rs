//! In-memory task storage implementation
//!
//! A single `RwLock` guards the map, so every mutation (including the
//! insert-if-vacant in [`add`](TaskRepository::add)) is serialized. Deleted
//! records stay in the map with `deleted == true`; to callers they are
//! indistinguishable from records that never existed.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::model::Task;
use super::repository::TaskRepository;
use crate::{Error, Result};

/// In-memory task store keyed by task id
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<String, Task>>,
}

impl MemoryTaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for MemoryTaskStore {
    async fn find_all(&self) -> Result<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.values().filter(|t| !t.deleted).cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(id).filter(|t| !t.deleted).cloned())
    }

    async fn add(&self, task: Task) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        match tasks.entry(task.id.clone()) {
            Entry::Occupied(_) => Err(Error::Storage(format!(
                "task id {} is already occupied",
                task.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(task);
                Ok(())
            }
        }
    }

    async fn mark_deleted(&self, id: &str) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(id) {
            Some(task) => {
                task.deleted = true;
                task.updated_at = Utc::now();
                Ok(())
            }
            None => Err(Error::Storage(format!("no stored task with id {}", id))),
        }
    }

    async fn replace(&self, id: &str, task: Task) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        if !tasks.contains_key(id) {
            return Err(Error::Storage(format!("no stored task with id {}", id)));
        }
        tasks.insert(id.to_string(), task);
        Ok(())
    }
}
