//! Task repository trait
//!
//! Defines the interface for task storage operations. Soft-deleted records
//! are invisible to reads but their ids remain occupied forever.

use async_trait::async_trait;

use super::model::Task;
use crate::Result;

/// Repository interface for task storage with soft-delete semantics
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Get all tasks that have not been soft-deleted
    async fn find_all(&self) -> Result<Vec<Task>>;

    /// Get a task by id; `None` if absent or soft-deleted
    async fn find_by_id(&self, id: &str) -> Result<Option<Task>>;

    /// Insert a new task. Fails if the id is already occupied, including
    /// by a soft-deleted record.
    async fn add(&self, task: Task) -> Result<()>;

    /// Soft-delete the task with the given id
    async fn mark_deleted(&self, id: &str) -> Result<()>;

    /// Overwrite the stored record for `id` with a new value
    async fn replace(&self, id: &str, task: Task) -> Result<()>;
}
