//! Task lifecycle service
//!
//! Orchestrates validation, identifier generation, and the store to
//! implement the create / list / get / update / delete operations. The
//! service itself holds no task state.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use super::model::Task;
use super::repository::TaskRepository;
use crate::error::TASK_TITLE_CAN_NOT_BE_EMPTY;
use crate::id::{IdGenerator, UuidGenerator};
use crate::validate::{is_valid_task_id, validate_description, validate_title};
use crate::{Error, Result};

/// Attempts at finding a free id before giving up. Collisions are
/// astronomically unlikely, so hitting this cap means something is broken.
const MAX_ID_ATTEMPTS: usize = 64;

/// Payload for creating a task
#[derive(Debug, Default, Clone, Deserialize)]
pub struct NewTask {
    #[serde(rename = "task-title", default)]
    pub title: Option<String>,
    #[serde(rename = "task-description", default)]
    pub description: Option<String>,
}

/// Partial-update payload; absent fields are left untouched
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TaskPatch {
    #[serde(rename = "task-title", default)]
    pub title: Option<String>,
    #[serde(rename = "task-description", default)]
    pub description: Option<String>,
    #[serde(rename = "task-completed", default)]
    pub completed: Option<bool>,
}

/// Stateless service implementing the task lifecycle
#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl TaskService {
    /// Create a service over the given repository with UUID v4 ids
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self {
            repository,
            ids: Arc::new(UuidGenerator),
        }
    }

    /// Replace the id generator (used by tests to force collisions)
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// List all active tasks
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.repository.find_all().await
    }

    /// Create a new task from the given payload.
    ///
    /// `None` means no request body was supplied at all, which is distinct
    /// from a body with empty fields.
    pub async fn create_task(&self, payload: Option<NewTask>) -> Result<Task> {
        let payload = payload.ok_or(Error::EmptyBody)?;

        let title = validate_title(payload.title.as_deref(), false)?
            .ok_or(Error::InvalidField(TASK_TITLE_CAN_NOT_BE_EMPTY))?;
        let description =
            validate_description(payload.description.as_deref(), true)?.unwrap_or_default();

        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.generate();
            if self.repository.find_by_id(&id).await?.is_some() {
                tracing::debug!(%id, "generated task id already in use, retrying");
                continue;
            }

            let task = Task::new(&id, &title).with_description(&description);
            match self.repository.add(task.clone()).await {
                Ok(()) => {
                    tracing::info!(%id, "created task");
                    return Ok(task);
                }
                // the id was occupied by a retired record or a concurrent
                // insert; pick a new one
                Err(Error::Storage(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(Error::Unexpected(
            "could not allocate a unique task id".to_string(),
        ))
    }

    /// Fetch a single active task by id
    pub async fn get_task_by_id(&self, id: &str) -> Result<Task> {
        if !is_valid_task_id(id) {
            return Err(Error::InvalidId(id.to_string()));
        }

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Soft-delete a task and return its pre-deletion snapshot
    pub async fn delete_task_by_id(&self, id: &str) -> Result<Task> {
        if !is_valid_task_id(id) {
            return Err(Error::InvalidId(id.to_string()));
        }

        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        self.repository.mark_deleted(id).await?;
        tracing::info!(%id, "deleted task");
        Ok(existing)
    }

    /// Apply a partial update to an existing task.
    ///
    /// Setting `completed` to true retires the task from the active set;
    /// afterwards it is gone from reads and listings, same as a delete.
    pub async fn update_task_by_id(&self, id: &str, patch: Option<TaskPatch>) -> Result<Task> {
        let patch = patch.ok_or(Error::EmptyBody)?;

        if !is_valid_task_id(id) {
            return Err(Error::InvalidId(id.to_string()));
        }

        let mut task = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        if patch.title.is_some() {
            task.title = validate_title(patch.title.as_deref(), false)?
                .ok_or(Error::InvalidField(TASK_TITLE_CAN_NOT_BE_EMPTY))?;
        }

        if patch.description.is_some() {
            task.description =
                validate_description(patch.description.as_deref(), true)?.unwrap_or_default();
        }

        if let Some(completed) = patch.completed {
            task.completed = completed;
        }

        if task.completed {
            task.deleted = true;
        }

        task.updated_at = Utc::now();
        self.repository.replace(id, task.clone()).await?;
        tracing::info!(%id, "updated task");
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::MemoryTaskStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryTaskStore::new()))
    }

    fn new_task(title: &str, description: Option<&str>) -> Option<NewTask> {
        Some(NewTask {
            title: Some(title.to_string()),
            description: description.map(str::to_string),
        })
    }

    /// Generator that replays a fixed sequence, then falls back to UUIDs.
    struct ScriptedGenerator {
        script: Vec<String>,
        next: AtomicUsize,
    }

    impl IdGenerator for ScriptedGenerator {
        fn generate(&self) -> String {
            let index = self.next.fetch_add(1, Ordering::SeqCst);
            self.script
                .get(index)
                .cloned()
                .unwrap_or_else(|| UuidGenerator.generate())
        }
    }

    #[tokio::test]
    async fn test_create_task() {
        let service = service();
        let task = service
            .create_task(new_task("Write spec", Some("all of it")))
            .await
            .unwrap();

        assert!(is_valid_task_id(&task.id));
        assert_eq!(task.title, "Write spec");
        assert_eq!(task.description, "all of it");
        assert!(!task.completed);

        let listed = service.list_tasks().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, task.id);
    }

    #[tokio::test]
    async fn test_create_trims_fields() {
        let service = service();
        let task = service
            .create_task(new_task("  Buy milk  ", Some("  2 liters ")))
            .await
            .unwrap();

        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "2 liters");
    }

    #[tokio::test]
    async fn test_create_defaults_description_to_empty() {
        let service = service();
        let task = service.create_task(new_task("No details", None)).await.unwrap();
        assert_eq!(task.description, "");
    }

    #[tokio::test]
    async fn test_create_without_body() {
        let service = service();
        let err = service.create_task(None).await.unwrap_err();
        assert_eq!(err, Error::EmptyBody);
    }

    #[tokio::test]
    async fn test_create_with_empty_title() {
        let service = service();
        let err = service.create_task(new_task("", Some("x"))).await.unwrap_err();
        assert_eq!(err, Error::InvalidField(TASK_TITLE_CAN_NOT_BE_EMPTY));
    }

    #[tokio::test]
    async fn test_create_retries_on_id_collision() {
        let repository = Arc::new(MemoryTaskStore::new());
        let service = TaskService::new(repository.clone());
        let first = service.create_task(new_task("First", None)).await.unwrap();

        // next creation keeps offering the taken id before a fresh one
        let colliding = TaskService::new(repository)
            .with_id_generator(Arc::new(ScriptedGenerator {
                script: vec![first.id.clone(), first.id.clone()],
                next: AtomicUsize::new(0),
            }));
        let second = colliding.create_task(new_task("Second", None)).await.unwrap();

        assert_ne!(second.id, first.id);
        assert_eq!(colliding.list_tasks().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_fails_past_retry_cap() {
        let repository = Arc::new(MemoryTaskStore::new());
        let service = TaskService::new(repository.clone());
        let first = service.create_task(new_task("First", None)).await.unwrap();

        let stuck = TaskService::new(repository).with_id_generator(Arc::new(ScriptedGenerator {
            script: vec![first.id.clone(); MAX_ID_ATTEMPTS],
            next: AtomicUsize::new(0),
        }));
        let err = stuck.create_task(new_task("Second", None)).await.unwrap_err();
        assert!(matches!(err, Error::Unexpected(_)));
    }

    #[tokio::test]
    async fn test_get_task_by_id() {
        let service = service();
        let created = service.create_task(new_task("Find me", None)).await.unwrap();

        let fetched = service.get_task_by_id(&created.id).await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.title, created.title);
    }

    #[tokio::test]
    async fn test_get_with_malformed_id() {
        let service = service();
        let err = service.get_task_by_id("not-a-uuid").await.unwrap_err();
        assert_eq!(err, Error::InvalidId("not-a-uuid".to_string()));
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let service = service();
        let id = UuidGenerator.generate();
        let err = service.get_task_by_id(&id).await.unwrap_err();
        assert_eq!(err, Error::NotFound(id));
    }

    #[tokio::test]
    async fn test_delete_returns_snapshot_then_not_found() {
        let service = service();
        let created = service.create_task(new_task("Doomed", None)).await.unwrap();

        let deleted = service.delete_task_by_id(&created.id).await.unwrap();
        assert_eq!(deleted.id, created.id);
        assert_eq!(deleted.title, "Doomed");
        assert!(!deleted.deleted);

        let err = service.get_task_by_id(&created.id).await.unwrap_err();
        assert_eq!(err, Error::NotFound(created.id));
        assert!(service.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_partial_fields() {
        let service = service();
        let created = service
            .create_task(new_task("Old title", Some("old text")))
            .await
            .unwrap();

        let updated = service
            .update_task_by_id(
                &created.id,
                Some(TaskPatch {
                    title: Some("New title".to_string()),
                    ..Default::default()
                }),
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "New title");
        assert_eq!(updated.description, "old text");
        assert!(!updated.completed);
    }

    #[tokio::test]
    async fn test_update_without_body() {
        let service = service();
        let created = service.create_task(new_task("Task", None)).await.unwrap();
        let err = service.update_task_by_id(&created.id, None).await.unwrap_err();
        assert_eq!(err, Error::EmptyBody);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_title() {
        let service = service();
        let created = service.create_task(new_task("Task", None)).await.unwrap();

        let err = service
            .update_task_by_id(
                &created.id,
                Some(TaskPatch {
                    title: Some("   ".to_string()),
                    ..Default::default()
                }),
            )
            .await
            .unwrap_err();
        assert_eq!(err, Error::InvalidField(TASK_TITLE_CAN_NOT_BE_EMPTY));
    }

    #[tokio::test]
    async fn test_update_blank_description_stored_empty() {
        let service = service();
        let created = service
            .create_task(new_task("Task", Some("something")))
            .await
            .unwrap();

        let updated = service
            .update_task_by_id(
                &created.id,
                Some(TaskPatch {
                    description: Some("   ".to_string()),
                    ..Default::default()
                }),
            )
            .await
            .unwrap();
        assert_eq!(updated.description, "");
    }

    #[tokio::test]
    async fn test_update_rejects_malformed_id_before_lookup() {
        let service = service();
        let err = service
            .update_task_by_id("definitely-wrong", Some(TaskPatch::default()))
            .await
            .unwrap_err();
        assert_eq!(err, Error::InvalidId("definitely-wrong".to_string()));
    }

    #[tokio::test]
    async fn test_completing_a_task_retires_it() {
        let service = service();
        let created = service.create_task(new_task("Finish me", None)).await.unwrap();

        let updated = service
            .update_task_by_id(
                &created.id,
                Some(TaskPatch {
                    completed: Some(true),
                    ..Default::default()
                }),
            )
            .await
            .unwrap();

        // the caller still gets the completed record back...
        assert!(updated.completed);
        assert!(updated.deleted);

        // ...but it is gone from every subsequent read
        let err = service.get_task_by_id(&created.id).await.unwrap_err();
        assert_eq!(err, Error::NotFound(created.id));
        assert!(service.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let service = service();
        let id = UuidGenerator.generate();
        let err = service
            .update_task_by_id(&id, Some(TaskPatch::default()))
            .await
            .unwrap_err();
        assert_eq!(err, Error::NotFound(id));
    }
}
