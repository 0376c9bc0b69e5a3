//! Application state

use std::sync::Arc;

use tm_core::task::{MemoryTaskStore, TaskService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    service: TaskService,
}

impl AppState {
    /// Create a new AppState with an empty in-memory store
    pub fn new() -> Self {
        let store = Arc::new(MemoryTaskStore::new());
        Self {
            inner: Arc::new(AppStateInner {
                service: TaskService::new(store),
            }),
        }
    }

    /// Get reference to the task service
    pub fn service(&self) -> &TaskService {
        &self.inner.service
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
