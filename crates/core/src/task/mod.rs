//! Task module
//!
//! This module contains the task model, storage, and lifecycle service.

mod model;
mod repository;
mod service;
mod store;

pub use model::*;
pub use repository::TaskRepository;
pub use service::{NewTask, TaskPatch, TaskService};
pub use store::MemoryTaskStore;
