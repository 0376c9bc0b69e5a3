//! Core library for the task lifecycle service
//!
//! This crate contains the domain logic, including:
//! - Task model and in-memory storage with soft-delete semantics
//! - The lifecycle service (create / list / get / update / delete)
//! - Field validation and identifier generation

pub mod error;
pub mod id;
pub mod task;
pub mod validate;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
