//! Error types for the core library

use thiserror::Error;

/// Failure taxonomy for the task lifecycle service.
///
/// Display strings double as the user-visible error messages, so they keep
/// the upper-case wording of the public contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("AN EMPTY REQUEST BODY IS NOT VALID")]
    EmptyBody,

    #[error("{0}")]
    InvalidField(&'static str),

    #[error("INVALID TASK ID: {0}")]
    InvalidId(String),

    #[error("A TASK ID WAS NOT PROVIDED")]
    MissingId,

    #[error("NO TASK FOUND WITH GIVEN ID: {0}")]
    NotFound(String),

    /// Request path carried extra segments (maps to 400).
    #[error("INVALID REQUEST URL")]
    InvalidUrl,

    /// Method + path combination the service does not expose (maps to 404).
    #[error("INVALID REQUEST URL")]
    UnknownRoute,

    #[error("MALFORMED REQUEST BODY: {0}")]
    MalformedPayload(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Message used when a task title is missing or blank.
pub const TASK_TITLE_CAN_NOT_BE_EMPTY: &str = "TASK TITLE CAN'T BE NULL OR EMPTY";

/// Message used when a task description is missing or blank.
pub const TASK_DESCRIPTION_CAN_NOT_BE_EMPTY: &str = "TASK DESCRIPTION CAN'T BE NULL OR EMPTY";
