//! Field validation for task payloads

use uuid::Uuid;

use crate::error::{TASK_DESCRIPTION_CAN_NOT_BE_EMPTY, TASK_TITLE_CAN_NOT_BE_EMPTY};
use crate::{Error, Result};

/// Validate a task title.
///
/// Fails when the value is absent or blank and `allow_empty` is false.
/// Otherwise returns `None` for an absent/blank value, or the trimmed title.
pub fn validate_title(value: Option<&str>, allow_empty: bool) -> Result<Option<String>> {
    validate_text(value, allow_empty, TASK_TITLE_CAN_NOT_BE_EMPTY)
}

/// Validate a task description. Same rule as [`validate_title`].
pub fn validate_description(value: Option<&str>, allow_empty: bool) -> Result<Option<String>> {
    validate_text(value, allow_empty, TASK_DESCRIPTION_CAN_NOT_BE_EMPTY)
}

fn validate_text(
    value: Option<&str>,
    allow_empty: bool,
    message: &'static str,
) -> Result<Option<String>> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(Some(v.trim().to_string())),
        _ if allow_empty => Ok(None),
        _ => Err(Error::InvalidField(message)),
    }
}

/// Check whether `id` is a canonical hyphenated UUID string.
///
/// Rejecting malformed ids before the store lookup keeps "malformed" and
/// "not found" distinguishable.
pub fn is_valid_task_id(id: &str) -> bool {
    Uuid::try_parse(id).is_ok_and(|parsed| parsed.to_string() == id.to_ascii_lowercase())
}
