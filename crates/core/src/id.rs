//! Task identifier generation
//!
//! Generation alone guarantees nothing about uniqueness; the lifecycle
//! service retries against the store until it lands on a free identifier.

use uuid::Uuid;

/// Source of fresh task identifiers.
///
/// A trait so tests can inject deterministic (or deliberately colliding)
/// generators into the service.
pub trait IdGenerator: Send + Sync {
    /// Produce a candidate identifier.
    fn generate(&self) -> String;
}

/// Default generator backed by random UUID v4.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::is_valid_task_id;

    #[test]
    fn test_generates_canonical_uuid() {
        let id = UuidGenerator.generate();
        assert_eq!(id.len(), 36);
        assert!(is_valid_task_id(&id));
    }

    #[test]
    fn test_successive_ids_differ() {
        let gen = UuidGenerator;
        assert_ne!(gen.generate(), gen.generate());
    }
}
