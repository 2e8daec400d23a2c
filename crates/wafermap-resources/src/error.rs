//! Error types for resource trees

use wafermap_backend::BackendError;
use wafermap_set::SetError;

/// Errors raised by entities, bound roots and tree algebra
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// Set-level failure (range, redundancy, domain)
    #[error(transparent)]
    Set(#[from] SetError),

    /// Storage failure
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// No record stored and missing records are not tolerated
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Operands are bound to different coordinates
    #[error("domain mismatch: expected {expected}, got {actual}")]
    DomainMismatch {
        /// Coordinate of the receiver
        expected: String,
        /// Coordinate of the operand
        actual: String,
    },

    /// Entity has no set with this name
    #[error("{kind} has no set named '{name}'")]
    UnknownSet {
        /// Entity kind
        kind: &'static str,
        /// Requested name
        name: String,
    },

    /// Stored record belongs to another entity kind
    #[error("record {key} holds a {found}, expected {expected}")]
    KindMismatch {
        /// Record key
        key: String,
        /// Kind of the decoding entity
        expected: &'static str,
        /// Kind stored in the record
        found: String,
    },
}

impl ResourceError {
    /// Create unknown set error
    pub fn unknown_set(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownSet {
            kind,
            name: name.into(),
        }
    }

    /// Create coordinate mismatch error
    pub fn domain_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        Self::DomainMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Result type alias for resource operations
pub type ResourceResult<T> = Result<T, ResourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_errors_pass_through() {
        let err: ResourceError = SetError::parse("W", "missing wafer number").into();
        assert_eq!(err.to_string(), "invalid coordinate 'W': missing wafer number");
    }

    #[test]
    fn unknown_set_display() {
        let err = ResourceError::unknown_set("hicann", "cookies");
        assert_eq!(err.to_string(), "hicann has no set named 'cookies'");
    }
}
