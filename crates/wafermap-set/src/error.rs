//! Error types for coordinate and availability-set operations

use crate::domain::Domain;
use std::fmt::{self, Display, Formatter};

/// Which single-coordinate mutation was attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    /// Mark a coordinate available
    Enable,
    /// Mark a coordinate defective
    Disable,
}

impl Display for Switch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enable => f.write_str("enable"),
            Self::Disable => f.write_str("disable"),
        }
    }
}

/// Errors raised by [`ResourceSet`](crate::ResourceSet) and coordinate construction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetError {
    /// Index is not part of the domain
    #[error("index {index} out of range for {domain}")]
    OutOfRange {
        /// Rejected index
        index: usize,
        /// Domain it was checked against
        domain: Domain,
    },

    /// Coordinate already in the requested state (strict mode only)
    #[error("could not {op} resource {index} of {domain}: already in target state")]
    RedundantOperation {
        /// Attempted mutation
        op: Switch,
        /// Index already in the target state
        index: usize,
        /// Domain of the set
        domain: Domain,
    },

    /// Operands live in different domains
    #[error("domain mismatch: expected {expected}, got {actual}")]
    DomainMismatch {
        /// Domain of the receiver
        expected: Domain,
        /// Domain of the operand
        actual: Domain,
    },

    /// Malformed textual coordinate
    #[error("invalid coordinate '{input}': {reason}")]
    Parse {
        /// Text as given
        input: String,
        /// What is wrong with it
        reason: String,
    },
}

impl SetError {
    /// Create out-of-range error
    pub fn out_of_range(index: usize, domain: &Domain) -> Self {
        Self::OutOfRange {
            index,
            domain: domain.clone(),
        }
    }

    /// Create domain mismatch error
    pub fn domain_mismatch(expected: &Domain, actual: &Domain) -> Self {
        Self::DomainMismatch {
            expected: expected.clone(),
            actual: actual.clone(),
        }
    }

    /// Create parse error for textual input
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for set operations
pub type SetResult<T> = Result<T, SetError>;
