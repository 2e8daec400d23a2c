//! Named in-place set operations

use crate::error::{SetError, SetResult};
use crate::set::ResourceSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One of the binary in-place combinators of [`ResourceSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOp {
    /// Union of available subsets
    Merge,
    /// Intersection of available subsets
    Intersection,
    /// Available here but not there
    Difference,
    /// Available on exactly one side
    SymmetricDifference,
}

impl SetOp {
    /// All operations in declaration order
    pub const ALL: [Self; 4] = [
        Self::Merge,
        Self::Intersection,
        Self::Difference,
        Self::SymmetricDifference,
    ];

    /// Lower-case name as accepted by [`FromStr`]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Intersection => "intersection",
            Self::Difference => "difference",
            Self::SymmetricDifference => "symmetric_difference",
        }
    }

    /// Apply to `target` in place with `other` as right operand
    ///
    /// # Errors
    /// Returns [`SetError::DomainMismatch`] if the domains differ
    pub fn apply(self, target: &mut ResourceSet, other: &ResourceSet) -> SetResult<()> {
        match self {
            Self::Merge => target.merge(other),
            Self::Intersection => target.intersection(other),
            Self::Difference => target.difference(other),
            Self::SymmetricDifference => target.symmetric_difference(other),
        }
    }
}

impl Display for SetOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SetOp {
    type Err = SetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| SetError::parse(s, "unknown set operation"))
    }
}
