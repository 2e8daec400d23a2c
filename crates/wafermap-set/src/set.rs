//! Availability sets over a coordinate domain
//!
//! Provides [`ResourceSet`], the subset of a [`Domain`] considered usable.
//!
//! A set starts *uninitialized*: it answers every query as if the whole
//! domain were available, but [`ResourceSet::has_value`] reports `false`.
//! The first mutation, assignment or successful decode initializes it, and
//! only [`ResourceSet::reset`] returns it to the uninitialized state.
//!
//! Internally only the *disabled* indices are stored. Defect lists are
//! short compared to the domains they describe.

use crate::domain::{Coordinate, Domain};
use crate::error::{SetError, SetResult, Switch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

static NONE_DISABLED: BTreeSet<usize> = BTreeSet::new();

/// Behaviour of single-coordinate mutations that would not change anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchMode {
    /// Report [`SetError::RedundantOperation`]
    #[default]
    Throw,
    /// Treat as a successful no-op
    NonThrow,
}

/// Subset of a domain considered available
///
/// Equality includes the initialization flag: an uninitialized set never
/// equals an initialized one, even if the latter is full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ResourceSetRepr", into = "ResourceSetRepr")]
pub struct ResourceSet {
    domain: Domain,
    disabled: Option<BTreeSet<usize>>,
}

impl ResourceSet {
    /// Create an uninitialized set over `domain`
    #[inline]
    #[must_use]
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            disabled: None,
        }
    }

    /// Create an uninitialized set over the domain of `C`
    #[inline]
    #[must_use]
    pub fn of<C: Coordinate>() -> Self {
        Self::new(C::DOMAIN)
    }

    /// Create an initialized set with the given indices disabled
    ///
    /// # Errors
    /// Returns [`SetError::OutOfRange`] if any index lies outside `domain`
    pub fn from_disabled<I>(domain: Domain, disabled: I) -> SetResult<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let disabled: BTreeSet<usize> = disabled.into_iter().collect();
        if let Some(&bad) = disabled.iter().find(|&&i| !domain.contains(i)) {
            return Err(SetError::out_of_range(bad, &domain));
        }
        Ok(Self {
            domain,
            disabled: Some(disabled),
        })
    }

    /// Domain this set ranges over
    #[inline]
    #[must_use]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Check whether an index is available
    ///
    /// Uninitialized sets report every valid index as available.
    ///
    /// # Errors
    /// Returns [`SetError::OutOfRange`] for indices outside the domain
    #[inline]
    pub fn has(&self, index: usize) -> SetResult<bool> {
        self.domain.check(index)?;
        Ok(!self.effective_disabled().contains(&index))
    }

    /// Typed variant of [`has`](Self::has)
    ///
    /// # Errors
    /// Returns [`SetError::DomainMismatch`] if `C` belongs to another domain
    pub fn has_coord<C: Coordinate>(&self, coord: C) -> SetResult<bool> {
        if C::DOMAIN != self.domain {
            return Err(SetError::domain_mismatch(&self.domain, &C::DOMAIN));
        }
        self.has(coord.index())
    }

    /// Mark an index available, failing if it already is
    ///
    /// # Errors
    /// See [`enable_with`](Self::enable_with)
    #[inline]
    pub fn enable(&mut self, index: usize) -> SetResult<()> {
        self.enable_with(index, SwitchMode::Throw)
    }

    /// Mark an index available
    ///
    /// # Errors
    /// - [`SetError::OutOfRange`] for indices outside the domain
    /// - [`SetError::RedundantOperation`] if the index is already available
    ///   and `mode` is [`SwitchMode::Throw`]
    pub fn enable_with(&mut self, index: usize, mode: SwitchMode) -> SetResult<()> {
        if self.has(index)? && mode == SwitchMode::Throw {
            return Err(self.redundant(Switch::Enable, index));
        }
        self.disabled_mut().remove(&index);
        Ok(())
    }

    /// Mark an index defective, failing if it already is
    ///
    /// # Errors
    /// See [`disable_with`](Self::disable_with)
    #[inline]
    pub fn disable(&mut self, index: usize) -> SetResult<()> {
        self.disable_with(index, SwitchMode::Throw)
    }

    /// Mark an index defective
    ///
    /// # Errors
    /// - [`SetError::OutOfRange`] for indices outside the domain
    /// - [`SetError::RedundantOperation`] if the index is already disabled
    ///   and `mode` is [`SwitchMode::Throw`]
    pub fn disable_with(&mut self, index: usize, mode: SwitchMode) -> SetResult<()> {
        if !self.has(index)? && mode == SwitchMode::Throw {
            return Err(self.redundant(Switch::Disable, index));
        }
        self.disabled_mut().insert(index);
        Ok(())
    }

    /// Make the whole domain available
    pub fn enable_all(&mut self) {
        self.disabled = Some(BTreeSet::new());
    }

    /// Make the whole domain unavailable
    pub fn disable_all(&mut self) {
        self.disabled = Some((0..self.domain.size()).collect());
    }

    /// Replace the available subset with exactly `available`
    ///
    /// # Errors
    /// Returns [`SetError::OutOfRange`] if any index lies outside the domain;
    /// the set is left untouched in that case.
    pub fn from_set<I>(&mut self, available: I) -> SetResult<()>
    where
        I: IntoIterator<Item = usize>,
    {
        let available: BTreeSet<usize> = available.into_iter().collect();
        if let Some(&bad) = available.iter().find(|&&i| !self.domain.contains(i)) {
            return Err(SetError::out_of_range(bad, &self.domain));
        }
        self.disabled = Some(self.complement(&available));
        Ok(())
    }

    /// Number of available indices (domain size if uninitialized)
    #[inline]
    #[must_use]
    pub fn available(&self) -> usize {
        self.domain.size() - self.effective_disabled().len()
    }

    /// Whether the set was initialized by a mutation or a load
    #[inline]
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.disabled.is_some()
    }

    /// Return to the uninitialized state
    #[inline]
    pub fn reset(&mut self) {
        self.disabled = None;
    }

    /// Available indices in ascending order
    pub fn iter_available(&self) -> impl Iterator<Item = usize> + '_ {
        let disabled = self.effective_disabled();
        (0..self.domain.size()).filter(move |i| !disabled.contains(i))
    }

    /// Disabled indices in ascending order
    pub fn iter_disabled(&self) -> impl Iterator<Item = usize> + '_ {
        self.effective_disabled().iter().copied()
    }

    /// Union: keep everything available in either set
    ///
    /// # Errors
    /// Returns [`SetError::DomainMismatch`] if the domains differ
    pub fn merge(&mut self, other: &Self) -> SetResult<()> {
        self.ensure_same_domain(other)?;
        let disabled = self
            .effective_disabled()
            .intersection(other.effective_disabled())
            .copied()
            .collect();
        self.disabled = Some(disabled);
        Ok(())
    }

    /// Keep only what is available in both sets
    ///
    /// # Errors
    /// Returns [`SetError::DomainMismatch`] if the domains differ
    pub fn intersection(&mut self, other: &Self) -> SetResult<()> {
        self.ensure_same_domain(other)?;
        let disabled = self
            .effective_disabled()
            .union(other.effective_disabled())
            .copied()
            .collect();
        self.disabled = Some(disabled);
        Ok(())
    }

    /// Keep only what is available here but not in `other`
    ///
    /// # Errors
    /// Returns [`SetError::DomainMismatch`] if the domains differ
    pub fn difference(&mut self, other: &Self) -> SetResult<()> {
        self.ensure_same_domain(other)?;
        let mut disabled = self.effective_disabled().clone();
        disabled.extend(other.iter_available());
        self.disabled = Some(disabled);
        Ok(())
    }

    /// Keep what is available in exactly one of the two sets
    ///
    /// # Errors
    /// Returns [`SetError::DomainMismatch`] if the domains differ
    pub fn symmetric_difference(&mut self, other: &Self) -> SetResult<()> {
        self.ensure_same_domain(other)?;
        // complements share their symmetric difference
        let odd: BTreeSet<usize> = self
            .effective_disabled()
            .symmetric_difference(other.effective_disabled())
            .copied()
            .collect();
        self.disabled = Some(self.complement(&odd));
        Ok(())
    }

    fn effective_disabled(&self) -> &BTreeSet<usize> {
        self.disabled.as_ref().unwrap_or(&NONE_DISABLED)
    }

    fn disabled_mut(&mut self) -> &mut BTreeSet<usize> {
        self.disabled.get_or_insert_with(BTreeSet::new)
    }

    fn complement(&self, set: &BTreeSet<usize>) -> BTreeSet<usize> {
        (0..self.domain.size()).filter(|i| !set.contains(i)).collect()
    }

    fn ensure_same_domain(&self, other: &Self) -> SetResult<()> {
        if self.domain == other.domain {
            Ok(())
        } else {
            Err(SetError::domain_mismatch(&self.domain, &other.domain))
        }
    }

    fn redundant(&self, op: Switch, index: usize) -> SetError {
        SetError::RedundantOperation {
            op,
            index,
            domain: self.domain.clone(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct ResourceSetRepr {
    domain: Domain,
    #[serde(default)]
    disabled: Option<Vec<usize>>,
}

impl TryFrom<ResourceSetRepr> for ResourceSet {
    type Error = SetError;

    fn try_from(repr: ResourceSetRepr) -> SetResult<Self> {
        match repr.disabled {
            Some(disabled) => Self::from_disabled(repr.domain, disabled),
            None => Ok(Self::new(repr.domain)),
        }
    }
}

impl From<ResourceSet> for ResourceSetRepr {
    fn from(set: ResourceSet) -> Self {
        Self {
            domain: set.domain,
            disabled: set.disabled.map(|d| d.into_iter().collect()),
        }
    }
}
