//! Persisted entities and backend bindings
//!
//! Provides the [`Entity`] trait shared by chips, FPGAs and wafers, the
//! [`Binding`] that remembers where an entity lives, and [`WithBackend`],
//! an entity bound to its storage location.
//!
//! # Decoding
//!
//! Decoding is additive-only. A record written by an older schema simply
//! lacks the sets introduced later and those decode uninitialized. A record
//! written by a newer schema is decoded with a warning. Set names this
//! build does not know are kept verbatim in [`UnknownSets`] and written back
//! on save, so a round trip through an older build loses nothing.

use crate::error::{ResourceError, ResourceResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use std::ops::{Deref, DerefMut};
use wafermap_backend::{Record, RecordKey, SetPayload, SharedBackend};
use wafermap_set::{ResourceSet, SetOp};

/// A resource that owns named sets and is stored as one record
pub trait Entity: Clone + Default + Debug {
    /// Global coordinate addressing one stored record
    type Id: Copy + Eq + Display + Debug;

    /// Record kind, also the key prefix
    const KIND: &'static str;

    /// Schema version written by this build
    const SCHEMA_VERSION: u32;

    /// Storage key of the entity at `id`
    fn record_key(id: Self::Id) -> RecordKey;

    /// Names accepted by [`Entity::named_set`]
    fn set_names() -> &'static [&'static str];

    /// Schema version a stored set name first appeared in
    fn introduced_in(stored_name: &str) -> Option<u32>;

    /// Look up a named set
    ///
    /// # Errors
    /// Returns [`ResourceError::UnknownSet`] for names the entity lacks
    fn named_set(&self, name: &str) -> ResourceResult<&ResourceSet>;

    /// Look up a named set for mutation
    ///
    /// # Errors
    /// Returns [`ResourceError::UnknownSet`] for names the entity lacks
    fn named_set_mut(&mut self, name: &str) -> ResourceResult<&mut ResourceSet>;

    /// Encode own sets, children excluded
    fn to_record(&self) -> Record;

    /// Payloads of a newer schema carried along since decoding
    fn unknown_sets(&self) -> &UnknownSets;

    /// Mutable access to the carried payloads
    fn unknown_sets_mut(&mut self) -> &mut UnknownSets;

    /// Decode own sets from a record whose header was already checked
    ///
    /// # Errors
    /// Payloads that do not fit their domain
    fn from_sets(record: &Record) -> ResourceResult<Self>;

    /// Combine in place with `other`, recursively for trees
    ///
    /// # Errors
    /// Domain or coordinate mismatch, or storage failure while loading
    /// children. On error `self` is unchanged.
    fn combine(&mut self, other: &Self, op: SetOp) -> ResourceResult<()>;

    /// Called after binding; trees keep the binding for lazy child loads
    fn attach(&mut self, _binding: &Binding<Self::Id>) {}

    /// Write the entity (and whatever it caches) through `binding`
    ///
    /// # Errors
    /// Storage failure
    fn store(&self, binding: &Binding<Self::Id>) -> ResourceResult<()> {
        binding.save_record::<Self>(&self.encode())
    }

    /// Own sets plus the carried payloads, ready to store
    fn encode(&self) -> Record {
        let mut record = self.to_record();
        self.unknown_sets().write_into(&mut record);
        record
    }

    /// Validate the record header and decode
    ///
    /// # Errors
    /// - [`ResourceError::KindMismatch`] for records of another kind
    /// - set payload errors, see [`Entity::from_sets`]
    fn decode(key: &RecordKey, record: &Record) -> ResourceResult<Self> {
        if record.kind != Self::KIND {
            return Err(ResourceError::KindMismatch {
                key: key.to_string(),
                expected: Self::KIND,
                found: record.kind.clone(),
            });
        }
        if record.schema_version > Self::SCHEMA_VERSION {
            tracing::warn!(
                "{key}: written by schema {} (known: {}), decoding known sets only",
                record.schema_version,
                Self::SCHEMA_VERSION
            );
        } else if record.schema_version < Self::SCHEMA_VERSION {
            tracing::debug!(
                "{key}: legacy schema {}, newer sets stay uninitialized",
                record.schema_version
            );
        }
        let mut entity = Self::from_sets(record)?;
        let unknown = UnknownSets::collect::<Self>(record);
        for name in unknown.names() {
            tracing::warn!("{key}: carrying unknown set '{name}' unchanged");
        }
        *entity.unknown_sets_mut() = unknown;
        Ok(entity)
    }
}

/// Set payloads this build has no accessor for
///
/// Filled when decoding a record written by a newer schema. Equality of
/// entities ignores them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownSets {
    schema_version: u32,
    sets: BTreeMap<String, SetPayload>,
}

impl UnknownSets {
    /// Payloads of `record` that `E` does not know by name
    #[must_use]
    pub fn collect<E: Entity>(record: &Record) -> Self {
        Self {
            schema_version: record.schema_version,
            sets: record
                .sets
                .iter()
                .filter(|(name, _)| E::introduced_in(name).is_none())
                .map(|(name, payload)| (name.clone(), payload.clone()))
                .collect(),
        }
    }

    /// Whether nothing is carried
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Names of the carried payloads
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Add the carried payloads to `record`
    ///
    /// The record keeps the newer schema version so readers that know the
    /// extra sets still recognize it.
    pub fn write_into(&self, record: &mut Record) {
        if self.is_empty() {
            return;
        }
        record.schema_version = record.schema_version.max(self.schema_version);
        for (name, payload) in &self.sets {
            record
                .sets
                .entry(name.clone())
                .or_insert_with(|| payload.clone());
        }
    }
}

/// Where an entity is stored and how missing records are treated
#[derive(Debug, Clone)]
pub struct Binding<I> {
    backend: SharedBackend,
    id: I,
    ignore_missing: bool,
}

impl<I: Copy + Display> Binding<I> {
    /// Bind coordinate `id` to `backend`
    #[must_use]
    pub fn new(backend: SharedBackend, id: I, ignore_missing: bool) -> Self {
        Self {
            backend,
            id,
            ignore_missing,
        }
    }

    /// Bound coordinate
    #[inline]
    #[must_use]
    pub fn id(&self) -> I {
        self.id
    }

    /// Shared backend handle
    #[inline]
    #[must_use]
    pub fn backend(&self) -> &SharedBackend {
        &self.backend
    }

    /// Whether absent records load as fresh entities
    #[inline]
    #[must_use]
    pub fn ignore_missing(&self) -> bool {
        self.ignore_missing
    }

    /// Binding for a child coordinate on the same backend
    #[must_use]
    pub fn child<C: Copy + Display>(&self, id: C) -> Binding<C> {
        Binding::new(self.backend.clone(), id, self.ignore_missing)
    }

    /// Load the entity stored at the bound coordinate
    ///
    /// # Errors
    /// - [`ResourceError::NotFound`] if nothing is stored and missing
    ///   records are not ignored
    /// - storage and decode failures
    pub fn load<E: Entity<Id = I>>(&self) -> ResourceResult<E> {
        let key = E::record_key(self.id);
        let mut entity = match self.backend.load(&key)? {
            Some(record) => {
                tracing::debug!("loaded {key}");
                E::decode(&key, &record)?
            }
            None if self.ignore_missing => {
                tracing::debug!("{key} not stored, starting uninitialized");
                E::default()
            }
            None => return Err(ResourceError::NotFound(key.to_string())),
        };
        entity.attach(self);
        Ok(entity)
    }

    /// Store a record of entity kind `E` at the bound coordinate
    ///
    /// # Errors
    /// Storage failure
    pub fn save_record<E: Entity<Id = I>>(&self, record: &Record) -> ResourceResult<()> {
        let key = E::record_key(self.id);
        self.backend.save(&key, record)?;
        tracing::info!("saved {key}");
        Ok(())
    }
}

/// An entity bound to its storage location
///
/// Dereferences to the entity. Mutations stay in memory until
/// [`WithBackend::save`].
#[derive(Debug, Clone)]
pub struct WithBackend<E: Entity> {
    entity: E,
    binding: Binding<E::Id>,
}

impl<E: Entity> WithBackend<E> {
    /// Bind to `id` on `backend` and load the stored state
    ///
    /// # Errors
    /// See [`Binding::load`]
    pub fn open(backend: SharedBackend, id: E::Id, ignore_missing: bool) -> ResourceResult<Self> {
        let binding = Binding::new(backend, id, ignore_missing);
        let entity = binding.load()?;
        Ok(Self { entity, binding })
    }

    /// Bind an existing in-memory entity without loading
    #[must_use]
    pub fn wrap(mut entity: E, backend: SharedBackend, id: E::Id) -> Self {
        let binding = Binding::new(backend, id, true);
        entity.attach(&binding);
        Self { entity, binding }
    }

    /// Bound coordinate
    #[inline]
    #[must_use]
    pub fn id(&self) -> E::Id {
        self.binding.id()
    }

    /// Storage binding
    #[inline]
    #[must_use]
    pub fn binding(&self) -> &Binding<E::Id> {
        &self.binding
    }

    /// Write the in-memory state back
    ///
    /// # Errors
    /// Storage failure
    pub fn save(&self) -> ResourceResult<()> {
        self.entity.store(&self.binding)
    }

    /// Release the entity, keeping any binding it attached itself
    #[must_use]
    pub fn into_inner(self) -> E {
        self.entity
    }

    /// Combine with another bound entity of the same coordinate
    ///
    /// # Errors
    /// [`ResourceError::DomainMismatch`] if the coordinates differ, plus
    /// see [`Entity::combine`]
    pub fn combine(&mut self, other: &Self, op: SetOp) -> ResourceResult<()> {
        if self.id() != other.id() {
            return Err(ResourceError::domain_mismatch(self.id(), other.id()));
        }
        self.entity.combine(&other.entity, op)
    }

    /// Union with `other`
    ///
    /// # Errors
    /// See [`WithBackend::combine`]
    pub fn merge(&mut self, other: &Self) -> ResourceResult<()> {
        self.combine(other, SetOp::Merge)
    }

    /// Intersect with `other`
    ///
    /// # Errors
    /// See [`WithBackend::combine`]
    pub fn intersection(&mut self, other: &Self) -> ResourceResult<()> {
        self.combine(other, SetOp::Intersection)
    }

    /// Remove what `other` has available
    ///
    /// # Errors
    /// See [`WithBackend::combine`]
    pub fn difference(&mut self, other: &Self) -> ResourceResult<()> {
        self.combine(other, SetOp::Difference)
    }

    /// Keep what exactly one side has available
    ///
    /// # Errors
    /// See [`WithBackend::combine`]
    pub fn symmetric_difference(&mut self, other: &Self) -> ResourceResult<()> {
        self.combine(other, SetOp::SymmetricDifference)
    }
}

impl<E: Entity> Deref for WithBackend<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.entity
    }
}

impl<E: Entity> DerefMut for WithBackend<E> {
    fn deref_mut(&mut self) -> &mut E {
        &mut self.entity
    }
}
