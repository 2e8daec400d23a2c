//! Persisted record layout
//!
//! One [`Record`] per (entity kind, coordinate). A record maps set names to
//! [`SetPayload`]s. A name missing from the map means the set was either
//! never initialized or did not exist when the record was written; both
//! decode to an uninitialized set.
//!
//! ```text
//! {
//!   "kind": "hicann",
//!   "schema_version": 2,
//!   "sets": {
//!     "neurons": { "size": 512, "disabled": [5, 17] },
//!     "drivers": { "size": 224, "disabled": [] }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use wafermap_set::{Domain, ResourceSet, SetError, SetResult};

/// Storage address of a record
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey {
    kind: String,
    id: String,
}

impl RecordKey {
    /// Create key for an entity kind and coordinate id
    #[inline]
    #[must_use]
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Entity kind, e.g. `hicann`
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Coordinate id within the kind, e.g. `33-100`
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.id)
    }
}

/// Encoded initialized set: domain size plus disabled indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPayload {
    /// Size of the domain the set was written for
    pub size: usize,
    /// Disabled indices, ascending
    #[serde(default)]
    pub disabled: Vec<usize>,
}

impl SetPayload {
    /// Encode a set; uninitialized sets have no payload
    #[must_use]
    pub fn encode(set: &ResourceSet) -> Option<Self> {
        set.has_value().then(|| Self {
            size: set.domain().size(),
            disabled: set.iter_disabled().collect(),
        })
    }

    /// Decode into a set over `domain`
    ///
    /// # Errors
    /// - [`SetError::DomainMismatch`] if the payload was written for a
    ///   domain of another size
    /// - [`SetError::OutOfRange`] for disabled indices outside the domain
    pub fn decode(&self, domain: &Domain) -> SetResult<ResourceSet> {
        if self.size != domain.size() {
            let written = Domain::new("stored_payload", self.size);
            return Err(SetError::domain_mismatch(domain, &written));
        }
        ResourceSet::from_disabled(domain.clone(), self.disabled.iter().copied())
    }
}

/// Stored state of one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Entity kind that wrote this record
    pub kind: String,
    /// Schema version of the writer
    #[serde(default)]
    pub schema_version: u32,
    /// Named set payloads
    #[serde(default)]
    pub sets: BTreeMap<String, SetPayload>,
}

impl Record {
    /// Create empty record
    #[inline]
    #[must_use]
    pub fn new(kind: impl Into<String>, schema_version: u32) -> Self {
        Self {
            kind: kind.into(),
            schema_version,
            sets: BTreeMap::new(),
        }
    }

    /// Store a named set; uninitialized sets are left out
    pub fn put(&mut self, name: &str, set: &ResourceSet) {
        match SetPayload::encode(set) {
            Some(payload) => {
                self.sets.insert(name.to_string(), payload);
            }
            None => {
                self.sets.remove(name);
            }
        }
    }

    /// Decode a named set over `domain`, uninitialized if absent
    ///
    /// # Errors
    /// See [`SetPayload::decode`]
    pub fn take(&self, name: &str, domain: &Domain) -> SetResult<ResourceSet> {
        match self.sets.get(name) {
            Some(payload) => payload.decode(domain),
            None => Ok(ResourceSet::new(domain.clone())),
        }
    }

    /// Names present in the record
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wafermap_set::{Coordinate, HLineOnHicann, NeuronOnHicann};

    #[test]
    fn key_display() {
        assert_eq!(RecordKey::new("hicann", "33-100").to_string(), "hicann-33-100");
    }

    #[test]
    fn uninitialized_sets_are_omitted() {
        let mut record = Record::new("hicann", 2);
        record.put("neurons", &ResourceSet::of::<NeuronOnHicann>());
        assert_eq!(record.names().count(), 0);
    }

    #[test]
    fn put_take_preserves_content() {
        let mut neurons = ResourceSet::of::<NeuronOnHicann>();
        neurons.disable(5).unwrap();
        let mut record = Record::new("hicann", 2);
        record.put("neurons", &neurons);

        let back = record.take("neurons", &NeuronOnHicann::DOMAIN).unwrap();
        assert_eq!(back, neurons);
    }

    #[test]
    fn absent_name_decodes_uninitialized() {
        let record = Record::new("hicann", 0);
        let set = record.take("synapserows", &NeuronOnHicann::DOMAIN).unwrap();
        assert!(!set.has_value());
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let mut record = Record::new("hicann", 2);
        record.put("hbuses", &{
            let mut s = ResourceSet::of::<HLineOnHicann>();
            s.enable_all();
            s
        });
        let err = record.take("hbuses", &NeuronOnHicann::DOMAIN).unwrap_err();
        assert!(matches!(err, SetError::DomainMismatch { .. }));
    }

    #[test]
    fn missing_optional_fields_deserialize() {
        let record: Record = serde_json::from_str(r#"{"kind":"wafer"}"#).unwrap();
        assert_eq!(record.schema_version, 0);
        assert!(record.sets.is_empty());
    }
}
