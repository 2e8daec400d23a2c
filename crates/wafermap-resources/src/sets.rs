//! Leaf entities made of a fixed list of named sets
//!
//! `named_sets!` generates the struct, typed accessors, name lookup,
//! record encoding and set-wise algebra for an entity without children.
//!
//! Each entry reads
//! `accessor / accessor_mut: Coordinate = "stored_name" @ since_version`.
//! Accessor names are what [`Entity::named_set`](crate::Entity::named_set)
//! accepts; the stored name is the key inside the record. Both resolve.
//!
//! Equality compares the named sets only, not carried unknown payloads.

macro_rules! named_sets {
    (
        $(#[$meta:meta])*
        $name:ident {
            kind: $kind:literal,
            schema: $schema:literal,
            id: $id:ty,
            key: |$key_id:ident| $key:expr,
        }
        $(
            $(#[$fmeta:meta])*
            $field:ident / $field_mut:ident : $coord:ty = $stored:literal @ $since:literal
        ),+ $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            $( $field: ResourceSet, )+
            #[serde(default, skip_serializing_if = "UnknownSets::is_empty")]
            unknown: UnknownSets,
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $( $field: ResourceSet::of::<$coord>(), )+
                    unknown: UnknownSets::default(),
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                $( self.$field == other.$field )&&+
            }
        }

        impl Eq for $name {}

        impl $name {
            /// Create an entity with every set uninitialized
            #[inline]
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            $(
                $(#[$fmeta])*
                #[inline]
                #[must_use]
                pub fn $field(&self) -> &ResourceSet {
                    &self.$field
                }

                #[doc = concat!("Mutable access to `", stringify!($field), "`")]
                #[inline]
                pub fn $field_mut(&mut self) -> &mut ResourceSet {
                    &mut self.$field
                }
            )+

            /// Iterate `(accessor name, set)` in declaration order
            pub fn sets(&self) -> impl Iterator<Item = (&'static str, &ResourceSet)> {
                [$( (stringify!($field), &self.$field) ),+].into_iter()
            }

            /// Union with `other`
            ///
            /// # Errors
            /// See [`Entity::combine`](crate::Entity::combine)
            pub fn merge(&mut self, other: &Self) -> ResourceResult<()> {
                Entity::combine(self, other, SetOp::Merge)
            }

            /// Intersect with `other`
            ///
            /// # Errors
            /// See [`Entity::combine`](crate::Entity::combine)
            pub fn intersection(&mut self, other: &Self) -> ResourceResult<()> {
                Entity::combine(self, other, SetOp::Intersection)
            }

            /// Remove what `other` has available
            ///
            /// # Errors
            /// See [`Entity::combine`](crate::Entity::combine)
            pub fn difference(&mut self, other: &Self) -> ResourceResult<()> {
                Entity::combine(self, other, SetOp::Difference)
            }

            /// Keep what exactly one side has available
            ///
            /// # Errors
            /// See [`Entity::combine`](crate::Entity::combine)
            pub fn symmetric_difference(&mut self, other: &Self) -> ResourceResult<()> {
                Entity::combine(self, other, SetOp::SymmetricDifference)
            }
        }

        impl Entity for $name {
            type Id = $id;

            const KIND: &'static str = $kind;
            const SCHEMA_VERSION: u32 = $schema;

            fn record_key($key_id: $id) -> RecordKey {
                RecordKey::new($kind, $key)
            }

            fn set_names() -> &'static [&'static str] {
                &[$( stringify!($field) ),+]
            }

            fn introduced_in(stored_name: &str) -> Option<u32> {
                match stored_name {
                    $( $stored => Some($since), )+
                    _ => None,
                }
            }

            fn named_set(&self, name: &str) -> ResourceResult<&ResourceSet> {
                $(
                    if name == stringify!($field) || name == $stored {
                        return Ok(&self.$field);
                    }
                )+
                Err(ResourceError::unknown_set($kind, name))
            }

            fn named_set_mut(&mut self, name: &str) -> ResourceResult<&mut ResourceSet> {
                $(
                    if name == stringify!($field) || name == $stored {
                        return Ok(&mut self.$field);
                    }
                )+
                Err(ResourceError::unknown_set($kind, name))
            }

            fn to_record(&self) -> Record {
                let mut record = Record::new($kind, $schema);
                $( record.put($stored, &self.$field); )+
                record
            }

            fn unknown_sets(&self) -> &UnknownSets {
                &self.unknown
            }

            fn unknown_sets_mut(&mut self) -> &mut UnknownSets {
                &mut self.unknown
            }

            fn from_sets(record: &Record) -> ResourceResult<Self> {
                Ok(Self {
                    $( $field: record.take($stored, &<$coord as Coordinate>::DOMAIN)?, )+
                    unknown: UnknownSets::default(),
                })
            }

            fn combine(&mut self, other: &Self, op: SetOp) -> ResourceResult<()> {
                let mut next = self.clone();
                $( op.apply(&mut next.$field, &other.$field)?; )+
                *self = next;
                Ok(())
            }
        }
    };
}
