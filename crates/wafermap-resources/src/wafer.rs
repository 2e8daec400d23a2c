//! Wafer tree
//!
//! A [`Wafer`] owns two presence sets (`hicanns`, `fpgas`) and caches the
//! chip and FPGA entities below it. Children are materialized on first
//! access: loaded through the wafer's binding if it has one, fresh
//! otherwise. Once cached, a child is never reloaded.
//!
//! Equality treats a child missing from the cache like a fresh one, so
//! reading an untouched child never changes how trees compare. Serializing
//! a wafer with `serde` captures the presence sets and every cached child;
//! the binding is not part of it.
//!
//! Schema history: version 0 stores `hicanns`, version 1 adds `fpgas`.

use crate::entity::{Binding, Entity, UnknownSets, WithBackend};
use crate::error::{ResourceError, ResourceResult};
use crate::fpga::Fpga;
use crate::hicann::Hicann;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use wafermap_backend::{Record, RecordKey};
use wafermap_set::{
    Coordinate, FpgaGlobal, FpgaOnWafer, HicannGlobal, HicannOnWafer, ResourceSet, SetOp, WaferId,
};

const HICANNS: &str = "hicanns";
const FPGAS: &str = "fpgas";

/// Defect state of a wafer and the children accessed so far
///
/// Equality compares presence sets and children, not the binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wafer {
    hicanns: ResourceSet,
    fpgas: ResourceSet,
    #[serde(default)]
    hicann_cache: BTreeMap<HicannOnWafer, Hicann>,
    #[serde(default)]
    fpga_cache: BTreeMap<FpgaOnWafer, Fpga>,
    #[serde(default, skip_serializing_if = "UnknownSets::is_empty")]
    unknown: UnknownSets,
    #[serde(skip)]
    binding: Option<Binding<WaferId>>,
}

impl Default for Wafer {
    fn default() -> Self {
        Self {
            hicanns: ResourceSet::of::<HicannOnWafer>(),
            fpgas: ResourceSet::of::<FpgaOnWafer>(),
            hicann_cache: BTreeMap::new(),
            fpga_cache: BTreeMap::new(),
            unknown: UnknownSets::default(),
            binding: None,
        }
    }
}

impl PartialEq for Wafer {
    fn eq(&self, other: &Self) -> bool {
        self.hicanns == other.hicanns
            && self.fpgas == other.fpgas
            && same_children(&self.hicann_cache, &other.hicann_cache)
            && same_children(&self.fpga_cache, &other.fpga_cache)
    }
}

/// Compare caches over the union of their keys, absent meaning fresh
fn same_children<K: Ord, E: Entity + PartialEq>(
    mine: &BTreeMap<K, E>,
    theirs: &BTreeMap<K, E>,
) -> bool {
    let fresh = E::default();
    mine.iter()
        .all(|(coord, child)| theirs.get(coord).unwrap_or(&fresh) == child)
        && theirs
            .iter()
            .all(|(coord, child)| mine.contains_key(coord) || *child == fresh)
}

impl Eq for Wafer {}

impl Wafer {
    /// Create an unbound wafer with uninitialized presence sets
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Chip presence set
    #[inline]
    #[must_use]
    pub fn hicanns(&self) -> &ResourceSet {
        &self.hicanns
    }

    /// Mutable chip presence set
    #[inline]
    pub fn hicanns_mut(&mut self) -> &mut ResourceSet {
        &mut self.hicanns
    }

    /// FPGA presence set
    #[inline]
    #[must_use]
    pub fn fpgas(&self) -> &ResourceSet {
        &self.fpgas
    }

    /// Mutable FPGA presence set
    #[inline]
    pub fn fpgas_mut(&mut self) -> &mut ResourceSet {
        &mut self.fpgas
    }

    /// Whether the chip is marked present
    #[must_use]
    pub fn has_hicann(&self, hicann: HicannOnWafer) -> bool {
        matches!(self.hicanns.has_coord(hicann), Ok(true))
    }

    /// Whether the FPGA is marked present
    #[must_use]
    pub fn has_fpga(&self, fpga: FpgaOnWafer) -> bool {
        matches!(self.fpgas.has_coord(fpga), Ok(true))
    }

    /// Bound wafer id, if any
    #[must_use]
    pub fn id(&self) -> Option<WaferId> {
        self.binding.as_ref().map(Binding::id)
    }

    /// Chip entity, loaded on first access and cached afterwards
    ///
    /// # Errors
    /// Storage failure, or [`ResourceError::NotFound`] when the chip record
    /// is absent and the binding does not ignore missing records
    pub fn get_hicann(&mut self, hicann: HicannOnWafer) -> ResourceResult<&mut Hicann> {
        match self.hicann_cache.entry(hicann) {
            Entry::Occupied(cached) => Ok(cached.into_mut()),
            Entry::Vacant(slot) => {
                let child = fetch(self.binding.as_ref(), |w| HicannGlobal::new(hicann, w))?;
                Ok(slot.insert(child))
            }
        }
    }

    /// FPGA entity, loaded on first access and cached afterwards
    ///
    /// # Errors
    /// See [`Wafer::get_hicann`]
    pub fn get_fpga(&mut self, fpga: FpgaOnWafer) -> ResourceResult<&mut Fpga> {
        match self.fpga_cache.entry(fpga) {
            Entry::Occupied(cached) => Ok(cached.into_mut()),
            Entry::Vacant(slot) => {
                let child = fetch(self.binding.as_ref(), |w| FpgaGlobal::new(fpga, w))?;
                Ok(slot.insert(child))
            }
        }
    }

    /// Like [`Wafer::get_hicann`], but `None` for chips marked absent
    ///
    /// # Errors
    /// See [`Wafer::get_hicann`]
    pub fn get_hicann_if_present(
        &mut self,
        hicann: HicannOnWafer,
    ) -> ResourceResult<Option<&mut Hicann>> {
        if !self.has_hicann(hicann) {
            return Ok(None);
        }
        self.get_hicann(hicann).map(Some)
    }

    /// Like [`Wafer::get_fpga`], but `None` for FPGAs marked absent
    ///
    /// # Errors
    /// See [`Wafer::get_hicann`]
    pub fn get_fpga_if_present(&mut self, fpga: FpgaOnWafer) -> ResourceResult<Option<&mut Fpga>> {
        if !self.has_fpga(fpga) {
            return Ok(None);
        }
        self.get_fpga(fpga).map(Some)
    }

    /// Place a chip entity in the cache, shadowing stored data
    pub fn inject_hicann(&mut self, hicann: HicannOnWafer, child: Hicann) {
        self.hicann_cache.insert(hicann, child);
    }

    /// Place an FPGA entity in the cache, shadowing stored data
    pub fn inject_fpga(&mut self, fpga: FpgaOnWafer, child: Fpga) {
        self.fpga_cache.insert(fpga, child);
    }

    /// Cached chip, without loading
    #[must_use]
    pub fn cached_hicann(&self, hicann: HicannOnWafer) -> Option<&Hicann> {
        self.hicann_cache.get(&hicann)
    }

    /// Cached FPGA, without loading
    #[must_use]
    pub fn cached_fpga(&self, fpga: FpgaOnWafer) -> Option<&Fpga> {
        self.fpga_cache.get(&fpga)
    }

    /// Coordinates of all cached chips, ascending
    pub fn cached_hicanns(&self) -> impl Iterator<Item = HicannOnWafer> + '_ {
        self.hicann_cache.keys().copied()
    }

    /// Coordinates of all cached FPGAs, ascending
    pub fn cached_fpgas(&self) -> impl Iterator<Item = FpgaOnWafer> + '_ {
        self.fpga_cache.keys().copied()
    }

    /// Union with `other`, recursively
    ///
    /// # Errors
    /// See [`Entity::combine`]
    pub fn merge(&mut self, other: &Self) -> ResourceResult<()> {
        self.combine(other, SetOp::Merge)
    }

    /// Intersection with `other`, recursively
    ///
    /// # Errors
    /// See [`Entity::combine`]
    pub fn intersection(&mut self, other: &Self) -> ResourceResult<()> {
        self.combine(other, SetOp::Intersection)
    }

    /// Difference with `other`, recursively
    ///
    /// # Errors
    /// See [`Entity::combine`]
    pub fn difference(&mut self, other: &Self) -> ResourceResult<()> {
        self.combine(other, SetOp::Difference)
    }

    /// Symmetric difference with `other`, recursively
    ///
    /// # Errors
    /// See [`Entity::combine`]
    pub fn symmetric_difference(&mut self, other: &Self) -> ResourceResult<()> {
        self.combine(other, SetOp::SymmetricDifference)
    }

    fn peek_hicann(&self, hicann: HicannOnWafer) -> ResourceResult<Cow<'_, Hicann>> {
        match self.hicann_cache.get(&hicann) {
            Some(cached) => Ok(Cow::Borrowed(cached)),
            None => fetch(self.binding.as_ref(), |w| HicannGlobal::new(hicann, w)).map(Cow::Owned),
        }
    }

    fn peek_fpga(&self, fpga: FpgaOnWafer) -> ResourceResult<Cow<'_, Fpga>> {
        match self.fpga_cache.get(&fpga) {
            Some(cached) => Ok(Cow::Borrowed(cached)),
            None => fetch(self.binding.as_ref(), |w| FpgaGlobal::new(fpga, w)).map(Cow::Owned),
        }
    }
}

/// Load a child through the wafer binding, or create it fresh when unbound
fn fetch<E: Entity>(
    binding: Option<&Binding<WaferId>>,
    child_id: impl FnOnce(WaferId) -> E::Id,
) -> ResourceResult<E> {
    match binding {
        Some(binding) => binding.child(child_id(binding.id())).load(),
        None => Ok(E::default()),
    }
}

impl Entity for Wafer {
    type Id = WaferId;

    const KIND: &'static str = "wafer";
    const SCHEMA_VERSION: u32 = 1;

    fn record_key(id: WaferId) -> RecordKey {
        RecordKey::new(Self::KIND, id.0.to_string())
    }

    fn set_names() -> &'static [&'static str] {
        &[HICANNS, FPGAS]
    }

    fn introduced_in(stored_name: &str) -> Option<u32> {
        match stored_name {
            HICANNS => Some(0),
            FPGAS => Some(1),
            _ => None,
        }
    }

    fn named_set(&self, name: &str) -> ResourceResult<&ResourceSet> {
        match name {
            HICANNS => Ok(&self.hicanns),
            FPGAS => Ok(&self.fpgas),
            _ => Err(ResourceError::unknown_set(Self::KIND, name)),
        }
    }

    fn named_set_mut(&mut self, name: &str) -> ResourceResult<&mut ResourceSet> {
        match name {
            HICANNS => Ok(&mut self.hicanns),
            FPGAS => Ok(&mut self.fpgas),
            _ => Err(ResourceError::unknown_set(Self::KIND, name)),
        }
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new(Self::KIND, Self::SCHEMA_VERSION);
        record.put(HICANNS, &self.hicanns);
        record.put(FPGAS, &self.fpgas);
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
            hicanns: record.take(HICANNS, &HicannOnWafer::DOMAIN)?,
            fpgas: record.take(FPGAS, &FpgaOnWafer::DOMAIN)?,
            ..Self::default()
        })
    }

    /// Combine presence sets and every child cached on either side
    ///
    /// Children cached only here are combined with the other side's stored
    /// (or fresh) state; children cached only there are loaded here first.
    fn combine(&mut self, other: &Self, op: SetOp) -> ResourceResult<()> {
        if let (Some(mine), Some(theirs)) = (self.id(), other.id()) {
            if mine != theirs {
                return Err(ResourceError::domain_mismatch(mine, theirs));
            }
        }

        let mut next = self.clone();
        op.apply(&mut next.hicanns, &other.hicanns)?;
        op.apply(&mut next.fpgas, &other.fpgas)?;

        let hicanns: BTreeSet<_> = self.cached_hicanns().chain(other.cached_hicanns()).collect();
        for hicann in hicanns {
            let theirs = other.peek_hicann(hicann)?;
            next.get_hicann(hicann)?.combine(&theirs, op)?;
        }

        let fpgas: BTreeSet<_> = self.cached_fpgas().chain(other.cached_fpgas()).collect();
        for fpga in fpgas {
            let theirs = other.peek_fpga(fpga)?;
            next.get_fpga(fpga)?.combine(&theirs, op)?;
        }

        tracing::debug!(
            "{op}: {} chips, {} fpgas",
            next.hicann_cache.len(),
            next.fpga_cache.len()
        );
        *self = next;
        Ok(())
    }

    fn attach(&mut self, binding: &Binding<WaferId>) {
        self.binding = Some(binding.clone());
    }

    /// Write the wafer record and every cached child
    fn store(&self, binding: &Binding<WaferId>) -> ResourceResult<()> {
        binding.save_record::<Self>(&self.encode())?;
        for (&hicann, child) in &self.hicann_cache {
            child.store(&binding.child(HicannGlobal::new(hicann, binding.id())))?;
        }
        for (&fpga, child) in &self.fpga_cache {
            child.store(&binding.child(FpgaGlobal::new(fpga, binding.id())))?;
        }
        Ok(())
    }
}

/// Wafer bound to its record; children load through the same backend
pub type WaferWithBackend = WithBackend<Wafer>;
