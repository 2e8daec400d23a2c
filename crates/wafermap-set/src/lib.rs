//! wafermap availability sets
//!
//! Coordinate domains and the set algebra used to track usable versus
//! defective hardware resources.
//!
//! # Core Concepts
//!
//! - [`Domain`]: fixed-size index space of one resource kind
//! - [`Coordinate`]: typed, validated index into a domain
//! - [`ResourceSet`]: available subset of a domain, uninitialized means full
//! - [`SwitchMode`]: strict or lenient single-coordinate mutation
//! - [`SetOp`]: binary combinator selectable by name
//!
//! # Example
//!
//! ```rust
//! use wafermap_set::{NeuronOnHicann, ResourceSet};
//!
//! let mut neurons = ResourceSet::of::<NeuronOnHicann>();
//! assert!(!neurons.has_value());
//! assert_eq!(neurons.available(), 512);
//!
//! neurons.disable(5)?;
//! assert_eq!(neurons.available(), 511);
//! # Ok::<(), wafermap_set::SetError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod domain;
mod error;
mod op;
mod set;

pub use domain::{
    all, AnalogOnHicann, BackgroundGeneratorOnHicann, Coordinate, CrossbarSwitchOnHicann,
    DncMergerOnHicann, Domain, FgBlockOnHicann, FpgaGlobal, FpgaOnWafer, GlobalResource,
    HLineOnHicann, HRepeaterOnHicann, HicannGlobal, HicannOnWafer, HighspeedLinkOnDnc,
    Merger0OnHicann, Merger1OnHicann, Merger2OnHicann, Merger3OnHicann, NeuronOnHicann,
    SynapseDriverOnHicann, SynapseOnHicann, SynapseRowOnHicann, SynapseSwitchOnHicann,
    SynapseSwitchRowOnHicann, SynapticInputOnHicann, VLineOnHicann, VRepeaterOnHicann, WaferId,
    HICANNS_PER_FPGA,
};
pub use error::{SetError, SetResult, Switch};
pub use op::SetOp;
pub use set::{ResourceSet, SwitchMode};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
