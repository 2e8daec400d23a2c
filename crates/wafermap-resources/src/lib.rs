//! wafermap resource trees
//!
//! Chip, FPGA and wafer entities built from named availability sets, bound
//! to a storage backend and persisted with additive schema evolution.
//!
//! # Core Concepts
//!
//! - [`Hicann`], [`Fpga`]: leaf entities made of named sets
//! - [`Wafer`]: presence sets plus a lazily filled child cache
//! - [`Entity`]: record codec, set lookup and algebra shared by all three
//! - [`WithBackend`]: an entity bound to a backend coordinate
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use wafermap_backend::MemoryBackend;
//! use wafermap_resources::WaferWithBackend;
//! use wafermap_set::{HicannOnWafer, WaferId};
//!
//! let backend = Arc::new(MemoryBackend::new());
//! let mut wafer = WaferWithBackend::open(backend.clone(), WaferId(33), true)?;
//! let hicann = HicannOnWafer::new(100)?;
//! wafer.get_hicann(hicann)?.neurons_mut().disable(5)?;
//! wafer.save()?;
//!
//! let mut reloaded = WaferWithBackend::open(backend, WaferId(33), false)?;
//! assert_eq!(reloaded.get_hicann(hicann)?.neurons().available(), 511);
//! # Ok::<(), wafermap_resources::ResourceError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

#[macro_use]
mod sets;

mod entity;
mod error;
mod fpga;
mod hicann;
mod wafer;

pub use entity::{Binding, Entity, UnknownSets, WithBackend};
pub use error::{ResourceError, ResourceResult};
pub use fpga::{Fpga, FpgaWithBackend};
pub use hicann::{Hicann, HicannWithBackend};
pub use wafer::{Wafer, WaferWithBackend};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
