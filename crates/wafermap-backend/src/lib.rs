//! wafermap storage backends
//!
//! Pluggable storage adapters for defect records.
//!
//! # Core Concepts
//!
//! - [`Backend`]: adapter trait (`config` / `init` / `load` / `save`)
//! - [`BackendRegistry`]: resolves a kind string to an adapter
//! - [`Record`]: per-entity map of named [`SetPayload`]s
//! - [`MemoryBackend`], [`JsonDirBackend`]: built-in adapters
//!
//! # Example
//!
//! ```rust
//! use wafermap_backend::{open_backend, ConfigValue, Record, RecordKey};
//!
//! let backend = open_backend("memory", Vec::<(String, ConfigValue)>::new())?;
//! let key = RecordKey::new("wafer", "33");
//! backend.save(&key, &Record::new("wafer", 1))?;
//! assert!(backend.load(&key)?.is_some());
//! # Ok::<(), wafermap_backend::BackendError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod backend;
mod config;
mod error;
mod jsondir;
mod memory;
mod record;
mod registry;

pub use backend::{Backend, SharedBackend};
pub use config::{BackendConfig, ConfigValue};
pub use error::{BackendError, BackendResult};
pub use jsondir::JsonDirBackend;
pub use memory::MemoryBackend;
pub use record::{Record, RecordKey, SetPayload};
pub use registry::{open_backend, BackendFactory, BackendRegistry};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
