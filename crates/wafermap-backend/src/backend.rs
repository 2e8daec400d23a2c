//! Storage adapter trait
//!
//! Provides the [`Backend`] trait implemented by every storage flavor.

use crate::config::{BackendConfig, ConfigValue};
use crate::error::BackendResult;
use crate::record::{Record, RecordKey};
use std::sync::Arc;

/// Storage driver for defect records
///
/// Lifecycle: `config()` any number of times, then `init()`, then
/// `load()`/`save()`. A backend is single-writer; sharing one between a
/// tree root and its lazily loaded children goes through [`SharedBackend`].
pub trait Backend: Send + Sync + std::fmt::Debug {
    /// Registry name of this adapter
    fn kind(&self) -> &'static str;

    /// Options recorded so far
    fn config_map(&self) -> &BackendConfig;

    /// Mutable access to the recorded options
    fn config_map_mut(&mut self) -> &mut BackendConfig;

    /// Validate configuration and prepare the storage location
    ///
    /// # Errors
    /// Returns [`BackendError::Config`](crate::BackendError::Config) on
    /// invalid or inaccessible configuration
    fn init(&mut self) -> BackendResult<()>;

    /// Fetch a stored record, `None` if nothing is stored under `key`
    ///
    /// # Errors
    /// IO and codec failures of the underlying storage
    fn load(&self, key: &RecordKey) -> BackendResult<Option<Record>>;

    /// Durably store a record, replacing any previous version
    ///
    /// # Errors
    /// IO and codec failures of the underlying storage
    fn save(&self, key: &RecordKey, record: &Record) -> BackendResult<()>;

    /// Record a configuration option; must happen before `init()`
    fn config(&mut self, key: &str, value: ConfigValue) {
        tracing::debug!("{}: config {} = {}", self.kind(), key, value);
        self.config_map_mut().set(key, value);
    }
}

/// Backend handle shared by a tree root and its children
pub type SharedBackend = Arc<dyn Backend>;
