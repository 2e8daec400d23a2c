//! In-process storage
//!
//! Records are kept as serialized JSON strings so that every load yields an
//! independent copy, the same as reading from disk.

use crate::backend::Backend;
use crate::config::BackendConfig;
use crate::error::{BackendError, BackendResult};
use crate::record::{Record, RecordKey};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Backend holding records in memory
#[derive(Debug, Default)]
pub struct MemoryBackend {
    config: BackendConfig,
    store: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Registry name
    pub const KIND: &'static str = "memory";

    /// Create empty backend
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text under `key`, bypassing the encoder
    ///
    /// Used to plant records written by older schema versions.
    pub fn insert_raw(&self, key: &RecordKey, text: impl Into<String>) {
        self.store.lock().insert(key.to_string(), text.into());
    }

    /// Raw text stored under `key`
    #[must_use]
    pub fn get_raw(&self, key: &RecordKey) -> Option<String> {
        self.store.lock().get(&key.to_string()).cloned()
    }

    /// Number of stored records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    /// Check if nothing is stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }
}

impl Backend for MemoryBackend {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn config_map(&self) -> &BackendConfig {
        &self.config
    }

    fn config_map_mut(&mut self) -> &mut BackendConfig {
        &mut self.config
    }

    fn init(&mut self) -> BackendResult<()> {
        Ok(())
    }

    fn load(&self, key: &RecordKey) -> BackendResult<Option<Record>> {
        let Some(text) = self.get_raw(key) else {
            tracing::debug!("memory: no record for {}", key);
            return Ok(None);
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| BackendError::codec(key, e))
    }

    fn save(&self, key: &RecordKey, record: &Record) -> BackendResult<()> {
        let text = serde_json::to_string(record).map_err(|e| BackendError::codec(key, e))?;
        self.store.lock().insert(key.to_string(), text);
        tracing::debug!("memory: stored {}", key);
        Ok(())
    }
}
