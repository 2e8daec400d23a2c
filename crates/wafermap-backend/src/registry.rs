//! Backend registry
//!
//! Provides [`BackendRegistry`] for resolving a backend kind string to an
//! adapter constructor.

use crate::backend::{Backend, SharedBackend};
use crate::config::ConfigValue;
use crate::error::{BackendError, BackendResult};
use crate::jsondir::JsonDirBackend;
use crate::memory::MemoryBackend;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Constructor for an unconfigured backend
pub type BackendFactory = fn() -> Box<dyn Backend>;

/// Registry of available storage adapters
#[derive(Debug, Default, Clone)]
pub struct BackendRegistry {
    factories: BTreeMap<String, BackendFactory>,
}

impl BackendRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Create registry with built-in adapters
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MemoryBackend::KIND, || Box::new(MemoryBackend::new()));
        registry.register(JsonDirBackend::KIND, || Box::new(JsonDirBackend::new()));
        registry
    }

    /// Register an adapter constructor
    pub fn register(&mut self, kind: &str, factory: BackendFactory) {
        self.factories.insert(kind.to_string(), factory);
    }

    /// Check if adapter exists
    #[inline]
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// List registered adapter names in order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Get number of registered adapters
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Construct a fresh, unconfigured adapter
    ///
    /// # Errors
    /// Returns [`BackendError::UnsupportedBackend`] for unknown kinds
    pub fn create(&self, kind: &str) -> BackendResult<Box<dyn Backend>> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| BackendError::UnsupportedBackend(kind.to_string()))?;
        Ok(factory())
    }

    /// Construct, configure and initialize an adapter
    ///
    /// # Errors
    /// - [`BackendError::UnsupportedBackend`] for unknown kinds
    /// - [`BackendError::Config`] if `init()` rejects the options
    pub fn open<I, K>(&self, kind: &str, options: I) -> BackendResult<SharedBackend>
    where
        I: IntoIterator<Item = (K, ConfigValue)>,
        K: AsRef<str>,
    {
        let mut backend = self.create(kind)?;
        for (key, value) in options {
            backend.config(key.as_ref(), value);
        }
        backend.init()?;
        tracing::info!("opened {} backend", kind);
        Ok(Arc::from(backend))
    }
}

/// Open an adapter from the default registry
///
/// # Errors
/// See [`BackendRegistry::open`]
pub fn open_backend<I, K>(kind: &str, options: I) -> BackendResult<SharedBackend>
where
    I: IntoIterator<Item = (K, ConfigValue)>,
    K: AsRef<str>,
{
    BackendRegistry::with_defaults().open(kind, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_new_empty() {
        let registry = BackendRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn registry_with_defaults() {
        let registry = BackendRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["jsondir", "memory"]);
    }

    #[test]
    fn create_unknown_is_unsupported() {
        let registry = BackendRegistry::with_defaults();
        let err = registry.create("xml").unwrap_err();
        assert!(matches!(err, BackendError::UnsupportedBackend(k) if k == "xml"));
    }

    #[test]
    fn create_returns_requested_kind() {
        let registry = BackendRegistry::with_defaults();
        assert_eq!(registry.create("memory").unwrap().kind(), "memory");
        assert_eq!(registry.create("jsondir").unwrap().kind(), "jsondir");
    }

    #[test]
    fn register_custom_alias() {
        let mut registry = BackendRegistry::new();
        registry.register("mock", || Box::new(MemoryBackend::new()));
        assert!(registry.contains("mock"));
        assert_eq!(registry.create("mock").unwrap().kind(), "memory");
    }

    #[test]
    fn open_applies_options() {
        let backend = open_backend("memory", [("owner", ConfigValue::from("lab"))]).unwrap();
        assert_eq!(
            backend.config_map().get_str("owner").unwrap(),
            Some("lab")
        );
    }

    #[test]
    fn open_surfaces_init_failure() {
        let err = open_backend(
            "jsondir",
            [("path", ConfigValue::from("/definitely/not/here"))],
        )
        .unwrap_err();
        assert!(matches!(err, BackendError::Config(_)));
    }
}
