//! Backend configuration options
//!
//! Options are recorded with [`BackendConfig::set`] before `init()` and
//! interpreted by the adapter there. Unknown keys are kept and ignored.

use crate::error::{BackendError, BackendResult};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// A single configuration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// Textual option, e.g. a storage path
    Str(String),
    /// Integer option
    Int(i64),
}

impl Display for ConfigValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Int(i64::from(b))
    }
}

/// Key/value options of one backend instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
    values: BTreeMap<String, ConfigValue>,
}

impl BackendConfig {
    /// Create empty configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an option; an empty string removes the key
    pub fn set(&mut self, key: &str, value: ConfigValue) {
        if value == ConfigValue::Str(String::new()) {
            self.values.remove(key);
        } else {
            self.values.insert(key.to_string(), value);
        }
    }

    /// Check if an option was given
    #[inline]
    #[must_use]
    pub fn exists(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Raw option lookup
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Textual option
    ///
    /// # Errors
    /// Returns [`BackendError::Config`] if the option holds an integer
    pub fn get_str(&self, key: &str) -> BackendResult<Option<&str>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(ConfigValue::Str(s)) => Ok(Some(s)),
            Some(ConfigValue::Int(_)) => Err(BackendError::Config(format!(
                "option '{key}' must be a string"
            ))),
        }
    }

    /// Boolean option, accepting integers and `true`/`false`/`yes`/`no`
    ///
    /// # Errors
    /// Returns [`BackendError::Config`] for other values
    pub fn get_bool(&self, key: &str) -> BackendResult<Option<bool>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(ConfigValue::Int(i)) => Ok(Some(*i != 0)),
            Some(ConfigValue::Str(s)) => match s.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(Some(true)),
                "false" | "no" | "0" => Ok(Some(false)),
                _ => Err(BackendError::Config(format!(
                    "option '{key}' is not a boolean: '{s}'"
                ))),
            },
        }
    }

    /// Iterate all options in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
