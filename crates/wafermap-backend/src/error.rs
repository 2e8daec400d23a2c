//! Error types for storage adapters

use std::path::PathBuf;
use wafermap_set::SetError;

/// Errors raised by backends and the backend registry
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Required record is absent
    #[error("record not found: {0}")]
    NotFound(String),

    /// Invalid, incomplete or inaccessible configuration
    #[error("backend configuration error: {0}")]
    Config(String),

    /// No adapter registered under this kind
    #[error("unsupported backend: '{0}'")]
    UnsupportedBackend(String),

    /// IO error against the storage location
    #[error("io error at {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Stored bytes are not a valid record
    #[error("codec error in {key}: {message}")]
    Codec {
        /// Record key
        key: String,
        /// Decoder message
        message: String,
    },

    /// Payload does not fit the domain it is decoded into
    #[error("payload error: {0}")]
    Payload(#[from] SetError),
}

impl BackendError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create codec error for a record key
    pub fn codec(key: impl ToString, message: impl ToString) -> Self {
        Self::Codec {
            key: key.to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_display() {
        let err = BackendError::UnsupportedBackend("xml".to_string());
        assert_eq!(err.to_string(), "unsupported backend: 'xml'");
    }

    #[test]
    fn payload_conversion() {
        let set_err = SetError::parse("W", "missing wafer number");
        let err: BackendError = set_err.into();
        assert!(matches!(err, BackendError::Payload(_)));
    }
}
