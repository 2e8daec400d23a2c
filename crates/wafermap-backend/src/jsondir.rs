//! Directory of JSON files
//!
//! One pretty-printed file `<kind>-<id>.json` per record below the
//! configured directory.
//!
//! Options:
//! - `path`: storage directory, default `.`
//! - `create`: create the directory in `init()` if it is missing

use crate::backend::Backend;
use crate::config::BackendConfig;
use crate::error::{BackendError, BackendResult};
use crate::record::{Record, RecordKey};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Backend storing one JSON file per record
#[derive(Debug, Default)]
pub struct JsonDirBackend {
    config: BackendConfig,
    root: Option<PathBuf>,
}

impl JsonDirBackend {
    /// Registry name
    pub const KIND: &'static str = "jsondir";

    /// Create unconfigured backend
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage directory, available after `init()`
    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// File a record is stored in
    ///
    /// # Errors
    /// Returns [`BackendError::Config`] before `init()`
    pub fn file_for(&self, key: &RecordKey) -> BackendResult<PathBuf> {
        let root = self.root.as_ref().ok_or_else(|| {
            BackendError::Config(format!("{} used before init()", Self::KIND))
        })?;
        Ok(root.join(format!("{key}.json")))
    }
}

impl Backend for JsonDirBackend {
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
        let path = PathBuf::from(self.config.get_str("path")?.unwrap_or("."));
        let create = self.config.get_bool("create")?.unwrap_or(false);

        if !path.is_dir() {
            if path.exists() {
                return Err(BackendError::Config(format!(
                    "path is not a directory: {}",
                    path.display()
                )));
            }
            if !create {
                return Err(BackendError::Config(format!(
                    "path not available: {}",
                    path.display()
                )));
            }
            fs::create_dir_all(&path).map_err(|e| {
                BackendError::Config(format!("cannot create {}: {e}", path.display()))
            })?;
            tracing::info!("jsondir: created {}", path.display());
        }

        self.root = Some(path);
        Ok(())
    }

    fn load(&self, key: &RecordKey) -> BackendResult<Option<Record>> {
        let file = self.file_for(key)?;
        if !file.exists() {
            tracing::debug!("jsondir: no record at {}", file.display());
            return Ok(None);
        }
        let bytes = fs::read(&file).map_err(|e| BackendError::io_error(&file, e))?;
        let record = serde_json::from_slice(&bytes).map_err(|e| BackendError::codec(key, e))?;
        tracing::debug!("jsondir: loaded {}", file.display());
        Ok(Some(record))
    }

    fn save(&self, key: &RecordKey, record: &Record) -> BackendResult<()> {
        let file = self.file_for(key)?;
        let tmp = file.with_extension(format!("json.tmp.{}", std::process::id()));

        let written = write_pretty(&tmp, key, record);
        if let Err(error) = written {
            let _ = fs::remove_file(&tmp);
            return Err(error);
        }

        fs::rename(&tmp, &file).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            BackendError::io_error(&file, e)
        })?;
        tracing::debug!("jsondir: stored {}", file.display());
        Ok(())
    }
}

fn write_pretty(path: &Path, key: &RecordKey, record: &Record) -> BackendResult<()> {
    let file = File::create(path).map_err(|e| BackendError::io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, record).map_err(|e| BackendError::codec(key, e))?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|e| BackendError::io_error(path, e))?;
    let file = writer
        .into_inner()
        .map_err(|e| BackendError::io_error(path, e.into_error()))?;
    file.sync_all().map_err(|e| BackendError::io_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_at(path: &Path) -> JsonDirBackend {
        let mut backend = JsonDirBackend::new();
        backend.config("path", path.to_string_lossy().into_owned().into());
        backend
    }

    #[test]
    fn init_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = backend_at(&dir.path().join("absent"));
        assert!(matches!(backend.init(), Err(BackendError::Config(_))));
    }

    #[test]
    fn init_creates_directory_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/defects");
        let mut backend = backend_at(&target);
        backend.config("create", true.into());
        backend.init().unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn init_rejects_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, b"x").unwrap();
        let mut backend = backend_at(&file);
        backend.config("create", true.into());
        assert!(backend.init().is_err());
    }

    #[test]
    fn use_before_init_is_config_error() {
        let backend = JsonDirBackend::new();
        let err = backend.load(&RecordKey::new("wafer", "3")).unwrap_err();
        assert!(matches!(err, BackendError::Config(_)));
    }

    #[test]
    fn roundtrip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = backend_at(dir.path());
        backend.init().unwrap();

        let key = RecordKey::new("wafer", "3");
        assert!(backend.load(&key).unwrap().is_none());

        let record = Record::new("wafer", 1);
        backend.save(&key, &record).unwrap();
        assert!(dir.path().join("wafer-3.json").is_file());
        assert_eq!(backend.load(&key).unwrap(), Some(record));
    }
}
