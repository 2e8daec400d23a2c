//! Behaviour shared by every built-in adapter

use pretty_assertions::assert_eq;
use wafermap_backend::{
    Backend, BackendError, BackendRegistry, ConfigValue, MemoryBackend, Record, RecordKey, SharedBackend,
};
use wafermap_set::{Coordinate, NeuronOnHicann, ResourceSet};

fn adapters(dir: &tempfile::TempDir) -> Vec<SharedBackend> {
    let registry = BackendRegistry::with_defaults();
    let path = dir.path().to_string_lossy().into_owned();
    vec![
        registry
            .open("memory", Vec::<(String, ConfigValue)>::new())
            .unwrap(),
        registry
            .open("jsondir", [("path", ConfigValue::from(path))])
            .unwrap(),
    ]
}

fn sample_record() -> Record {
    let mut neurons = ResourceSet::of::<NeuronOnHicann>();
    neurons.disable(3).unwrap();
    neurons.disable(400).unwrap();
    let mut record = Record::new("hicann", 2);
    record.put("neurons", &neurons);
    record
}

#[test]
fn missing_key_loads_none() {
    let dir = tempfile::tempdir().unwrap();
    for backend in adapters(&dir) {
        let loaded = backend.load(&RecordKey::new("hicann", "1-2")).unwrap();
        assert!(loaded.is_none(), "{}", backend.kind());
    }
}

#[test]
fn save_then_load_returns_equal_record() {
    let dir = tempfile::tempdir().unwrap();
    let key = RecordKey::new("hicann", "1-2");
    for backend in adapters(&dir) {
        backend.save(&key, &sample_record()).unwrap();
        assert_eq!(backend.load(&key).unwrap(), Some(sample_record()));
    }
}

#[test]
fn save_overwrites_previous_record() {
    let dir = tempfile::tempdir().unwrap();
    let key = RecordKey::new("wafer", "5");
    for backend in adapters(&dir) {
        backend.save(&key, &sample_record()).unwrap();
        backend.save(&key, &Record::new("wafer", 1)).unwrap();
        let loaded = backend.load(&key).unwrap().unwrap();
        assert_eq!(loaded.kind, "wafer");
        assert!(loaded.sets.is_empty());
    }
}

#[test]
fn legacy_text_decodes_with_defaults() {
    let backend = MemoryBackend::new();
    backend.insert_raw(
        &RecordKey::new("hicann", "0-0"),
        r#"{"kind":"hicann","sets":{"neurons":{"size":512}}}"#,
    );
    let record = backend
        .load(&RecordKey::new("hicann", "0-0"))
        .unwrap()
        .unwrap();
    assert_eq!(record.schema_version, 0);
    let neurons = record.take("neurons", &NeuronOnHicann::DOMAIN).unwrap();
    assert!(neurons.has_value());
    assert_eq!(neurons.available(), 512);
}

#[test]
fn garbage_text_is_codec_error() {
    let backend = MemoryBackend::new();
    let key = RecordKey::new("wafer", "9");
    backend.insert_raw(&key, "not json");
    let err = backend.load(&key).unwrap_err();
    assert!(matches!(err, BackendError::Codec { .. }));
}

#[test]
fn jsondir_files_are_readable_json() {
    let dir = tempfile::tempdir().unwrap();
    let backend = &adapters(&dir)[1];
    backend
        .save(&RecordKey::new("hicann", "1-2"), &sample_record())
        .unwrap();
    let text = std::fs::read_to_string(dir.path().join("hicann-1-2.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["sets"]["neurons"]["disabled"], serde_json::json!([3, 400]));
    assert_eq!(value["schema_version"], 2);
}
