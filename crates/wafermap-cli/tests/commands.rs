//! End-to-end runs of the command line tools against temporary stores

use clap::Parser;
use pretty_assertions::assert_eq;
use std::path::Path;
use wafermap_backend::{Backend, RecordKey};
use wafermap_cli::{run, Cli, Verdict};
use wafermap_resources::{FpgaWithBackend, HicannWithBackend, WaferWithBackend};
use wafermap_set::WaferId;
use wafermap_test_utils::{fpga_global, hicann_global, jsondir_at};

fn invoke(args: &[&str]) -> (anyhow::Result<Verdict>, String) {
    let cli = Cli::try_parse_from(std::iter::once("wafermap").chain(args.iter().copied())).unwrap();
    let mut out = Vec::new();
    let verdict = run(&cli, &mut out);
    (verdict, String::from_utf8(out).unwrap())
}

fn path(dir: &Path) -> &str {
    dir.to_str().unwrap()
}

#[test]
fn disable_then_has() {
    let dir = tempfile::tempdir().unwrap();
    let store = path(dir.path());

    let (verdict, _) = invoke(&["disable", store, "W33H0", "drivers", "3", "3"]);
    assert_eq!(verdict.unwrap(), Verdict::Pass);

    let (verdict, out) = invoke(&["has", store, "W33H0", "drivers", "2", "3"]);
    assert_eq!(verdict.unwrap(), Verdict::Fail);
    assert_eq!(out, "true\nfalse\n");

    let hicann = HicannWithBackend::open(jsondir_at(dir.path()), hicann_global(33, 0), false).unwrap();
    assert_eq!(hicann.drivers().available(), 223);
}

#[test]
fn has_on_missing_record_reports_available() {
    let dir = tempfile::tempdir().unwrap();
    let (verdict, out) = invoke(&["has", path(dir.path()), "W5F2", "hslinks", "0", "7"]);
    assert_eq!(verdict.unwrap(), Verdict::Pass);
    assert_eq!(out, "true\ntrue\n");
}

#[test]
fn unknown_component_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let (verdict, _) = invoke(&["enable", path(dir.path()), "W1", "neurons", "0"]);
    let message = format!("{:#}", verdict.unwrap_err());
    assert!(message.contains("hicanns, fpgas"), "{message}");
}

#[test]
fn out_of_range_index_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let (verdict, _) = invoke(&["has", path(dir.path()), "W1", "fpgas", "48"]);
    assert!(verdict.is_err());
}

#[test]
fn init_writes_uninitialized_records() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("fresh");
    let (verdict, out) = invoke(&["init", "W3", "W3H7", "W3F0", "-o", path(&target)]);
    assert_eq!(verdict.unwrap(), Verdict::Pass);
    assert_eq!(out.lines().count(), 3);

    let backend = jsondir_at(&target);
    let wafer = WaferWithBackend::open(backend.clone(), WaferId(3), false).unwrap();
    assert!(!wafer.hicanns().has_value());
    let hicann = HicannWithBackend::open(backend.clone(), hicann_global(3, 7), false).unwrap();
    assert!(!hicann.neurons().has_value());
    assert!(FpgaWithBackend::open(backend, fpga_global(3, 0), false).is_ok());
}

#[test]
fn set_op_intersects_inputs_into_output() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    let out = dir.path().join("out");
    for input in [&a, &b] {
        invoke(&["init", "W3H7", "-o", path(input)]).0.unwrap();
    }
    invoke(&["disable", path(&a), "W3H7", "neurons", "1"]).0.unwrap();
    invoke(&["disable", path(&b), "W3H7", "neurons", "2"]).0.unwrap();

    let (verdict, _) = invoke(&["set-op", "W3H7", "-o", path(&out), "-i", path(&a), path(&b)]);
    assert_eq!(verdict.unwrap(), Verdict::Pass);

    let merged = HicannWithBackend::open(jsondir_at(&out), hicann_global(3, 7), false).unwrap();
    assert_eq!(merged.neurons().iter_disabled().collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn set_op_requires_input_records() {
    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("empty");
    std::fs::create_dir(&empty).unwrap();
    let (verdict, _) = invoke(&[
        "set-op",
        "W3",
        "-o",
        path(&dir.path().join("out")),
        "-i",
        path(&empty),
    ]);
    assert!(verdict.is_err());
}

#[test]
fn chip_predicates() {
    let dir = tempfile::tempdir().unwrap();
    let store = path(dir.path());
    invoke(&["disable", store, "W4", "hicanns", "9"]).0.unwrap();
    // chip 12 sits on fpga 1 behind link 4
    invoke(&["disable", store, "W4F1", "hslinks", "4"]).0.unwrap();

    let check = |cmd: &str, hicann: &str| {
        invoke(&[cmd, "--wafer", "4", "--hicann", hicann, "--defects-path", store])
            .0
            .unwrap()
    };
    assert_eq!(check("wafer-has-hicann", "9"), Verdict::Fail);
    assert_eq!(check("wafer-has-hicann", "10"), Verdict::Pass);
    assert_eq!(check("hicann-has-highspeed", "12"), Verdict::Fail);
    assert_eq!(check("hicann-has-highspeed", "13"), Verdict::Pass);
}

#[test]
fn memory_backend_is_selectable() {
    let (verdict, out) = invoke(&["--backend", "memory", "has", "unused", "W1", "hicanns", "0"]);
    assert_eq!(verdict.unwrap(), Verdict::Pass);
    assert_eq!(out, "true\n");
}

#[test]
fn unknown_backend_is_an_error() {
    let (verdict, _) = invoke(&["--backend", "xml", "has", ".", "W1", "hicanns", "0"]);
    assert!(format!("{:#}", verdict.unwrap_err()).contains("unsupported backend"));
}

#[test]
fn enable_keeps_sets_written_by_newer_schema() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("wafer-6.json"),
        r#"{"kind":"wafer","schema_version":4,
            "sets":{"hicanns":{"size":384,"disabled":[0,1]},
                    "reticles":{"size":48,"disabled":[5]}}}"#,
    )
    .unwrap();

    let (verdict, _) = invoke(&["enable", path(dir.path()), "W6", "hicanns", "1"]);
    assert_eq!(verdict.unwrap(), Verdict::Pass);

    let record = jsondir_at(dir.path())
        .load(&RecordKey::new("wafer", "6"))
        .unwrap()
        .unwrap();
    assert_eq!(record.schema_version, 4);
    assert_eq!(record.sets["reticles"].disabled, vec![5]);
    assert_eq!(record.sets["hicanns"].disabled, vec![0]);
}

#[test]
fn legacy_defects_path_flag_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let store = path(dir.path());
    invoke(&["disable", store, "W8", "hicanns", "2"]).0.unwrap();
    let (verdict, _) = invoke(&[
        "wafer-has-hicann",
        "--wafer",
        "8",
        "--hicann",
        "2",
        "--defects_path",
        store,
    ]);
    assert_eq!(verdict.unwrap(), Verdict::Fail);
}
