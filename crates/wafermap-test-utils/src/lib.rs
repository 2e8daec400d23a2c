//! Testing utilities for the wafermap workspace
//!
//! Backend fixtures, prepared trees and coordinate shorthands.

#![allow(missing_docs)]

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wafermap_backend::{open_backend, ConfigValue, MemoryBackend, SharedBackend};
use wafermap_resources::{Hicann, Wafer};
use wafermap_set::{FpgaGlobal, FpgaOnWafer, HicannGlobal, HicannOnWafer, WaferId};

/// A `jsondir` backend over a temporary directory, removed on drop
pub struct TempStore {
    pub dir: TempDir,
    pub backend: SharedBackend,
}

impl TempStore {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Fresh handle to the same directory, as a second process would open it
    pub fn reopen(&self) -> SharedBackend {
        jsondir_at(self.path())
    }

    pub fn files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn temp_store() -> TempStore {
    let dir = tempfile::tempdir().unwrap();
    let backend = jsondir_at(dir.path());
    TempStore { dir, backend }
}

pub fn jsondir_at(path: &Path) -> SharedBackend {
    open_backend(
        "jsondir",
        [("path", ConfigValue::from(path.to_string_lossy().into_owned()))],
    )
    .unwrap()
}

pub fn memory_backend() -> SharedBackend {
    Arc::new(MemoryBackend::new())
}

pub fn hicann(index: usize) -> HicannOnWafer {
    HicannOnWafer::new(index).unwrap()
}

pub fn fpga(index: usize) -> FpgaOnWafer {
    FpgaOnWafer::new(index).unwrap()
}

pub fn hicann_global(wafer: u32, index: usize) -> HicannGlobal {
    HicannGlobal::new(hicann(index), WaferId(wafer))
}

pub fn fpga_global(wafer: u32, index: usize) -> FpgaGlobal {
    FpgaGlobal::new(fpga(index), WaferId(wafer))
}

/// Chip with a few defects in old and new sets
pub fn defective_hicann() -> Hicann {
    let mut hicann = Hicann::new();
    hicann.neurons_mut().disable(17).unwrap();
    hicann.drivers_mut().disable(0).unwrap();
    hicann.synaptic_inputs_mut().disable(1023).unwrap();
    hicann.crossbarswitches_mut().disable(42).unwrap();
    hicann
}

/// Wafer with chip 3 absent, FPGA 1 absent and one defective chip cached
pub fn prepared_wafer() -> Wafer {
    let mut wafer = Wafer::new();
    wafer.hicanns_mut().disable(3).unwrap();
    wafer.fpgas_mut().disable(1).unwrap();
    wafer.inject_hicann(hicann(10), defective_hicann());
    wafer
}
