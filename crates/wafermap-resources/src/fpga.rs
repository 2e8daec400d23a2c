//! FPGA entity

use crate::entity::{Entity, UnknownSets, WithBackend};
use crate::error::{ResourceError, ResourceResult};
use wafermap_backend::{Record, RecordKey};
use wafermap_set::{Coordinate, FpgaGlobal, HighspeedLinkOnDnc, ResourceSet, SetOp};

named_sets! {
    /// Defect state of one link aggregator
    Fpga {
        kind: "fpga",
        schema: 1,
        id: FpgaGlobal,
        key: |id| format!("{}-{}", id.wafer.0, id.fpga.index()),
    }
    /// Highspeed links to the chips served by this FPGA
    hslinks / hslinks_mut: HighspeedLinkOnDnc = "hslinks" @ 0,
}

/// FPGA bound to its own record
pub type FpgaWithBackend = WithBackend<Fpga>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wafermap_backend::{MemoryBackend, SharedBackend};
    use wafermap_set::{FpgaOnWafer, HicannGlobal, HicannOnWafer, WaferId};

    #[test]
    fn record_key() {
        let id = FpgaGlobal::new(FpgaOnWafer::new(2).unwrap(), WaferId(5));
        assert_eq!(Fpga::record_key(id).to_string(), "fpga-5-2");
    }

    #[test]
    fn hslink_of_chip_is_tracked_on_its_fpga() {
        let hicann = HicannGlobal::new(HicannOnWafer::new(19).unwrap(), WaferId(5));
        let backend: SharedBackend = Arc::new(MemoryBackend::new());

        let mut fpga = FpgaWithBackend::open(backend.clone(), hicann.to_fpga_global(), true).unwrap();
        fpga.hslinks_mut()
            .disable(hicann.to_highspeed_link().index())
            .unwrap();
        fpga.save().unwrap();

        let reloaded = FpgaWithBackend::open(backend, hicann.to_fpga_global(), false).unwrap();
        assert_eq!(reloaded.id().fpga.index(), 2);
        assert!(!reloaded
            .hslinks()
            .has_coord(hicann.to_highspeed_link())
            .unwrap());
        assert_eq!(reloaded.hslinks().available(), 7);
    }

    #[test]
    fn bound_algebra_requires_same_coordinate() {
        let backend: SharedBackend = Arc::new(MemoryBackend::new());
        let a = FpgaGlobal::new(FpgaOnWafer::new(0).unwrap(), WaferId(1));
        let b = FpgaGlobal::new(FpgaOnWafer::new(1).unwrap(), WaferId(1));
        let mut left = FpgaWithBackend::open(backend.clone(), a, true).unwrap();
        let right = FpgaWithBackend::open(backend, b, true).unwrap();
        assert!(matches!(
            left.intersection(&right),
            Err(ResourceError::DomainMismatch { .. })
        ));
        assert!(!left.hslinks().has_value());
    }

    #[test]
    fn symmetric_difference_of_fresh_is_empty() {
        let mut a = Fpga::new();
        a.symmetric_difference(&Fpga::new()).unwrap();
        assert!(a.hslinks().has_value());
        assert_eq!(a.hslinks().available(), 0);
    }
}
