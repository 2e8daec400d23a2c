//! Set algebra lifted to trees

use proptest::prelude::*;
use wafermap_backend::{Backend, Record};
use wafermap_resources::{Entity, Hicann, ResourceError, Wafer, WaferWithBackend, WithBackend};
use wafermap_set::{SetOp, SwitchMode, WaferId};
use wafermap_test_utils::{hicann, memory_backend, prepared_wafer, temp_store};

fn hicann_with(disabled_neurons: &[usize]) -> Hicann {
    let mut h = Hicann::new();
    h.neurons_mut().enable_all();
    for &n in disabled_neurons {
        h.neurons_mut().disable(n).unwrap();
    }
    h
}

#[test]
fn other_side_children_load_from_its_backend() {
    let inputs = temp_store();
    let mut input = WaferWithBackend::open(inputs.backend.clone(), WaferId(1), true).unwrap();
    input.inject_hicann(hicann(4), hicann_with(&[7]));
    input.save().unwrap();

    let mut output = WaferWithBackend::open(memory_backend(), WaferId(1), true).unwrap();
    output.get_hicann(hicann(4)).unwrap();

    // the input side has no cached children after reopening
    let reopened = WaferWithBackend::open(inputs.reopen(), WaferId(1), false).unwrap();
    output.intersection(&reopened).unwrap();
    assert!(!output
        .cached_hicann(hicann(4))
        .unwrap()
        .neurons()
        .has(7)
        .unwrap());
}

#[test]
fn failed_child_load_leaves_receiver_unchanged() {
    let empty = temp_store();
    let strict_other = {
        let backend = empty.backend.clone();
        backend
            .save(
                &Wafer::record_key(WaferId(3)),
                &Record::new("wafer", 1),
            )
            .unwrap();
        WaferWithBackend::open(backend, WaferId(3), false).unwrap()
    };

    let mut mine = WithBackend::wrap(prepared_wafer(), memory_backend(), WaferId(3));
    let before = (*mine).clone();
    let err = mine.merge(&strict_other).unwrap_err();
    assert!(matches!(err, ResourceError::NotFound(_)));
    assert_eq!(*mine, before);
}

#[test]
fn unbound_wafers_combine_freely() {
    let mut a = prepared_wafer();
    let b = Wafer::new();
    a.merge(&b).unwrap();
    assert!(a.has_hicann(hicann(3)));
    assert_eq!(a.cached_hicann(hicann(10)).unwrap().neurons().available(), 512);
}

proptest! {
    #[test]
    fn hicann_symdiff_is_union_of_differences(
        xs in proptest::collection::btree_set(0usize..512, 0..20),
        ys in proptest::collection::btree_set(0usize..512, 0..20),
    ) {
        let a = hicann_with(&xs.iter().copied().collect::<Vec<_>>());
        let b = hicann_with(&ys.iter().copied().collect::<Vec<_>>());

        let mut sym = a.clone();
        sym.symmetric_difference(&b).unwrap();

        let mut left = a.clone();
        left.difference(&b).unwrap();
        let mut right = b.clone();
        right.difference(&a).unwrap();
        left.merge(&right).unwrap();

        prop_assert_eq!(sym.neurons(), left.neurons());
    }

    #[test]
    fn wafer_intersection_is_contained_in_both(
        xs in proptest::collection::btree_set(0usize..384, 0..30),
        ys in proptest::collection::btree_set(0usize..384, 0..30),
    ) {
        let mut a = Wafer::new();
        let mut b = Wafer::new();
        for &x in &xs {
            a.hicanns_mut().disable_with(x, SwitchMode::NonThrow).unwrap();
        }
        for &y in &ys {
            b.hicanns_mut().disable_with(y, SwitchMode::NonThrow).unwrap();
        }

        let mut cut = a.clone();
        cut.combine(&b, SetOp::Intersection).unwrap();
        for i in cut.hicanns().iter_available() {
            prop_assert!(a.hicanns().has(i).unwrap());
            prop_assert!(b.hicanns().has(i).unwrap());
        }
    }
}
