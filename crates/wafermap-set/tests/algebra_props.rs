//! Set-algebra identities over effective subsets

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeSet;
use wafermap_set::{Domain, ResourceSet};

const SIZE: usize = 64;

fn domain() -> Domain {
    Domain::new("prop_domain", SIZE)
}

/// `None` stands for an untouched, uninitialized set
fn arb_set() -> impl Strategy<Value = ResourceSet> {
    proptest::option::of(proptest::collection::btree_set(0..SIZE, 0..SIZE)).prop_map(|disabled| {
        match disabled {
            Some(d) => ResourceSet::from_disabled(domain(), d).unwrap(),
            None => ResourceSet::new(domain()),
        }
    })
}

fn effective(set: &ResourceSet) -> BTreeSet<usize> {
    set.iter_available().collect()
}

fn combine(a: &ResourceSet, b: &ResourceSet, op: fn(&mut ResourceSet, &ResourceSet)) -> ResourceSet {
    let mut out = a.clone();
    op(&mut out, b);
    out
}

#[test]
fn difference_and_merge_on_neuron_sized_domain() {
    let domain = Domain::new("neurons", 512);
    let mut a = ResourceSet::new(domain.clone());
    a.disable(100).unwrap();
    assert_eq!(a.available(), 511);

    let mut b = ResourceSet::new(domain.clone());
    b.difference(&a).unwrap();
    assert_eq!(b.iter_available().collect::<Vec<_>>(), vec![100]);

    let mut c = ResourceSet::new(domain);
    c.merge(&a).unwrap();
    assert_eq!(c.available(), 512);
    assert_eq!(c.iter_disabled().collect::<Vec<_>>(), Vec::<usize>::new());
}

proptest! {
    #[test]
    fn prop_operations_match_btree_algebra(a in arb_set(), b in arb_set()) {
        let (ea, eb) = (effective(&a), effective(&b));

        let union = combine(&a, &b, |x, y| x.merge(y).unwrap());
        prop_assert_eq!(effective(&union), ea.union(&eb).copied().collect::<BTreeSet<_>>());

        let inter = combine(&a, &b, |x, y| x.intersection(y).unwrap());
        prop_assert_eq!(effective(&inter), ea.intersection(&eb).copied().collect::<BTreeSet<_>>());

        let diff = combine(&a, &b, |x, y| x.difference(y).unwrap());
        prop_assert_eq!(effective(&diff), ea.difference(&eb).copied().collect::<BTreeSet<_>>());

        let sym = combine(&a, &b, |x, y| x.symmetric_difference(y).unwrap());
        prop_assert_eq!(
            effective(&sym),
            ea.symmetric_difference(&eb).copied().collect::<BTreeSet<_>>()
        );

        for result in [&union, &inter, &diff, &sym] {
            prop_assert!(result.has_value());
        }
    }

    #[test]
    fn prop_symmetric_difference_is_union_of_differences(a in arb_set(), b in arb_set()) {
        let sym = combine(&a, &b, |x, y| x.symmetric_difference(y).unwrap());
        let mut expected = combine(&a, &b, |x, y| x.difference(y).unwrap());
        let ba = combine(&b, &a, |x, y| x.difference(y).unwrap());
        expected.merge(&ba).unwrap();
        prop_assert_eq!(effective(&sym), effective(&expected));
    }

    #[test]
    fn prop_intersection_is_subset_of_both(a in arb_set(), b in arb_set()) {
        let inter = effective(&combine(&a, &b, |x, y| x.intersection(y).unwrap()));
        prop_assert!(inter.is_subset(&effective(&a)));
        prop_assert!(inter.is_subset(&effective(&b)));
    }

    #[test]
    fn prop_available_matches_iteration(a in arb_set()) {
        prop_assert_eq!(a.available(), a.iter_available().count());
        prop_assert_eq!(a.available() + a.iter_disabled().count(), SIZE);
    }

    #[test]
    fn prop_clone_never_aliases(a in arb_set(), idx in 0..SIZE) {
        let original = a.clone();
        let mut copy = a.clone();
        if copy.has(idx).unwrap() {
            copy.disable(idx).unwrap();
        } else {
            copy.enable(idx).unwrap();
        }
        prop_assert_eq!(&a, &original);
        prop_assert_ne!(copy.has(idx).unwrap(), a.has(idx).unwrap());
    }
}
