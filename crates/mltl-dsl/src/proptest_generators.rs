//! Proptest strategies for generating well-formed `Formula` trees.

use proptest::prelude::*;

use crate::ast::{Formula, Interval};

/// Lowercase atom names drawn from a small pool so generated formulas share
/// variables often enough to interact.
pub fn arb_atom_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("a".to_string()),
        Just("b".to_string()),
        Just("c".to_string()),
        Just("p".to_string()),
        Just("q".to_string()),
        "[a-z][a-z0-9]{0,3}",
    ]
}

/// Strategy for a well-formed interval with `high <= max_high`.
pub fn arb_interval(max_high: u32) -> impl Strategy<Value = Interval> {
    (0..=max_high)
        .prop_flat_map(move |high| (0..=high, Just(high)))
        .prop_map(|(low, high)| Interval::new(low, high))
}

/// Strategy for a formula with small windows and bounded depth.
///
/// Windows are kept at `high <= 3` so the encoded size stays manageable for
/// solver round trips.
pub fn arb_formula() -> impl Strategy<Value = Formula> {
    let leaf = arb_atom_name().prop_map(Formula::Atom);
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|f| f.not()),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| l.and(r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| l.or(r)),
            (arb_interval(3), inner.clone())
                .prop_map(|(iv, f)| Formula::Eventually(iv, Box::new(f))),
            (arb_interval(3), inner.clone()).prop_map(|(iv, f)| Formula::Always(iv, Box::new(f))),
            (arb_interval(2), inner.clone(), inner.clone())
                .prop_map(|(iv, l, r)| Formula::Until(iv, Box::new(l), Box::new(r))),
            (arb_interval(2), inner.clone(), inner)
                .prop_map(|(iv, l, r)| Formula::Release(iv, Box::new(l), Box::new(r))),
        ]
    })
}
