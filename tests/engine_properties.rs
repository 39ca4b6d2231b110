//! Property tests for the filter engine.
//!
//! Arbitrary catalogs, record sets, and mutation sequences; every property
//! is checked through the public API. The scan/indexed equivalence property
//! is the proof obligation for the inverted-index strategy.

use facet_engine::{
    CountStrategy, DatasetDescriptor, EngineConfig, FacetId, FacetSpec, FilterEngine, Mask,
    RecordSpec, loader,
};
use proptest::prelude::*;
use proptest::sample::Index;

// ============================================================================
// Strategies
// ============================================================================

fn dataset_strategy() -> impl Strategy<Value = DatasetDescriptor> {
    prop::collection::vec(1usize..=5, 1..=4)
        .prop_flat_map(|counts| {
            let width = counts.len();
            let rows = prop::collection::vec(
                prop::collection::vec(any::<Index>(), width),
                0..30,
            );
            (Just(counts), rows)
        })
        .prop_map(|(counts, rows)| {
            let facets = counts
                .iter()
                .enumerate()
                .map(|(i, &n)| {
                    FacetSpec::new(format!("f{i}"), (0..n).map(|j| format!("v{j}")))
                })
                .collect();
            let records = rows
                .into_iter()
                .map(|row| {
                    RecordSpec(
                        row.into_iter()
                            .zip(&counts)
                            .map(|(pick, &n)| 1u32 << pick.index(n))
                            .collect(),
                    )
                })
                .collect();
            DatasetDescriptor::new(facets, records)
        })
}

#[derive(Debug, Clone)]
enum Op {
    Toggle(Index, Index),
    SelectAll(Index),
    Clear(Index),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<Index>(), any::<Index>()).prop_map(|(f, v)| Op::Toggle(f, v)),
        any::<Index>().prop_map(Op::SelectAll),
        any::<Index>().prop_map(Op::Clear),
    ]
}

fn pick_facet(engine: &FilterEngine, f: &Index) -> FacetId {
    FacetId(f.index(engine.catalog().len()) as u16)
}

fn pick_bit(engine: &FilterEngine, facet: FacetId, v: &Index) -> Mask {
    let def = engine.catalog().facet(facet);
    def.value_bit(v.index(def.value_count())).unwrap()
}

fn apply(engine: &mut FilterEngine, op: &Op) {
    match op {
        Op::Toggle(f, v) => {
            let facet = pick_facet(engine, f);
            let bit = pick_bit(engine, facet, v);
            engine.toggle(facet, bit).unwrap();
        }
        Op::SelectAll(f) => {
            let facet = pick_facet(engine, f);
            engine.select_all(facet);
        }
        Op::Clear(f) => {
            let facet = pick_facet(engine, f);
            engine.clear(facet);
        }
    }
}

fn engine_with(descriptor: &DatasetDescriptor, strategy: CountStrategy) -> FilterEngine {
    let loaded = loader::load(descriptor).unwrap();
    FilterEngine::with_config(
        loaded.catalog,
        loaded.records,
        EngineConfig { strategy, ..EngineConfig::default() },
    )
    .unwrap()
}

/// All (facet, value-count) pairs, collected so the engine can be mutated
/// between reads.
fn facet_shapes(engine: &FilterEngine) -> Vec<(FacetId, usize)> {
    engine.catalog().facets().map(|(id, def)| (id, def.value_count())).collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Scan and indexed counting agree exactly on every query after any
    /// mutation sequence.
    #[test]
    fn scan_and_indexed_agree(
        descriptor in dataset_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..20),
    ) {
        let mut scan = engine_with(&descriptor, CountStrategy::Scan);
        let mut indexed = engine_with(&descriptor, CountStrategy::Indexed);

        for op in &ops {
            apply(&mut scan, op);
            apply(&mut indexed, op);
        }

        prop_assert_eq!(scan.match_count(), indexed.match_count());
        for (facet, values) in facet_shapes(&scan) {
            for position in 0..values {
                let bit = scan.catalog().facet(facet).value_bit(position).unwrap();
                prop_assert_eq!(
                    scan.count_if_added(facet, bit).unwrap(),
                    indexed.count_if_added(facet, bit).unwrap()
                );
                prop_assert_eq!(
                    scan.count_selected(facet, bit).unwrap(),
                    indexed.count_selected(facet, bit).unwrap()
                );
            }
        }
        prop_assert_eq!(scan.snapshot(), indexed.snapshot());
    }

    /// Replaying the same mutation sequence from the same initial state
    /// always yields the same table.
    #[test]
    fn replay_is_deterministic(
        descriptor in dataset_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..20),
    ) {
        let mut first = engine_with(&descriptor, CountStrategy::Indexed);
        let mut second = engine_with(&descriptor, CountStrategy::Indexed);
        for op in &ops {
            apply(&mut first, op);
        }
        for op in &ops {
            apply(&mut second, op);
        }
        prop_assert_eq!(first.snapshot(), second.snapshot());
    }

    /// toggle(f,v); toggle(f,v) restores both the mask and the whole table.
    #[test]
    fn toggle_involution(
        descriptor in dataset_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..12),
        f in any::<Index>(),
        v in any::<Index>(),
    ) {
        let mut engine = engine_with(&descriptor, CountStrategy::Indexed);
        for op in &ops {
            apply(&mut engine, op);
        }

        let facet = pick_facet(&engine, &f);
        let bit = pick_bit(&engine, facet, &v);
        let mask_before = engine.selection(facet);
        let table_before = engine.snapshot();

        engine.toggle(facet, bit).unwrap();
        engine.toggle(facet, bit).unwrap();

        prop_assert_eq!(engine.selection(facet), mask_before);
        prop_assert_eq!(engine.snapshot(), table_before);
    }

    /// select_all then clear empties the mask, and a full mask matches the
    /// same records as an empty one (both unconstrained).
    #[test]
    fn select_all_clear_duality(
        descriptor in dataset_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..12),
        f in any::<Index>(),
    ) {
        let mut engine = engine_with(&descriptor, CountStrategy::Indexed);
        for op in &ops {
            apply(&mut engine, op);
        }

        let facet = pick_facet(&engine, &f);
        engine.select_all(facet);
        let mut full = engine.clone();
        engine.clear(facet);

        prop_assert!(engine.selection(facet).is_empty());
        prop_assert!(engine.cleared(facet));
        prop_assert_eq!(engine.match_count(), full.match_count());
        for record in full.records() {
            prop_assert_eq!(engine.is_match(record), full.is_match(record));
        }

        // distinct observable states, identical matching
        prop_assert!(full.all_selected(facet));
        full.clear(facet);
        prop_assert_eq!(engine.snapshot(), full.snapshot());
    }

    /// count_if_added never mutates: the table is bit-for-bit unchanged and
    /// repeated calls return the same value.
    #[test]
    fn preview_never_mutates(
        descriptor in dataset_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..12),
        f in any::<Index>(),
        v in any::<Index>(),
    ) {
        let mut engine = engine_with(&descriptor, CountStrategy::Indexed);
        for op in &ops {
            apply(&mut engine, op);
        }

        let facet = pick_facet(&engine, &f);
        let bit = pick_bit(&engine, facet, &v);
        let table_before = engine.snapshot();

        let first = engine.count_if_added(facet, bit).unwrap();
        let second = engine.count_if_added(facet, bit).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(engine.snapshot(), table_before);
    }

    /// Tightening a cleared facet down to one value can only narrow or
    /// preserve matches: the overall match count and every other facet's
    /// preview counts never grow, and previews within the tightened facet
    /// are independent of its own mask.
    #[test]
    fn tightening_never_widens(
        descriptor in dataset_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..12),
        f in any::<Index>(),
        v in any::<Index>(),
    ) {
        let mut engine = engine_with(&descriptor, CountStrategy::Indexed);
        for op in &ops {
            apply(&mut engine, op);
        }

        let facet = pick_facet(&engine, &f);
        let bit = pick_bit(&engine, facet, &v);
        engine.clear(facet);

        let shapes = facet_shapes(&engine);
        let match_before = engine.match_count();
        let mut previews_before = Vec::new();
        for &(g, values) in &shapes {
            for position in 0..values {
                let b = engine.catalog().facet(g).value_bit(position).unwrap();
                previews_before.push((g, b, engine.count_if_added(g, b).unwrap()));
            }
        }

        engine.toggle(facet, bit).unwrap();

        prop_assert!(engine.match_count() <= match_before);
        for (g, b, before) in previews_before {
            let after = engine.count_if_added(g, b).unwrap();
            if g == facet {
                // the previewed facet is checked by equality, so its own
                // mask never influences its previews
                prop_assert_eq!(after, before);
            } else {
                prop_assert!(after <= before);
            }
        }
    }

    /// Toggles on two different facets commute.
    #[test]
    fn independent_toggles_commute(
        descriptor in dataset_strategy(),
        fa in any::<Index>(),
        va in any::<Index>(),
        fb in any::<Index>(),
        vb in any::<Index>(),
    ) {
        let engine = engine_with(&descriptor, CountStrategy::Indexed);
        let facet_count = engine.catalog().len();
        prop_assume!(facet_count >= 2);

        let a = FacetId(fa.index(facet_count) as u16);
        let b = FacetId(((a.0 as usize + 1 + fb.index(facet_count - 1)) % facet_count) as u16);
        let x = pick_bit(&engine, a, &va);
        let y = pick_bit(&engine, b, &vb);

        let mut forward = engine.clone();
        forward.toggle(a, x).unwrap();
        forward.toggle(b, y).unwrap();

        let mut reverse = engine;
        reverse.toggle(b, y).unwrap();
        reverse.toggle(a, x).unwrap();

        prop_assert_eq!(forward.snapshot(), reverse.snapshot());
        prop_assert_eq!(forward.match_count(), reverse.match_count());
    }
}
