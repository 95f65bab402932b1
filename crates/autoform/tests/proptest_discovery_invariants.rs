//! Property-based invariant tests for field discovery.
//!
//! The hierarchy `Leaf -> Middle -> Root` registers a fixed set of fields;
//! which of them carry the exclusion marker, and how deep the chain goes, is
//! drawn per case.
//!
//! 1. `discover` returns exactly the non-excluded fields of the chain.
//! 2. Order is most-derived type first, registration order within a type.
//! 3. A `None` source yields nothing.
//! 4. A non-empty include list fixes both membership and order.
//! 5. Form rows mirror discovery one-to-one.

use std::any::Any;
use std::cell::Cell;
use std::sync::Arc;

use autoform::{
    Bindable, DelegateFactory, FieldProvider, FilteredFieldProvider, FormBuilder, GlobalRegistry,
    Schema, SchemaBuilder, SchemaFieldProvider, discover,
};
use autoform_reactive::Observable;
use proptest::prelude::*;

// ── Hierarchy with per-case shape ───────────────────────────────────────

thread_local! {
    static HIDDEN: Cell<u16> = const { Cell::new(0) };
    static DEPTH: Cell<u8> = const { Cell::new(3) };
}

const LEAF: [&str; 3] = ["leaf_a", "leaf_b", "leaf_c"];
const MIDDLE: [&str; 2] = ["mid_a", "mid_b"];
const ROOT: [&str; 3] = ["root_a", "root_b", "root_c"];

fn hidden(bit: usize) -> bool {
    HIDDEN.with(|h| h.get() & (1 << bit) != 0)
}

struct Root {
    cells: [Observable<i32>; 3],
}

struct Middle {
    root: Root,
    cells: [Observable<String>; 2],
}

struct Leaf {
    middle: Middle,
    cells: [Observable<bool>; 3],
}

impl Bindable for Root {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        for (i, name) in ROOT.iter().enumerate() {
            let spec = schema.field(*name, move |r: &Root| &r.cells[i]);
            if hidden(LEAF.len() + MIDDLE.len() + i) {
                spec.non_visual();
            }
        }
    }
}

impl Bindable for Middle {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        for (i, name) in MIDDLE.iter().enumerate() {
            let spec = schema.field(*name, move |m: &Middle| &m.cells[i]);
            if hidden(LEAF.len() + i) {
                spec.non_visual();
            }
        }
        if DEPTH.with(Cell::get) >= 3 {
            schema.extends(|m: &Middle| &m.root);
        }
    }
}

impl Bindable for Leaf {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        for (i, name) in LEAF.iter().enumerate() {
            let spec = schema.field(*name, move |l: &Leaf| &l.cells[i]);
            if hidden(i) {
                spec.non_visual();
            }
        }
        if DEPTH.with(Cell::get) >= 2 {
            schema.extends(|l: &Leaf| &l.middle);
        }
    }
}

fn leaf() -> Leaf {
    Leaf {
        middle: Middle {
            root: Root {
                cells: std::array::from_fn(|i| Observable::new(i as i32)),
            },
            cells: std::array::from_fn(|i| Observable::new(format!("m{i}"))),
        },
        cells: std::array::from_fn(|i| Observable::new(i % 2 == 0)),
    }
}

fn configure(mask: u16, depth: u8) {
    HIDDEN.with(|h| h.set(mask));
    DEPTH.with(|d| d.set(depth));
}

fn expected(mask: u16, depth: u8) -> Vec<&'static str> {
    let levels: [&[&'static str]; 3] = [&LEAF, &MIDDLE, &ROOT];
    let mut out = Vec::new();
    let mut bit = 0;
    for (level, names) in levels.iter().enumerate() {
        for name in names.iter() {
            if level < usize::from(depth) && mask & (1 << bit) == 0 {
                out.push(*name);
            }
            bit += 1;
        }
    }
    out
}

fn shape_strategy() -> impl Strategy<Value = (u16, u8)> {
    (0u16..256, 1u8..=3)
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Exactly the non-excluded fields, most-derived first
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn discover_returns_visible_fields_in_order((mask, depth) in shape_strategy()) {
        configure(mask, depth);
        let source = leaf();
        let names: Vec<_> = discover(Some(&source)).iter().map(|f| f.name()).collect();
        prop_assert_eq!(names, expected(mask, depth));
    }

    #[test]
    fn schema_keeps_excluded_fields((mask, depth) in shape_strategy()) {
        configure(mask, depth);
        let schema = Schema::of::<Leaf>();
        let sizes = [LEAF.len(), MIDDLE.len(), ROOT.len()];
        let total: usize = sizes[..usize::from(depth)].iter().sum();
        prop_assert_eq!(schema.fields().len(), total);
        prop_assert!(schema.errors().is_empty());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. None source
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn none_source_is_empty((mask, depth) in shape_strategy()) {
        configure(mask, depth);
        prop_assert!(discover::<Leaf>(None).is_empty());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Include list membership and order
// ═════════════════════════════════════════════════════════════════════════

fn all_names() -> Vec<&'static str> {
    LEAF.iter().chain(MIDDLE.iter()).chain(ROOT.iter()).copied().collect()
}

proptest! {
    #[test]
    fn include_list_fixes_order(
        (mask, depth) in shape_strategy(),
        picks in proptest::sample::subsequence(all_names(), 1..=8).prop_shuffle(),
    ) {
        configure(mask, depth);
        let source = leaf();
        let visible = expected(mask, depth);
        let provider = FilteredFieldProvider::new(SchemaFieldProvider).include(picks.clone());
        let names: Vec<_> = provider
            .provide(&Schema::of::<Leaf>(), Some(&source as &dyn Any))
            .iter()
            .map(|f| f.name())
            .collect();
        let want: Vec<_> = picks.into_iter().filter(|p| visible.contains(p)).collect();
        prop_assert_eq!(names, want);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Form rows mirror discovery
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn form_rows_mirror_discovery((mask, depth) in shape_strategy()) {
        configure(mask, depth);
        let source = leaf();
        let form = FormBuilder::new()
            .factory(
                DelegateFactory::builder()
                    .global_registry(Arc::new(GlobalRegistry::new()))
                    .build(),
            )
            .bind(&source)
            .expect("form");
        let rows: Vec<_> = form.rows().iter().map(|r| r.name()).collect();
        prop_assert_eq!(rows, expected(mask, depth));
    }
}
