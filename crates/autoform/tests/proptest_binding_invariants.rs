//! Property-based invariant tests for two-way binding.
//!
//! Every case binds a fresh `Sample` through the default factory and drives
//! the generated controls and the source cells with drawn input.
//!
//! 1. Text typed into a text field lands in the source verbatim, and text
//!    set on the source shows in the field verbatim.
//! 2. Arbitrary input into an integer field never panics; afterwards the
//!    source holds either the parsed value or its previous value, and a
//!    rejected edit leaves the field showing the source.
//! 3. Range constraints accept exactly the in-range parses.
//! 4. Any finite double set on the source is shown as text that parses back
//!    to the same number.
//! 5. Under any sequence of choice-box and source operations, the selection
//!    and the source agree after every step.
//! 6. After disposal no write crosses the binding in either direction.

use std::sync::Arc;

use autoform::{
    Bindable, DelegateFactory, EnumConstant, Form, FormBuilder, FormEnum, GlobalRegistry,
    LocaleFormat, Number, NumberFormat, NumericKind, SchemaBuilder,
};
use autoform_reactive::Observable;
use autoform_widgets::{ChoiceBox, TextField};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Low,
    Mid,
    High,
}

impl FormEnum for Level {
    fn constants() -> &'static [Self] {
        &[Self::Low, Self::Mid, Self::High]
    }

    fn name(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Mid => "MID",
            Self::High => "HIGH",
        }
    }
}

struct Sample {
    note: Observable<String>,
    count: Observable<i32>,
    percent: Observable<i32>,
    ratio: Observable<f64>,
    level: Observable<Option<Level>>,
}

impl Bindable for Sample {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema.field("note", |s: &Sample| &s.note);
        schema.field("count", |s: &Sample| &s.count);
        schema.field("percent", |s: &Sample| &s.percent).range(0.0, 100.0);
        schema.field("ratio", |s: &Sample| &s.ratio);
        schema.field("level", |s: &Sample| &s.level);
    }
}

fn sample() -> Sample {
    Sample {
        note: Observable::new(String::new()),
        count: Observable::new(7),
        percent: Observable::new(50),
        ratio: Observable::new(0.0),
        level: Observable::new(None),
    }
}

fn bind(source: &Sample) -> Form {
    FormBuilder::new()
        .factory(
            DelegateFactory::builder()
                .global_registry(Arc::new(GlobalRegistry::new()))
                .build(),
        )
        .bind(source)
        .expect("form")
}

fn text_field(form: &Form, name: &str) -> TextField {
    form.row(name)
        .and_then(|r| r.editor().as_text_field().cloned())
        .expect("text field")
}

fn level_box(form: &Form) -> ChoiceBox<EnumConstant> {
    form.row("level")
        .and_then(|r| r.editor().as_choice_box::<EnumConstant>().cloned())
        .expect("choice box")
}

// ── Strategies ──────────────────────────────────────────────────────────

fn numeric_text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<i32>().prop_map(|v| v.to_string()),
        any::<i64>().prop_map(|v| v.to_string()),
        (-200i32..300).prop_map(|v| format!(" {v} ")),
        "[-+0-9a-z. ]{0,12}",
        any::<String>(),
    ]
}

fn finite_f64() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |v| v.is_finite())
}

#[derive(Debug, Clone)]
enum LevelOp {
    Choose(usize),
    Clear,
    External(Option<usize>),
}

fn level_ops_strategy() -> impl Strategy<Value = Vec<LevelOp>> {
    proptest::collection::vec(
        prop_oneof![
            (0usize..4).prop_map(LevelOp::Choose),
            Just(LevelOp::Clear),
            proptest::option::of(0usize..3).prop_map(LevelOp::External),
        ],
        0..32,
    )
}

#[derive(Debug, Clone)]
enum Write {
    Field(String),
    Source(String),
}

fn writes_strategy() -> impl Strategy<Value = Vec<Write>> {
    proptest::collection::vec(
        prop_oneof![
            "[a-z]{0,6}".prop_map(Write::Field),
            "[A-Z]{0,6}".prop_map(Write::Source),
        ],
        1..16,
    )
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Text round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn text_round_trips(typed in any::<String>(), external in any::<String>()) {
        let source = sample();
        let form = bind(&source);
        let note = text_field(&form, "note");

        note.type_text(typed.clone());
        prop_assert_eq!(source.note.get(), typed);

        source.note.set(external.clone());
        prop_assert_eq!(note.text(), external);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2-3. Integer input is parsed or rejected, never half-applied
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn integer_input_is_parsed_or_reverted(input in numeric_text_strategy()) {
        let source = sample();
        let form = bind(&source);
        let count = text_field(&form, "count");

        count.type_text(input.clone());
        match input.trim().parse::<i32>() {
            Ok(parsed) => prop_assert_eq!(source.count.get(), parsed),
            Err(_) => {
                prop_assert_eq!(source.count.get(), 7);
                prop_assert_eq!(count.text(), "7");
            }
        }
    }

    #[test]
    fn range_accepts_exactly_in_range(input in numeric_text_strategy()) {
        let source = sample();
        let form = bind(&source);
        let percent = text_field(&form, "percent");

        percent.type_text(input.clone());
        match input.trim().parse::<i32>() {
            Ok(parsed) if (0..=100).contains(&parsed) => {
                prop_assert_eq!(source.percent.get(), parsed);
            }
            _ => {
                prop_assert_eq!(source.percent.get(), 50);
                prop_assert_eq!(percent.text(), "50");
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Doubles survive display
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn external_double_displays_losslessly(value in finite_f64()) {
        let source = sample();
        let form = bind(&source);
        let ratio = text_field(&form, "ratio");

        source.ratio.set(value);
        let shown = LocaleFormat::default().parse(NumericKind::Double, &ratio.text());
        prop_assert_eq!(shown, Ok(Number::Double(value)));
        prop_assert_eq!(source.ratio.get(), value);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Choice box and source stay in step
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn selection_tracks_source(ops in level_ops_strategy()) {
        let source = sample();
        let form = bind(&source);
        let level = level_box(&form);

        for op in ops {
            match op {
                LevelOp::Choose(index) => {
                    level.choose(index);
                }
                LevelOp::Clear => {
                    level.clear_selection();
                }
                LevelOp::External(index) => {
                    source.level.set(index.map(|i| Level::constants()[i]));
                }
            }
            let shown = level.selected_item().and_then(|c| c.to_enum::<Level>());
            prop_assert_eq!(shown, source.level.get());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Disposal cuts both directions
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn disposed_binding_is_inert(writes in writes_strategy()) {
        let source = sample();
        let form = bind(&source);
        let note = text_field(&form, "note");
        source.note.set("start".into());
        prop_assert!(form.dispose());

        let mut field_text = note.text();
        let mut source_text = source.note.get();
        for write in writes {
            match write {
                Write::Field(text) => {
                    note.type_text(text.clone());
                    field_text = text;
                }
                Write::Source(text) => {
                    source.note.set(text.clone());
                    source_text = text;
                }
            }
            prop_assert_eq!(note.text(), field_text.clone());
            prop_assert_eq!(source.note.get(), source_text.clone());
        }
        prop_assert_eq!(source.note.subscriber_count(), 0);
        prop_assert_eq!(note.listener_count(), 0);
    }
}
