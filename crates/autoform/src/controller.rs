#![forbid(unsafe_code)]

//! Element controllers: an element plus what a control needs to present it.
//!
//! # Invariants
//!
//! 1. The label is the field's `Label` annotation when present, otherwise the
//!    field name under the configured [`LabelStyle`].
//! 2. [`ElementController::check`] is pure: it never writes the element.
//! 3. A read-only controller rejects every write, including `Null`.

use autoform_reactive::Observable;

use crate::config::LabelStyle;
use crate::element::ObservableElement;
use crate::error::ValueError;
use crate::format::Number;
use crate::schema::Annotation;
use crate::value::Value;

/// Write constraints collected from a field's annotations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Constraints {
    pub read_only: bool,
    pub range: Option<(f64, f64)>,
    pub non_empty: bool,
}

impl Constraints {
    #[must_use]
    pub fn from_annotations(annotations: &[Annotation]) -> Self {
        annotations
            .iter()
            .fold(Self::default(), |mut acc, annotation| {
                match annotation {
                    Annotation::ReadOnly => acc.read_only = true,
                    Annotation::Range { min, max } => acc.range = Some((*min, *max)),
                    Annotation::NonEmpty => acc.non_empty = true,
                    _ => {}
                }
                acc
            })
    }
}

/// An [`ObservableElement`] with its label and constraints.
#[derive(Debug, Clone)]
pub struct ElementController {
    element: ObservableElement,
    label: Observable<String>,
    constraints: Constraints,
}

impl ElementController {
    #[must_use]
    pub fn new(element: ObservableElement, style: LabelStyle) -> Self {
        let descriptor = element.descriptor();
        let label = descriptor
            .label()
            .map_or_else(|| style.apply(descriptor.name()), str::to_owned);
        let constraints = Constraints::from_annotations(descriptor.annotations());
        Self {
            element,
            label: Observable::new(label),
            constraints,
        }
    }

    #[must_use]
    pub fn element(&self) -> &ObservableElement {
        &self.element
    }

    /// Current label text.
    #[must_use]
    pub fn label(&self) -> String {
        self.label.get()
    }

    /// The label cell, for controls that follow it.
    #[must_use]
    pub fn label_property(&self) -> &Observable<String> {
        &self.label
    }

    pub fn set_label(&self, text: impl Into<String>) {
        self.label.set(text.into());
    }

    #[must_use]
    pub fn constraints(&self) -> Constraints {
        self.constraints
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.constraints.read_only
    }

    /// Validate `value` against the field's constraints.
    pub fn check(&self, value: &Value) -> Result<(), ValueError> {
        let field = self.element.name();
        if self.constraints.read_only {
            return Err(ValueError::ReadOnly { field });
        }
        if let (Some((min, max)), Some(number)) =
            (self.constraints.range, Number::from_value(value))
        {
            let v = number.as_f64();
            if v < min || v > max {
                return Err(ValueError::Constraint {
                    field,
                    reason: format!("{v} is outside {min}..={max}"),
                });
            }
        }
        if self.constraints.non_empty {
            let blank = match value {
                Value::Null => true,
                Value::Text(text) => text.trim().is_empty(),
                _ => false,
            };
            if blank {
                return Err(ValueError::Constraint {
                    field,
                    reason: "must not be empty".to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Check, then write. The path every delegate takes for user edits.
    pub fn commit(&self, value: Value) -> Result<bool, ValueError> {
        self.check(&value)?;
        self.element.set_value(value)
    }
}
