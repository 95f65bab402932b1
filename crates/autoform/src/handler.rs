#![forbid(unsafe_code)]

//! Element handlers: predicates deciding which factory serves an element.
//!
//! Handlers are stateless and shared across forms and threads. Each one
//! exposes a [`HandlerKey`]; two handlers with equal keys are the same
//! registration, so registering the second replaces the first.

use std::fmt;

use crate::element::ObservableElement;
use crate::value::{TypeToken, ValueKind, ValueType};

/// Identity of a handler inside a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKey {
    Type(TypeToken),
    Enum,
    Kind(ValueKind),
    Marker(&'static str),
    /// Custom handlers pick a unique name.
    Named(&'static str),
}

impl fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(token) => write!(f, "type:{token}"),
            Self::Enum => f.write_str("enum"),
            Self::Kind(kind) => write!(f, "kind:{kind}"),
            Self::Marker(marker) => write!(f, "marker:{marker}"),
            Self::Named(name) => write!(f, "named:{name}"),
        }
    }
}

/// Decides whether a factory applies to an element.
pub trait ElementHandler: Send + Sync + fmt::Debug {
    fn handles(&self, element: &ObservableElement) -> bool;

    fn key(&self) -> HandlerKey;
}

/// Matches elements whose declared type is exactly `T`.
///
/// Built-in kinds map to their Rust holders: `String` for text, `bool`,
/// `i32`, `i64`, `f64`, and the enum type itself for enumerations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeHandler {
    token: TypeToken,
}

impl TypeHandler {
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(TypeToken::of::<T>())
    }

    #[must_use]
    pub fn new(token: TypeToken) -> Self {
        Self { token }
    }
}

impl ElementHandler for TypeHandler {
    fn handles(&self, element: &ObservableElement) -> bool {
        element.value_type().token() == self.token
    }

    fn key(&self) -> HandlerKey {
        HandlerKey::Type(self.token)
    }
}

/// Matches every enumeration-valued element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EnumHandler;

impl ElementHandler for EnumHandler {
    fn handles(&self, element: &ObservableElement) -> bool {
        matches!(element.value_type(), ValueType::Enum(_))
    }

    fn key(&self) -> HandlerKey {
        HandlerKey::Enum
    }
}

/// Matches by value family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KindHandler {
    kind: ValueKind,
}

impl KindHandler {
    #[must_use]
    pub fn new(kind: ValueKind) -> Self {
        Self { kind }
    }
}

impl ElementHandler for KindHandler {
    fn handles(&self, element: &ObservableElement) -> bool {
        element.value_type().kind() == self.kind
    }

    fn key(&self) -> HandlerKey {
        HandlerKey::Kind(self.kind)
    }
}

/// Matches fields carrying [`Annotation::Marker`] with the given name.
///
/// [`Annotation::Marker`]: crate::schema::Annotation::Marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnnotationHandler {
    marker: &'static str,
}

impl AnnotationHandler {
    #[must_use]
    pub fn marker(marker: &'static str) -> Self {
        Self { marker }
    }
}

impl ElementHandler for AnnotationHandler {
    fn handles(&self, element: &ObservableElement) -> bool {
        element.descriptor().has_marker(self.marker)
    }

    fn key(&self) -> HandlerKey {
        HandlerKey::Marker(self.marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Bindable, Schema, SchemaBuilder};
    use crate::value::FormEnum;
    use autoform_reactive::Observable;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Mode {
        On,
        Off,
    }

    impl FormEnum for Mode {
        fn constants() -> &'static [Self] {
            &[Self::On, Self::Off]
        }

        fn name(self) -> &'static str {
            match self {
                Self::On => "ON",
                Self::Off => "OFF",
            }
        }
    }

    struct Device {
        serial: Observable<String>,
        mode: Observable<Option<Mode>>,
        watts: Observable<f64>,
    }

    impl Bindable for Device {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.field("serial", |d: &Device| &d.serial).marker("barcode");
            schema.field("mode", |d: &Device| &d.mode);
            schema.field("watts", |d: &Device| &d.watts);
        }
    }

    fn elements() -> Vec<ObservableElement> {
        let device = Device {
            serial: Observable::new("S1".into()),
            mode: Observable::new(Some(Mode::On)),
            watts: Observable::new(60.0),
        };
        Schema::of::<Device>()
            .fields()
            .iter()
            .map(|f| ObservableElement::bind(&device, f.clone()).expect("bind"))
            .collect()
    }

    #[test]
    fn type_handler_matches_exact_token() {
        let els = elements();
        assert!(TypeHandler::of::<String>().handles(&els[0]));
        assert!(!TypeHandler::of::<String>().handles(&els[2]));
        assert!(TypeHandler::of::<Mode>().handles(&els[1]));
        assert!(TypeHandler::of::<f64>().handles(&els[2]));
    }

    #[test]
    fn enum_handler_matches_any_enum() {
        let els = elements();
        assert!(EnumHandler.handles(&els[1]));
        assert!(!EnumHandler.handles(&els[0]));
    }

    #[test]
    fn kind_and_marker_handlers() {
        let els = elements();
        assert!(KindHandler::new(ValueKind::Double).handles(&els[2]));
        assert!(AnnotationHandler::marker("barcode").handles(&els[0]));
        assert!(!AnnotationHandler::marker("barcode").handles(&els[2]));
    }

    #[test]
    fn keys_identify_configuration() {
        assert_eq!(TypeHandler::of::<String>().key(), TypeHandler::of::<String>().key());
        assert_ne!(TypeHandler::of::<String>().key(), TypeHandler::of::<i32>().key());
        assert_eq!(EnumHandler.key().to_string(), "enum");
        assert_eq!(AnnotationHandler::marker("x").key().to_string(), "marker:x");
    }
}
