#![forbid(unsafe_code)]

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use autoform_widgets::{Node, TextField};

use super::{expect_kind, log_rejected, resync};
use crate::binding::BindingGuard;
use crate::controller::ElementController;
use crate::disposable::{DisposableNode, Teardown};
use crate::error::NodeCreationError;
use crate::factory::NodeFactory;
use crate::format::{Number, NumberFormat, NumericKind};
use crate::value::{Value, ValueKind};

/// Text field editing one numeric family through a [`NumberFormat`].
///
/// Input that does not parse, does not fit the family, or fails the
/// controller's constraints is rejected: the element keeps its value and the
/// field shows it again. The revert is a nested write on the field's text, so
/// listeners registered after the binding see only the reverted text, never
/// the rejected one.
#[derive(Clone)]
pub struct NumericDelegate {
    kind: NumericKind,
    format: Arc<dyn NumberFormat>,
}

impl NumericDelegate {
    #[must_use]
    pub fn new(kind: NumericKind, format: Arc<dyn NumberFormat>) -> Self {
        Self { kind, format }
    }

    #[must_use]
    pub fn integer(format: Arc<dyn NumberFormat>) -> Self {
        Self::new(NumericKind::Int, format)
    }

    #[must_use]
    pub fn long(format: Arc<dyn NumberFormat>) -> Self {
        Self::new(NumericKind::Long, format)
    }

    #[must_use]
    pub fn double(format: Arc<dyn NumberFormat>) -> Self {
        Self::new(NumericKind::Double, format)
    }

    #[must_use]
    pub fn kind(&self) -> NumericKind {
        self.kind
    }
}

impl fmt::Debug for NumericDelegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericDelegate")
            .field("kind", &self.kind)
            .field("format", &self.format)
            .finish()
    }
}

fn display(format: &dyn NumberFormat, value: &Value) -> String {
    Number::from_value(value).map_or_else(String::new, |n| format.format(n))
}

impl NodeFactory for NumericDelegate {
    fn create_node(
        &self,
        controller: &ElementController,
    ) -> Result<DisposableNode, NodeCreationError> {
        let element = controller.element();
        let expected = match self.kind {
            NumericKind::Int => ValueKind::Int,
            NumericKind::Long => ValueKind::Long,
            NumericKind::Double => ValueKind::Double,
        };
        expect_kind(element, expected)?;

        let field = TextField::with_text(display(self.format.as_ref(), &element.value()));
        field.set_disabled(controller.is_read_only());
        let guard = Rc::new(BindingGuard::new());
        let mut teardown = Teardown::new();

        let (g, c, view) = (Rc::clone(&guard), controller.clone(), field.clone());
        let (format, kind) = (Arc::clone(&self.format), self.kind);
        teardown.push(field.on_text_changed(move |text| {
            g.to_element(|| {
                let show = |current: &Value| {
                    view.set_text(display(format.as_ref(), current));
                };
                match format.parse(kind, text) {
                    Ok(number) => {
                        let value = Value::from(number);
                        if let Err(err) = c.commit(value.clone()) {
                            log_rejected(&c, &err);
                        }
                        resync(&c, &value, show);
                    }
                    Err(err) => {
                        log_rejected(&c, &err);
                        show(&c.element().value());
                    }
                }
            });
        }));

        let (view, format) = (field.clone(), Arc::clone(&self.format));
        teardown.push(element.subscribe(move |value| {
            guard.to_control(|| view.set_text(display(format.as_ref(), value)));
        }));

        Ok(DisposableNode::new(Node::TextField(field), teardown))
    }
}
