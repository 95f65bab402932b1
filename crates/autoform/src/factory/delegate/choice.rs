#![forbid(unsafe_code)]

use std::rc::Rc;

use autoform_widgets::{ChoiceBox, Node};
use tracing::warn;

use super::{expect_kind, log_rejected, resync};
use crate::binding::BindingGuard;
use crate::controller::ElementController;
use crate::disposable::{DisposableNode, Teardown};
use crate::error::NodeCreationError;
use crate::factory::NodeFactory;
use crate::value::{EnumConstant, Value, ValueKind, ValueType};

/// Choice box over the constants of an enumeration element.
///
/// If the constants cannot be listed the box is built empty and a
/// `enum.constants.unavailable` warning is logged; the form still builds.
/// A `Null` value clears the selection, and clearing the selection writes
/// `Null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumDelegate;

fn show(choice: &ChoiceBox<EnumConstant>, value: &Value) {
    let found = match value {
        Value::Enum(constant) => choice.select(constant),
        _ => false,
    };
    if !found {
        choice.clear_selection();
    }
}

impl NodeFactory for EnumDelegate {
    fn create_node(
        &self,
        controller: &ElementController,
    ) -> Result<DisposableNode, NodeCreationError> {
        let element = controller.element();
        expect_kind(element, ValueKind::Enum)?;
        let constants = match element.value_type() {
            ValueType::Enum(enum_type) => enum_type.constants().unwrap_or_else(|err| {
                warn!(
                    message = "enum.constants.unavailable",
                    field = element.name(),
                    enum_type = %enum_type.token(),
                    error = %err,
                );
                Vec::new()
            }),
            _ => Vec::new(),
        };

        let choice = ChoiceBox::new(constants);
        show(&choice, &element.value());
        choice.set_disabled(controller.is_read_only());
        let guard = Rc::new(BindingGuard::new());
        let mut teardown = Teardown::new();

        let (g, c, view) = (Rc::clone(&guard), controller.clone(), choice.clone());
        teardown.push(choice.on_selection_changed(move |item| {
            g.to_element(|| {
                let value = item.map_or(Value::Null, Value::Enum);
                if let Err(err) = c.commit(value.clone()) {
                    log_rejected(&c, &err);
                }
                resync(&c, &value, |current| show(&view, current));
            });
        }));

        let view = choice.clone();
        teardown.push(element.subscribe(move |value| {
            guard.to_control(|| show(&view, value));
        }));

        Ok(DisposableNode::new(Node::widget(choice), teardown))
    }
}
