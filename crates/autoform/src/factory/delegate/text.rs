#![forbid(unsafe_code)]

use std::rc::Rc;

use autoform_widgets::{Node, TextField};

use super::{expect_kind, log_rejected, resync};
use crate::binding::BindingGuard;
use crate::controller::ElementController;
use crate::disposable::{DisposableNode, Teardown};
use crate::error::NodeCreationError;
use crate::factory::NodeFactory;
use crate::value::{Value, ValueKind};

/// Text field bound to a text element. `Null` shows as empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextDelegate;

fn display(value: &Value) -> String {
    match value {
        Value::Text(text) => text.clone(),
        _ => String::new(),
    }
}

impl NodeFactory for TextDelegate {
    fn create_node(
        &self,
        controller: &ElementController,
    ) -> Result<DisposableNode, NodeCreationError> {
        let element = controller.element();
        expect_kind(element, ValueKind::Text)?;

        let field = TextField::with_text(display(&element.value()));
        field.set_disabled(controller.is_read_only());
        let guard = Rc::new(BindingGuard::new());
        let mut teardown = Teardown::new();

        let (g, c, view) = (Rc::clone(&guard), controller.clone(), field.clone());
        teardown.push(field.on_text_changed(move |text| {
            g.to_element(|| {
                let value = Value::Text(text.clone());
                if let Err(err) = c.commit(value.clone()) {
                    log_rejected(&c, &err);
                }
                resync(&c, &value, |current| {
                    view.set_text(display(current));
                });
            });
        }));

        let view = field.clone();
        teardown.push(element.subscribe(move |value| {
            guard.to_control(|| view.set_text(display(value)));
        }));

        Ok(DisposableNode::new(Node::TextField(field), teardown))
    }
}
