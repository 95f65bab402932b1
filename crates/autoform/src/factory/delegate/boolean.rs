#![forbid(unsafe_code)]

use std::rc::Rc;

use autoform_widgets::{CheckBox, Node};

use super::{expect_kind, log_rejected, resync};
use crate::binding::BindingGuard;
use crate::controller::ElementController;
use crate::disposable::{DisposableNode, Teardown};
use crate::error::NodeCreationError;
use crate::factory::NodeFactory;
use crate::value::{Value, ValueKind};

/// Check box bound to a boolean element. `Null` shows unchecked.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanDelegate;

fn checked(value: &Value) -> bool {
    matches!(value, Value::Bool(true))
}

impl NodeFactory for BooleanDelegate {
    fn create_node(
        &self,
        controller: &ElementController,
    ) -> Result<DisposableNode, NodeCreationError> {
        let element = controller.element();
        expect_kind(element, ValueKind::Bool)?;

        let check_box = CheckBox::new();
        check_box.set_selected(checked(&element.value()));
        check_box.set_disabled(controller.is_read_only());
        let guard = Rc::new(BindingGuard::new());
        let mut teardown = Teardown::new();

        let (g, c, view) = (Rc::clone(&guard), controller.clone(), check_box.clone());
        teardown.push(check_box.on_selected_changed(move |selected| {
            g.to_element(|| {
                let value = Value::Bool(*selected);
                if let Err(err) = c.commit(value.clone()) {
                    log_rejected(&c, &err);
                }
                resync(&c, &value, |current| {
                    view.set_selected(checked(current));
                });
            });
        }));

        let view = check_box.clone();
        teardown.push(element.subscribe(move |value| {
            guard.to_control(|| view.set_selected(checked(value)));
        }));

        Ok(DisposableNode::new(Node::CheckBox(check_box), teardown))
    }
}
