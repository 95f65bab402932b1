#![forbid(unsafe_code)]

use autoform_widgets::{Label, Node};

use crate::controller::ElementController;
use crate::disposable::{DisposableNode, Teardown};
use crate::error::NodeCreationError;
use crate::factory::NodeFactory;

/// Builds the caption of a form row; the label follows the controller's
/// label until disposed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelFactory;

impl NodeFactory for LabelFactory {
    fn create_node(
        &self,
        controller: &ElementController,
    ) -> Result<DisposableNode, NodeCreationError> {
        let label = Label::new(controller.label());
        let view = label.clone();
        let mut teardown = Teardown::new();
        teardown.push(
            controller
                .label_property()
                .subscribe(move |text: &String| view.set_text(text.clone())),
        );
        Ok(DisposableNode::new(Node::Label(label), teardown))
    }
}
