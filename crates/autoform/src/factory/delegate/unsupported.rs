#![forbid(unsafe_code)]

use autoform_widgets::{Label, Node};

use crate::controller::ElementController;
use crate::disposable::DisposableNode;
use crate::error::NodeCreationError;
use crate::factory::NodeFactory;

/// Fallback for elements no tier handles: an inert label naming the type.
///
/// Also stands in for editors whose factory failed, so a field never
/// disappears from the form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedDelegate;

impl UnsupportedDelegate {
    /// Text shown for `controller`'s element.
    #[must_use]
    pub fn message(controller: &ElementController) -> String {
        format!("{} not supported", controller.element().value_type())
    }
}

impl NodeFactory for UnsupportedDelegate {
    fn create_node(
        &self,
        controller: &ElementController,
    ) -> Result<DisposableNode, NodeCreationError> {
        Ok(DisposableNode::inert(Node::Label(Label::new(Self::message(controller)))))
    }
}
