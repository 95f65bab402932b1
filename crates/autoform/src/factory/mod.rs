#![forbid(unsafe_code)]

//! Node factories and the tiered resolver that picks one per element.

pub mod delegate;
mod delegate_factory;
mod registry;

pub use delegate_factory::{DelegateFactory, DelegateFactoryBuilder, Resolution};
pub use registry::{GlobalRegistry, HandlerMap, SharedFactory, SharedHandler, Tier};

use crate::controller::ElementController;
use crate::disposable::DisposableNode;
use crate::error::NodeCreationError;

/// Builds a control bound to one element.
///
/// Factories are shared across forms (and, in the global tier, threads), so
/// they hold configuration only; all per-node state lives in the returned
/// [`DisposableNode`].
pub trait NodeFactory: Send + Sync {
    fn create_node(
        &self,
        controller: &ElementController,
    ) -> Result<DisposableNode, NodeCreationError>;
}

impl<F> NodeFactory for F
where
    F: Fn(&ElementController) -> Result<DisposableNode, NodeCreationError> + Send + Sync,
{
    fn create_node(
        &self,
        controller: &ElementController,
    ) -> Result<DisposableNode, NodeCreationError> {
        self(controller)
    }
}
