#![forbid(unsafe_code)]

//! Disposable nodes: a control paired with the teardown of its bindings.
//!
//! # Design
//!
//! A factory registers every subscription it creates, plus any extra
//! cleanup, in a [`Teardown`]. The owning form only ever calls
//! [`DisposableNode::dispose`]; it never needs to know how a node is wired.
//!
//! # Failure Modes
//!
//! Disposing twice is a no-op: the second call returns `false` and logs
//! `node.dispose.repeat` at trace level. Dropping an undisposed node
//! disposes it.

use std::cell::RefCell;
use std::fmt;

use autoform_reactive::Subscription;
use autoform_widgets::Node;
use tracing::trace;

/// Cleanup work owned by one node.
#[derive(Default)]
pub struct Teardown {
    subscriptions: Vec<Subscription>,
    actions: Vec<Box<dyn FnOnce()>>,
}

impl Teardown {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `subscription` alive until teardown.
    pub fn push(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Run `action` after the subscriptions are cancelled.
    pub fn on_dispose(&mut self, action: impl FnOnce() + 'static) {
        self.actions.push(Box::new(action));
    }

    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    fn run(self) {
        for subscription in self.subscriptions {
            subscription.cancel();
        }
        for action in self.actions {
            action();
        }
    }
}

impl fmt::Debug for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Teardown")
            .field("subscriptions", &self.subscriptions.len())
            .field("actions", &self.actions.len())
            .finish()
    }
}

/// A control ready for layout, with the teardown of its bindings.
pub struct DisposableNode {
    node: Node,
    teardown: RefCell<Option<Teardown>>,
}

impl DisposableNode {
    #[must_use]
    pub fn new(node: Node, teardown: Teardown) -> Self {
        Self {
            node,
            teardown: RefCell::new(Some(teardown)),
        }
    }

    /// A node with nothing to tear down.
    #[must_use]
    pub fn inert(node: Node) -> Self {
        Self::new(node, Teardown::new())
    }

    #[must_use]
    pub fn node(&self) -> &Node {
        &self.node
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.teardown.borrow().is_none()
    }

    /// Remove every binding this node registered.
    ///
    /// Returns `true` the first time, `false` on every later call.
    pub fn dispose(&self) -> bool {
        let teardown = self.teardown.borrow_mut().take();
        match teardown {
            Some(teardown) => {
                teardown.run();
                true
            }
            None => {
                trace!(message = "node.dispose.repeat", kind = self.node.kind());
                false
            }
        }
    }
}

impl Drop for DisposableNode {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.get_mut().take() {
            teardown.run();
        }
    }
}

impl fmt::Debug for DisposableNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisposableNode")
            .field("node", &self.node)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
