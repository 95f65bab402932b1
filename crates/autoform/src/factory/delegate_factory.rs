#![forbid(unsafe_code)]

//! The tiered resolver.
//!
//! # Design
//!
//! Lookup for an element walks four tiers and stops at the first hit:
//!
//! 1. **user**: this `DelegateFactory`, mutated by
//!    [`DelegateFactory::add_factory`].
//! 2. **global**: a [`GlobalRegistry`], process-wide by default, mutated by
//!    [`DelegateFactory::add_global_factory`].
//! 3. **default**: fixed at build time through
//!    [`DelegateFactoryBuilder::default_factory`], then the built-in
//!    delegates.
//! 4. **fallback**: fixed at build time, [`UnsupportedDelegate`] unless
//!    replaced.
//!
//! Built-in delegates are chosen by matching on [`ValueType`]; the open
//! handler maps cover everything the match cannot anticipate.
//!
//! # Failure Modes
//!
//! Global registrations are shared mutable state: a registration made by one
//! part of an application changes the controls every other form gets,
//! including forms whose factory was built earlier.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::delegate::{
    BooleanDelegate, EnumDelegate, NumericDelegate, TextDelegate, UnsupportedDelegate,
};
use super::registry::{GlobalRegistry, HandlerMap, SharedFactory, Tier};
use super::NodeFactory;
use crate::controller::ElementController;
use crate::disposable::DisposableNode;
use crate::element::ObservableElement;
use crate::error::NodeCreationError;
use crate::format::{LocaleFormat, NumberFormat};
use crate::handler::{ElementHandler, HandlerKey};
use crate::value::ValueType;

/// The factory chosen for an element and the tier it came from.
#[derive(Clone)]
pub struct Resolution {
    pub tier: Tier,
    pub factory: SharedFactory,
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolution").field("tier", &self.tier).finish()
    }
}

#[derive(Clone)]
struct Builtins {
    text: SharedFactory,
    boolean: SharedFactory,
    choice: SharedFactory,
    integer: SharedFactory,
    long: SharedFactory,
    double: SharedFactory,
}

impl Builtins {
    fn new(format: &Arc<dyn NumberFormat>) -> Self {
        Self {
            text: Arc::new(TextDelegate),
            boolean: Arc::new(BooleanDelegate),
            choice: Arc::new(EnumDelegate),
            integer: Arc::new(NumericDelegate::integer(Arc::clone(format))),
            long: Arc::new(NumericDelegate::long(Arc::clone(format))),
            double: Arc::new(NumericDelegate::double(Arc::clone(format))),
        }
    }

    fn lookup(&self, value_type: ValueType) -> Option<SharedFactory> {
        let factory = match value_type {
            ValueType::Text => &self.text,
            ValueType::Bool => &self.boolean,
            ValueType::Enum(_) => &self.choice,
            ValueType::Int => &self.integer,
            ValueType::Long => &self.long,
            ValueType::Double => &self.double,
            ValueType::Other(_) => return None,
        };
        Some(Arc::clone(factory))
    }
}

/// Picks and invokes a [`NodeFactory`] for each element.
#[derive(Clone)]
pub struct DelegateFactory {
    user: HandlerMap,
    global: Arc<GlobalRegistry>,
    defaults: HandlerMap,
    builtins: Option<Builtins>,
    fallback: SharedFactory,
    format: Arc<dyn NumberFormat>,
}

impl Default for DelegateFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl DelegateFactory {
    /// Built-in delegates, [`LocaleFormat::default`] numbers and the shared
    /// global registry.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Like [`new`](Self::new) with `format` for every numeric delegate.
    #[must_use]
    pub fn with_format(format: impl NumberFormat + 'static) -> Self {
        Self::builder().format(format).build()
    }

    #[must_use]
    pub fn builder() -> DelegateFactoryBuilder {
        DelegateFactoryBuilder::default()
    }

    /// Register a factory for this instance only. Returns the factory it
    /// replaced, if `handler`'s key was already registered here.
    pub fn add_factory(
        &mut self,
        handler: impl ElementHandler + 'static,
        factory: impl NodeFactory + 'static,
    ) -> Option<SharedFactory> {
        self.user.insert(Arc::new(handler), Arc::new(factory))
    }

    /// Remove an instance registration.
    pub fn remove_factory(&mut self, key: &HandlerKey) -> Option<SharedFactory> {
        self.user.remove(key)
    }

    /// Register a factory in the process-wide registry.
    ///
    /// Every `DelegateFactory` reading the shared registry sees it from its
    /// next lookup on, whenever it was created.
    pub fn add_global_factory(
        handler: impl ElementHandler + 'static,
        factory: impl NodeFactory + 'static,
    ) -> Option<SharedFactory> {
        GlobalRegistry::shared().insert(Arc::new(handler), Arc::new(factory))
    }

    /// Remove a registration from the process-wide registry.
    pub fn remove_global_factory(key: &HandlerKey) -> Option<SharedFactory> {
        GlobalRegistry::shared().remove(key)
    }

    /// The global tier this instance reads.
    #[must_use]
    pub fn global_registry(&self) -> &Arc<GlobalRegistry> {
        &self.global
    }

    /// The format shared by the numeric delegates.
    #[must_use]
    pub fn format(&self) -> &Arc<dyn NumberFormat> {
        &self.format
    }

    /// Find the factory for `element`.
    #[must_use]
    pub fn resolve(&self, element: &ObservableElement) -> Resolution {
        if let Some(factory) = self.user.lookup(element, Tier::User) {
            return Resolution {
                tier: Tier::User,
                factory,
            };
        }
        if let Some(factory) = self.global.snapshot().lookup(element, Tier::Global) {
            return Resolution {
                tier: Tier::Global,
                factory,
            };
        }
        let default = self.defaults.lookup(element, Tier::Default).or_else(|| {
            self.builtins
                .as_ref()
                .and_then(|b| b.lookup(element.value_type()))
        });
        if let Some(factory) = default {
            return Resolution {
                tier: Tier::Default,
                factory,
            };
        }
        debug!(
            message = "resolver.fallback",
            field = element.name(),
            value_type = %element.value_type(),
        );
        Resolution {
            tier: Tier::Fallback,
            factory: Arc::clone(&self.fallback),
        }
    }

    /// The fallback node for `controller`, used when an editor cannot be
    /// built.
    pub fn placeholder(
        &self,
        controller: &ElementController,
    ) -> Result<DisposableNode, NodeCreationError> {
        self.fallback.create_node(controller)
    }
}

impl NodeFactory for DelegateFactory {
    fn create_node(
        &self,
        controller: &ElementController,
    ) -> Result<DisposableNode, NodeCreationError> {
        self.resolve(controller.element())
            .factory
            .create_node(controller)
    }
}

impl fmt::Debug for DelegateFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateFactory")
            .field("user", &self.user)
            .field("global", &self.global)
            .field("defaults", &self.defaults)
            .field("builtins", &self.builtins.is_some())
            .field("format", &self.format)
            .finish()
    }
}

/// Configures the fixed tiers of a [`DelegateFactory`].
#[derive(Default)]
pub struct DelegateFactoryBuilder {
    format: Option<Arc<dyn NumberFormat>>,
    defaults: HandlerMap,
    without_builtins: bool,
    global: Option<Arc<GlobalRegistry>>,
    fallback: Option<SharedFactory>,
}

impl DelegateFactoryBuilder {
    /// Number format for the built-in numeric delegates.
    #[must_use]
    pub fn format(mut self, format: impl NumberFormat + 'static) -> Self {
        self.format = Some(Arc::new(format));
        self
    }

    /// Add a default-tier registration, consulted before the built-ins.
    #[must_use]
    pub fn default_factory(
        mut self,
        handler: impl ElementHandler + 'static,
        factory: impl NodeFactory + 'static,
    ) -> Self {
        self.defaults.insert(Arc::new(handler), Arc::new(factory));
        self
    }

    /// Leave the built-in delegates out of the default tier.
    #[must_use]
    pub fn without_builtins(mut self) -> Self {
        self.without_builtins = true;
        self
    }

    /// Read the global tier from `registry` instead of the shared one.
    #[must_use]
    pub fn global_registry(mut self, registry: Arc<GlobalRegistry>) -> Self {
        self.global = Some(registry);
        self
    }

    /// Replace the unsupported-type fallback.
    #[must_use]
    pub fn fallback(mut self, factory: impl NodeFactory + 'static) -> Self {
        self.fallback = Some(Arc::new(factory));
        self
    }

    #[must_use]
    pub fn build(self) -> DelegateFactory {
        let format: Arc<dyn NumberFormat> = self
            .format
            .unwrap_or_else(|| Arc::new(LocaleFormat::default()));
        DelegateFactory {
            user: HandlerMap::new(),
            global: self.global.unwrap_or_else(GlobalRegistry::shared),
            defaults: self.defaults,
            builtins: (!self.without_builtins).then(|| Builtins::new(&format)),
            fallback: self
                .fallback
                .unwrap_or_else(|| Arc::new(UnsupportedDelegate)),
            format,
        }
    }
}
