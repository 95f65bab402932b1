#![forbid(unsafe_code)]

//! Form assembly: discovery, resolution and binding for one source object.
//!
//! # Design
//!
//! [`FormBuilder::bind`] runs the whole pipeline. Fields come from the
//! configured [`FieldProvider`]; each gets one [`ObservableElement`], one
//! [`ElementController`], a caption from the label factory and an editor
//! from the [`DelegateFactory`]. Rows keep discovery order.
//!
//! # Failure Modes
//!
//! - A field that cannot be bound is logged (`form.discover.skip`) and left
//!   out.
//! - An editor the factory cannot build is replaced by the fallback node
//!   under [`NodeErrorPolicy::Placeholder`] (logged as `form.row.failed`);
//!   under [`NodeErrorPolicy::Abort`] the rows built so far are disposed and
//!   the error is returned.

use std::any::Any;
use std::cell::Cell;
use std::fmt;

use ahash::AHashMap;
use autoform_widgets::{Label, Node};
use tracing::{debug_span, warn};

use crate::config::{FormConfig, NodeErrorPolicy};
use crate::controller::ElementController;
use crate::discover::{FieldProvider, SchemaFieldProvider};
use crate::disposable::DisposableNode;
use crate::element::ObservableElement;
use crate::error::{FormError, NodeCreationError, Result};
use crate::factory::delegate::LabelFactory;
use crate::factory::{DelegateFactory, NodeFactory, Tier};
use crate::schema::{Bindable, Schema};
use crate::value::TypeToken;

/// One field of a form: its controller, caption and editor.
#[derive(Debug)]
pub struct FormRow {
    controller: ElementController,
    tier: Tier,
    label: DisposableNode,
    editor: DisposableNode,
}

impl FormRow {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.controller.element().name()
    }

    #[must_use]
    pub fn controller(&self) -> &ElementController {
        &self.controller
    }

    #[must_use]
    pub fn element(&self) -> &ObservableElement {
        self.controller.element()
    }

    /// Tier whose factory built the editor; [`Tier::Fallback`] for
    /// placeholders.
    #[must_use]
    pub fn tier(&self) -> Tier {
        self.tier
    }

    #[must_use]
    pub fn label(&self) -> &Node {
        self.label.node()
    }

    #[must_use]
    pub fn editor(&self) -> &Node {
        self.editor.node()
    }

    fn dispose(&self) {
        self.label.dispose();
        self.editor.dispose();
    }
}

/// A bound form. Dropping it disposes every row.
pub struct Form {
    rows: Vec<FormRow>,
    by_name: AHashMap<&'static str, usize>,
    disposed: Cell<bool>,
}

impl Form {
    fn new(rows: Vec<FormRow>) -> Self {
        let mut by_name = AHashMap::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            // Most-derived field wins when an ancestor reuses a name.
            by_name.entry(row.name()).or_insert(index);
        }
        Self {
            rows,
            by_name,
            disposed: Cell::new(false),
        }
    }

    /// Rows in discovery order.
    #[must_use]
    pub fn rows(&self) -> &[FormRow] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, name: &str) -> Option<&FormRow> {
        self.by_name.get(name).map(|&index| &self.rows[index])
    }

    #[must_use]
    pub fn element(&self, name: &str) -> Option<&ObservableElement> {
        self.row(name).map(FormRow::element)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Tear down every binding. Returns `false` if already disposed.
    pub fn dispose(&self) -> bool {
        if self.disposed.replace(true) {
            return false;
        }
        for row in &self.rows {
            row.dispose();
        }
        true
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("rows", &self.rows)
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

/// Configures and runs form assembly.
pub struct FormBuilder {
    factory: DelegateFactory,
    labels: Box<dyn NodeFactory>,
    provider: Box<dyn FieldProvider>,
    config: FormConfig,
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FormBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            factory: DelegateFactory::new(),
            labels: Box::new(LabelFactory),
            provider: Box::new(SchemaFieldProvider),
            config: FormConfig::default(),
        }
    }

    #[must_use]
    pub fn factory(mut self, factory: DelegateFactory) -> Self {
        self.factory = factory;
        self
    }

    #[must_use]
    pub fn label_factory(mut self, labels: impl NodeFactory + 'static) -> Self {
        self.labels = Box::new(labels);
        self
    }

    #[must_use]
    pub fn field_provider(mut self, provider: impl FieldProvider + 'static) -> Self {
        self.provider = Box::new(provider);
        self
    }

    #[must_use]
    pub fn config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    /// The resolver, for registering per-form factories.
    pub fn factory_mut(&mut self) -> &mut DelegateFactory {
        &mut self.factory
    }

    /// Build a form bound to `source`.
    pub fn bind<T: Bindable>(&self, source: &T) -> Result<Form> {
        let _span = debug_span!("form.bind", source = %TypeToken::of::<T>()).entered();
        let schema = Schema::of::<T>();
        let fields = self.provider.provide(&schema, Some(source as &dyn Any));

        let mut rows = Vec::with_capacity(fields.len());
        for descriptor in fields {
            let element = match ObservableElement::bind(source, descriptor) {
                Ok(element) => element,
                Err(err) => {
                    warn!(message = "form.discover.skip", error = %err);
                    continue;
                }
            };
            let controller = ElementController::new(element, self.config.labels);
            let (tier, editor) = self.editor(&controller)?;
            let label = match self.labels.create_node(&controller) {
                Ok(label) => label,
                Err(err) => self.recover(err, || {
                    Ok(DisposableNode::inert(Node::Label(Label::new(controller.label()))))
                })?,
            };
            rows.push(FormRow {
                controller,
                tier,
                label,
                editor,
            });
        }
        Ok(Form::new(rows))
    }

    fn editor(&self, controller: &ElementController) -> Result<(Tier, DisposableNode)> {
        let resolution = self.factory.resolve(controller.element());
        match resolution.factory.create_node(controller) {
            Ok(node) => Ok((resolution.tier, node)),
            Err(err) => {
                let node = self.recover(err, || self.factory.placeholder(controller))?;
                Ok((Tier::Fallback, node))
            }
        }
    }

    fn recover(
        &self,
        err: NodeCreationError,
        placeholder: impl FnOnce() -> std::result::Result<DisposableNode, NodeCreationError>,
    ) -> Result<DisposableNode> {
        let field = err.field();
        match self.config.node_errors {
            NodeErrorPolicy::Abort => Err(FormError::Node { field, source: err }),
            NodeErrorPolicy::Placeholder => {
                warn!(message = "form.row.failed", field, error = %err);
                placeholder().map_err(|source| FormError::Node { field, source })
            }
        }
    }
}

impl fmt::Debug for FormBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormBuilder")
            .field("factory", &self.factory)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
