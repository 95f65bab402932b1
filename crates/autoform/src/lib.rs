#![forbid(unsafe_code)]

//! Descriptor-driven form generation.
//!
//! Given a domain object whose type implements [`Bindable`], autoform lists
//! its fields, wraps each one in an [`ObservableElement`], picks a control
//! for it through a tiered [`DelegateFactory`], binds the control both ways
//! and tears everything down when the form is disposed.
//!
//! ```
//! use autoform::{Bindable, FormBuilder, SchemaBuilder};
//! use autoform_reactive::Observable;
//!
//! struct User {
//!     name: Observable<String>,
//!     admin: Observable<bool>,
//! }
//!
//! impl Bindable for User {
//!     fn describe(schema: &mut SchemaBuilder<Self>) {
//!         schema.field("name", |u: &User| &u.name);
//!         schema.field("admin", |u: &User| &u.admin).read_only();
//!     }
//! }
//!
//! let user = User {
//!     name: Observable::new("Ada".into()),
//!     admin: Observable::new(false),
//! };
//! let form = FormBuilder::new().bind(&user).expect("form");
//!
//! let name = form
//!     .row("name")
//!     .and_then(|r| r.editor().as_text_field().cloned())
//!     .expect("text field");
//! name.type_text("Grace");
//! assert_eq!(user.name.get(), "Grace");
//!
//! user.name.set("Linus".into());
//! assert_eq!(name.text(), "Linus");
//!
//! assert!(form.row("admin").expect("row").editor().is_disabled());
//! form.dispose();
//! ```
//!
//! # Pipeline
//!
//! | stage | module |
//! |---|---|
//! | field tables and discovery | [`schema`], [`discover`] |
//! | observable elements and controllers | [`element`], [`controller`] |
//! | handler→factory resolution | [`handler`], [`factory`] |
//! | two-way binding and teardown | [`binding`], [`disposable`] |
//! | assembly | [`form`] |
//!
//! # Logging
//!
//! Events are emitted through `tracing` with a dotted `message` name:
//! `form.bind` (span), `form.discover.skip`, `form.row.failed`,
//! `resolver.ambiguous`, `resolver.fallback`, `enum.constants.unavailable`,
//! `binding.rejected` and `node.dispose.repeat`. Installing a subscriber is
//! up to the application.

pub mod binding;
pub mod config;
pub mod controller;
pub mod discover;
pub mod disposable;
pub mod element;
pub mod error;
pub mod factory;
pub mod format;
pub mod form;
pub mod handler;
pub mod property;
pub mod schema;
pub mod value;

pub use binding::{BindState, BindingGuard};
pub use config::{FormConfig, LabelStyle, NodeErrorPolicy};
pub use controller::{Constraints, ElementController};
pub use discover::{FieldProvider, FilteredFieldProvider, SchemaFieldProvider, discover};
pub use disposable::{DisposableNode, Teardown};
pub use element::ObservableElement;
pub use error::{
    DiscoveryError, EnumError, FormError, NodeCreationError, ParseError, Result, ValueError,
};
pub use factory::{
    DelegateFactory, DelegateFactoryBuilder, GlobalRegistry, NodeFactory, Resolution, Tier,
};
pub use form::{Form, FormBuilder, FormRow};
pub use format::{LocaleFormat, Number, NumberFormat, NumericKind};
pub use handler::{
    AnnotationHandler, ElementHandler, EnumHandler, HandlerKey, KindHandler, TypeHandler,
};
pub use property::{CustomCell, Property};
pub use schema::{Annotation, Bindable, FieldDescriptor, Schema, SchemaBuilder};
pub use value::{EnumConstant, EnumType, FormEnum, TypeToken, Value, ValueKind, ValueType};
