#![forbid(unsafe_code)]

//! Compile-time field tables for domain types.
//!
//! A domain type lists its bindable fields once, in [`Bindable::describe`].
//! The table plays the role runtime field introspection plays elsewhere:
//! discovery reads it instead of inspecting the type.
//!
//! ```
//! use autoform::schema::{Bindable, SchemaBuilder};
//! use autoform_reactive::Observable;
//!
//! struct Entity {
//!     id: Observable<i64>,
//! }
//!
//! struct Person {
//!     base: Entity,
//!     name: Observable<String>,
//!     secret: Observable<String>,
//! }
//!
//! impl Bindable for Entity {
//!     fn describe(schema: &mut SchemaBuilder<Self>) {
//!         schema.field("id", |e: &Entity| &e.id).read_only();
//!     }
//! }
//!
//! impl Bindable for Person {
//!     fn describe(schema: &mut SchemaBuilder<Self>) {
//!         schema.field("name", |p: &Person| &p.name).label("Full name");
//!         schema.field("secret", |p: &Person| &p.secret).non_visual();
//!         schema.extends(|p: &Person| &p.base);
//!     }
//! }
//!
//! let names: Vec<_> = autoform::schema::Schema::of::<Person>()
//!     .fields()
//!     .iter()
//!     .map(|f| f.name())
//!     .collect();
//! assert_eq!(names, ["name", "secret", "id"]);
//! ```

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use autoform_reactive::Observable;

use crate::error::DiscoveryError;
use crate::property::{CustomCell, Property, PropertyCell};
use crate::value::{TypeToken, ValueType};

/// Metadata attached to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// Exclude the field from form generation.
    NonVisual,
    /// Display label, overriding the one derived from the field name.
    Label(String),
    /// Free-form marker matched by [`AnnotationHandler`].
    ///
    /// [`AnnotationHandler`]: crate::handler::AnnotationHandler
    Marker(&'static str),
    /// The form may show the value but must not write it.
    ReadOnly,
    /// Numeric values must lie in `min..=max`.
    Range { min: f64, max: f64 },
    /// Text must contain a non-whitespace character.
    NonEmpty,
}

/// Declared visibility of the Rust field. Recorded only: access always goes
/// through the registered accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

type Accessor = Rc<dyn Fn(&dyn Any) -> Option<Rc<dyn Property>>>;

struct FieldInner {
    declaring_type: TypeToken,
    name: &'static str,
    value_type: ValueType,
    annotations: Vec<Annotation>,
    visibility: Visibility,
    accessor: Accessor,
}

/// One bindable field of a domain type.
///
/// Identity is `(declaring type, name)`. Descriptors are immutable and cheap
/// to clone.
#[derive(Clone)]
pub struct FieldDescriptor {
    inner: Rc<FieldInner>,
}

impl FieldDescriptor {
    /// Type that declares the field (an ancestor for inherited fields).
    #[must_use]
    pub fn declaring_type(&self) -> TypeToken {
        self.inner.declaring_type
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.inner.value_type
    }

    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.inner.annotations
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.inner.visibility
    }

    #[must_use]
    pub fn has_annotation(&self, annotation: &Annotation) -> bool {
        self.inner.annotations.contains(annotation)
    }

    #[must_use]
    pub fn has_marker(&self, marker: &str) -> bool {
        self.inner
            .annotations
            .iter()
            .any(|a| matches!(a, Annotation::Marker(m) if *m == marker))
    }

    /// Whether the field carries the exclusion marker.
    #[must_use]
    pub fn is_non_visual(&self) -> bool {
        self.has_annotation(&Annotation::NonVisual)
    }

    /// The label annotation, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.inner.annotations.iter().find_map(|a| match a {
            Annotation::Label(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Resolve the field's cell on `source`.
    pub fn property(&self, source: &dyn Any) -> Result<Rc<dyn Property>, DiscoveryError> {
        (self.inner.accessor)(source).ok_or(DiscoveryError::Inaccessible {
            declaring_type: self.inner.declaring_type.short_name(),
            field: self.inner.name,
        })
    }

    /// Same descriptor reached from `Child` through `project`.
    fn lift<Child: 'static, P: 'static>(&self, project: Rc<dyn Fn(&Child) -> &P>) -> Self {
        let parent = Rc::clone(&self.inner.accessor);
        let accessor: Accessor = Rc::new(move |source: &dyn Any| {
            let child = source.downcast_ref::<Child>()?;
            parent(project(child) as &dyn Any)
        });
        Self {
            inner: Rc::new(FieldInner {
                declaring_type: self.inner.declaring_type,
                name: self.inner.name,
                value_type: self.inner.value_type,
                annotations: self.inner.annotations.clone(),
                visibility: self.inner.visibility,
                accessor,
            }),
        }
    }
}

impl PartialEq for FieldDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.inner.declaring_type == other.inner.declaring_type
            && self.inner.name == other.inner.name
    }
}

impl Eq for FieldDescriptor {}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("declaring_type", &self.inner.declaring_type.short_name())
            .field("name", &self.inner.name)
            .field("value_type", &self.inner.value_type)
            .field("annotations", &self.inner.annotations)
            .field("visibility", &self.inner.visibility)
            .finish()
    }
}

/// A domain type with a registered field table.
pub trait Bindable: 'static {
    /// Register the fields declared directly on `Self`, and the ancestor
    /// type (if any) through [`SchemaBuilder::extends`].
    fn describe(schema: &mut SchemaBuilder<Self>)
    where
        Self: Sized;
}

/// Registration entry returned by [`SchemaBuilder::field`].
pub struct FieldSpec {
    name: &'static str,
    value_type: ValueType,
    annotations: Vec<Annotation>,
    visibility: Visibility,
    accessor: Accessor,
}

impl FieldSpec {
    pub fn annotate(&mut self, annotation: Annotation) -> &mut Self {
        self.annotations.push(annotation);
        self
    }

    pub fn non_visual(&mut self) -> &mut Self {
        self.annotate(Annotation::NonVisual)
    }

    pub fn label(&mut self, text: impl Into<String>) -> &mut Self {
        self.annotate(Annotation::Label(text.into()))
    }

    pub fn marker(&mut self, marker: &'static str) -> &mut Self {
        self.annotate(Annotation::Marker(marker))
    }

    pub fn read_only(&mut self) -> &mut Self {
        self.annotate(Annotation::ReadOnly)
    }

    pub fn range(&mut self, min: f64, max: f64) -> &mut Self {
        self.annotate(Annotation::Range { min, max })
    }

    pub fn non_empty(&mut self) -> &mut Self {
        self.annotate(Annotation::NonEmpty)
    }

    pub fn private(&mut self) -> &mut Self {
        self.visibility = Visibility::Private;
        self
    }
}

type AncestorLink = Box<dyn FnOnce() -> (Vec<FieldDescriptor>, Vec<DiscoveryError>)>;

/// Collects the field table of `T`.
pub struct SchemaBuilder<T> {
    fields: Vec<FieldSpec>,
    ancestor: Option<AncestorLink>,
    _marker: std::marker::PhantomData<fn(&T)>,
}

impl<T: Bindable> SchemaBuilder<T> {
    fn new() -> Self {
        Self {
            fields: Vec::new(),
            ancestor: None,
            _marker: std::marker::PhantomData,
        }
    }

    /// Register a field whose cell is always present.
    pub fn field<C, F>(&mut self, name: &'static str, get: F) -> &mut FieldSpec
    where
        C: PropertyCell,
        F: Fn(&T) -> &C + 'static,
    {
        self.optional_field(name, move |t: &T| Some(get(t)))
    }

    /// Register a field whose cell may be absent on some objects, e.g. one
    /// nested inside an `Option`. Discovery skips it where it is absent.
    pub fn optional_field<C, F>(&mut self, name: &'static str, get: F) -> &mut FieldSpec
    where
        C: PropertyCell,
        F: Fn(&T) -> Option<&C> + 'static,
    {
        let accessor: Accessor = Rc::new(move |source: &dyn Any| {
            let target = source.downcast_ref::<T>()?;
            get(target).map(|cell| Rc::new(cell.clone()) as Rc<dyn Property>)
        });
        self.push(name, C::declared_type(), accessor)
    }

    /// Register a field holding a type the built-in kinds do not cover.
    pub fn custom_field<V, F>(&mut self, name: &'static str, get: F) -> &mut FieldSpec
    where
        V: Clone + PartialEq + 'static,
        F: Fn(&T) -> &Observable<V> + 'static,
    {
        let accessor: Accessor = Rc::new(move |source: &dyn Any| {
            let target = source.downcast_ref::<T>()?;
            Some(Rc::new(CustomCell::new(get(target).clone())) as Rc<dyn Property>)
        });
        self.push(name, CustomCell::<V>::declared_type(), accessor)
    }

    /// Declare `P` as the ancestor of `T`, reached through `project`.
    ///
    /// A type has at most one ancestor; a second call replaces the first.
    /// The chain must be acyclic.
    pub fn extends<P, F>(&mut self, project: F)
    where
        P: Bindable,
        F: Fn(&T) -> &P + 'static,
    {
        let project: Rc<dyn Fn(&T) -> &P> = Rc::new(project);
        self.ancestor = Some(Box::new(move || {
            let parent = Schema::of::<P>();
            let fields = parent
                .fields
                .iter()
                .map(|field| field.lift(Rc::clone(&project)))
                .collect();
            (fields, parent.errors)
        }));
    }

    fn push(
        &mut self,
        name: &'static str,
        value_type: ValueType,
        accessor: Accessor,
    ) -> &mut FieldSpec {
        self.fields.push(FieldSpec {
            name,
            value_type,
            annotations: Vec::new(),
            visibility: Visibility::Public,
            accessor,
        });
        let last = self.fields.len() - 1;
        &mut self.fields[last]
    }
}

/// The flattened field table of one type: its own fields in registration
/// order, followed by each ancestor's, most-derived first.
///
/// Excluded fields are kept here; filtering happens during discovery.
pub struct Schema {
    type_token: TypeToken,
    fields: Vec<FieldDescriptor>,
    errors: Vec<DiscoveryError>,
}

impl Schema {
    #[must_use]
    pub fn of<T: Bindable>() -> Self {
        let mut builder = SchemaBuilder::<T>::new();
        T::describe(&mut builder);

        let declaring_type = TypeToken::of::<T>();
        let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(builder.fields.len());
        let mut errors = Vec::new();
        for spec in builder.fields {
            if fields.iter().any(|f| f.name() == spec.name) {
                errors.push(DiscoveryError::DuplicateField {
                    declaring_type: declaring_type.short_name(),
                    field: spec.name,
                });
                continue;
            }
            fields.push(FieldDescriptor {
                inner: Rc::new(FieldInner {
                    declaring_type,
                    name: spec.name,
                    value_type: spec.value_type,
                    annotations: spec.annotations,
                    visibility: spec.visibility,
                    accessor: spec.accessor,
                }),
            });
        }
        if let Some(ancestor) = builder.ancestor {
            let (inherited, inherited_errors) = ancestor();
            fields.extend(inherited);
            errors.extend(inherited_errors);
        }
        Self {
            type_token: declaring_type,
            fields,
            errors,
        }
    }

    #[must_use]
    pub fn type_token(&self) -> TypeToken {
        self.type_token
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Registration problems found while building the table.
    #[must_use]
    pub fn errors(&self) -> &[DiscoveryError] {
        &self.errors
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type", &self.type_token.short_name())
            .field("fields", &self.fields)
            .field("errors", &self.errors)
            .finish()
    }
}
