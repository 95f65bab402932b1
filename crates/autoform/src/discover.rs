#![forbid(unsafe_code)]

//! Field discovery: which fields of a source object get a row, in which order.

use std::any::Any;

use tracing::warn;

use crate::schema::{Bindable, FieldDescriptor, Schema};

/// Chooses the fields of a source object that a form binds.
pub trait FieldProvider {
    /// Fields of `schema` to bind on `source`, in layout order.
    ///
    /// `None` source yields no fields.
    fn provide(&self, schema: &Schema, source: Option<&dyn Any>) -> Vec<FieldDescriptor>;
}

/// Default provider: every registered field except those carrying
/// [`Annotation::NonVisual`], most-derived type first.
///
/// Fields whose cell cannot be reached on the source are logged and skipped;
/// the rest of the table is still returned.
///
/// [`Annotation::NonVisual`]: crate::schema::Annotation::NonVisual
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaFieldProvider;

impl FieldProvider for SchemaFieldProvider {
    fn provide(&self, schema: &Schema, source: Option<&dyn Any>) -> Vec<FieldDescriptor> {
        let Some(source) = source else {
            return Vec::new();
        };
        for err in schema.errors() {
            warn!(message = "form.discover.skip", error = %err);
        }
        schema
            .fields()
            .iter()
            .filter(|field| !field.is_non_visual())
            .filter(|field| match field.property(source) {
                Ok(_) => true,
                Err(err) => {
                    warn!(message = "form.discover.skip", field = field.name(), error = %err);
                    false
                }
            })
            .cloned()
            .collect()
    }
}

/// Wraps another provider with include/exclude lists of field names.
///
/// A non-empty include list keeps only the listed fields, in the listed
/// order. Excludes apply afterwards.
pub struct FilteredFieldProvider {
    inner: Box<dyn FieldProvider>,
    include: Vec<&'static str>,
    exclude: Vec<&'static str>,
}

impl FilteredFieldProvider {
    #[must_use]
    pub fn new(inner: impl FieldProvider + 'static) -> Self {
        Self {
            inner: Box::new(inner),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    #[must_use]
    pub fn include(mut self, names: impl IntoIterator<Item = &'static str>) -> Self {
        self.include.extend(names);
        self
    }

    #[must_use]
    pub fn exclude(mut self, names: impl IntoIterator<Item = &'static str>) -> Self {
        self.exclude.extend(names);
        self
    }
}

impl FieldProvider for FilteredFieldProvider {
    fn provide(&self, schema: &Schema, source: Option<&dyn Any>) -> Vec<FieldDescriptor> {
        let fields = self.inner.provide(schema, source);
        let selected: Vec<FieldDescriptor> = if self.include.is_empty() {
            fields
        } else {
            self.include
                .iter()
                .filter_map(|name| fields.iter().find(|f| f.name() == *name).cloned())
                .collect()
        };
        selected
            .into_iter()
            .filter(|f| !self.exclude.contains(&f.name()))
            .collect()
    }
}

/// Discover the bindable fields of `source` with the default provider.
#[must_use]
pub fn discover<T: Bindable>(source: Option<&T>) -> Vec<FieldDescriptor> {
    SchemaFieldProvider.provide(&Schema::of::<T>(), source.map(|s| s as &dyn Any))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilder;
    use autoform_reactive::Observable;

    struct Animal {
        name: Observable<String>,
        legs: Observable<i32>,
    }

    struct Dog {
        animal: Animal,
        good: Observable<bool>,
        chip: Observable<i64>,
        owner: Option<Observable<String>>,
    }

    impl Bindable for Animal {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.field("name", |a: &Animal| &a.name);
            schema.field("legs", |a: &Animal| &a.legs);
        }
    }

    impl Bindable for Dog {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.field("good", |d: &Dog| &d.good);
            schema.field("chip", |d: &Dog| &d.chip).non_visual();
            schema.optional_field("owner", |d: &Dog| d.owner.as_ref());
            schema.extends(|d: &Dog| &d.animal);
        }
    }

    fn dog(owner: Option<&str>) -> Dog {
        Dog {
            animal: Animal {
                name: Observable::new("Rex".into()),
                legs: Observable::new(4),
            },
            good: Observable::new(true),
            chip: Observable::new(1),
            owner: owner.map(|o| Observable::new(o.to_string())),
        }
    }

    fn names(fields: &[FieldDescriptor]) -> Vec<&'static str> {
        fields.iter().map(FieldDescriptor::name).collect()
    }

    #[test]
    fn none_source_yields_nothing() {
        assert!(discover::<Dog>(None).is_empty());
    }

    #[test]
    fn subclass_fields_first_excluding_non_visual() {
        let fields = discover(Some(&dog(Some("Ann"))));
        assert_eq!(names(&fields), ["good", "owner", "name", "legs"]);
    }

    #[test]
    fn unreachable_field_is_skipped_not_fatal() {
        let fields = discover(Some(&dog(None)));
        assert_eq!(names(&fields), ["good", "name", "legs"]);
    }

    #[test]
    fn include_list_defines_order() {
        let provider =
            FilteredFieldProvider::new(SchemaFieldProvider).include(["legs", "good", "chip"]);
        let source = dog(None);
        let fields = provider.provide(&Schema::of::<Dog>(), Some(&source));
        assert_eq!(names(&fields), ["legs", "good"]);
    }

    #[test]
    fn exclude_list_removes() {
        let provider = FilteredFieldProvider::new(SchemaFieldProvider).exclude(["name"]);
        let source = dog(Some("Ann"));
        let fields = provider.provide(&Schema::of::<Dog>(), Some(&source));
        assert_eq!(names(&fields), ["good", "owner", "legs"]);
    }
}
