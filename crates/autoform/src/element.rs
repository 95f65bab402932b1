#![forbid(unsafe_code)]

//! Observable elements: one discovered field of one source object.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use autoform_reactive::Subscription;

use crate::error::{DiscoveryError, ValueError};
use crate::property::Property;
use crate::schema::FieldDescriptor;
use crate::value::{Value, ValueType};

/// A bound field cell: descriptor plus a live handle to the source object's
/// observable.
///
/// Cloning shares the handle; writes through any clone reach the source
/// object and every subscriber. A form creates exactly one element per
/// field.
#[derive(Clone)]
pub struct ObservableElement {
    descriptor: FieldDescriptor,
    property: Rc<dyn Property>,
}

impl ObservableElement {
    /// Bind `descriptor` to its cell on `source`.
    pub fn bind(source: &dyn Any, descriptor: FieldDescriptor) -> Result<Self, DiscoveryError> {
        let property = descriptor.property(source)?;
        Ok(Self {
            descriptor,
            property,
        })
    }

    #[must_use]
    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.descriptor.name()
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.descriptor.value_type()
    }

    /// Current value of the underlying cell.
    #[must_use]
    pub fn value(&self) -> Value {
        self.property.get()
    }

    /// Write `value` into the source object's cell.
    ///
    /// Returns `Ok(false)` when the value was already current; subscribers
    /// are not notified in that case.
    pub fn set_value(&self, value: Value) -> Result<bool, ValueError> {
        self.property.set(value)
    }

    /// Observe every change, from the source object or from a control.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, f: impl Fn(&Value) + 'static) -> Subscription {
        self.property.subscribe(Box::new(f))
    }

    /// Live listeners on the underlying cell, including ones registered by
    /// the domain object itself.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.property.listener_count()
    }
}

impl fmt::Debug for ObservableElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableElement")
            .field("field", &self.descriptor.name())
            .field("value", &self.property.get())
            .finish()
    }
}
