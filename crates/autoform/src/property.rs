#![forbid(unsafe_code)]

//! Type-erased views of a domain object's observable fields.
//!
//! Domain types keep their bindable state in [`Observable`] cells. A
//! [`Property`] is the uniform view of one such cell: it reads and writes
//! [`Value`]s and forwards change notifications, converting at the boundary.
//! Supported cells:
//!
//! | cell | declared type |
//! |---|---|
//! | `Observable<String>` | [`ValueType::Text`] |
//! | `Observable<bool>` | [`ValueType::Bool`] |
//! | `Observable<i32>` | [`ValueType::Int`] |
//! | `Observable<i64>` | [`ValueType::Long`] |
//! | `Observable<f64>` | [`ValueType::Double`] |
//! | `Observable<Option<E>>`, `E: FormEnum` | [`ValueType::Enum`] |
//! | [`CustomCell<T>`] | [`ValueType::Other`] |

use std::fmt;

use autoform_reactive::{Observable, Subscription};

use crate::error::ValueError;
use crate::value::{
    EnumConstant, EnumType, FormEnum, OpaqueValue, TypeToken, Value, ValueKind, ValueType,
};

/// Uniform read/write/observe access to one field cell.
pub trait Property {
    fn value_type(&self) -> ValueType;

    fn get(&self) -> Value;

    /// Write `value`. Returns whether the stored value changed.
    fn set(&self, value: Value) -> Result<bool, ValueError>;

    /// Run `f` with the new value after every change.
    fn subscribe(&self, f: Box<dyn Fn(&Value)>) -> Subscription;

    fn listener_count(&self) -> usize;
}

/// A cell type that can be registered as a field.
pub trait PropertyCell: Property + Clone + 'static {
    fn declared_type() -> ValueType;
}

fn mismatch(expected: ValueKind, found: &Value) -> ValueError {
    ValueError::TypeMismatch {
        expected,
        found: found.type_name(),
    }
}

macro_rules! primitive_cell {
    ($ty:ty, $variant:ident, $kind:ident) => {
        impl Property for Observable<$ty> {
            fn value_type(&self) -> ValueType {
                ValueType::$kind
            }

            fn get(&self) -> Value {
                Value::$variant(Observable::get(self))
            }

            fn set(&self, value: Value) -> Result<bool, ValueError> {
                match value {
                    Value::$variant(v) => Ok(Observable::set(self, v)),
                    other => Err(mismatch(ValueKind::$kind, &other)),
                }
            }

            fn subscribe(&self, f: Box<dyn Fn(&Value)>) -> Subscription {
                Observable::subscribe(self, move |v: &$ty| f(&Value::$variant(v.clone())))
            }

            fn listener_count(&self) -> usize {
                self.subscriber_count()
            }
        }

        impl PropertyCell for Observable<$ty> {
            fn declared_type() -> ValueType {
                ValueType::$kind
            }
        }
    };
}

primitive_cell!(bool, Bool, Bool);
primitive_cell!(i32, Int, Int);
primitive_cell!(i64, Long, Long);
primitive_cell!(f64, Double, Double);

// Text accepts `Null` as the empty string.
impl Property for Observable<String> {
    fn value_type(&self) -> ValueType {
        ValueType::Text
    }

    fn get(&self) -> Value {
        Value::Text(Observable::get(self))
    }

    fn set(&self, value: Value) -> Result<bool, ValueError> {
        match value {
            Value::Text(v) => Ok(Observable::set(self, v)),
            Value::Null => Ok(Observable::set(self, String::new())),
            other => Err(mismatch(ValueKind::Text, &other)),
        }
    }

    fn subscribe(&self, f: Box<dyn Fn(&Value)>) -> Subscription {
        Observable::subscribe(self, move |v: &String| f(&Value::Text(v.clone())))
    }

    fn listener_count(&self) -> usize {
        self.subscriber_count()
    }
}

impl PropertyCell for Observable<String> {
    fn declared_type() -> ValueType {
        ValueType::Text
    }
}

fn enum_value<E: FormEnum>(v: Option<E>) -> Value {
    v.map_or(Value::Null, |e| Value::Enum(EnumConstant::of(e)))
}

impl<E: FormEnum> Property for Observable<Option<E>> {
    fn value_type(&self) -> ValueType {
        ValueType::Enum(EnumType::of::<E>())
    }

    fn get(&self) -> Value {
        enum_value(Observable::get(self))
    }

    fn set(&self, value: Value) -> Result<bool, ValueError> {
        match value {
            Value::Null => Ok(Observable::set(self, None)),
            Value::Enum(c) => match c.to_enum::<E>() {
                Some(e) => Ok(Observable::set(self, Some(e))),
                None => Err(mismatch(ValueKind::Enum, &Value::Enum(c))),
            },
            other => Err(mismatch(ValueKind::Enum, &other)),
        }
    }

    fn subscribe(&self, f: Box<dyn Fn(&Value)>) -> Subscription {
        Observable::subscribe(self, move |v: &Option<E>| f(&enum_value(*v)))
    }

    fn listener_count(&self) -> usize {
        self.subscriber_count()
    }
}

impl<E: FormEnum> PropertyCell for Observable<Option<E>> {
    fn declared_type() -> ValueType {
        ValueType::Enum(EnumType::of::<E>())
    }
}

/// Adapter exposing an `Observable<T>` of an arbitrary type as a
/// [`ValueType::Other`] property.
///
/// Values cross the boundary as [`OpaqueValue`]s; reading clones the current
/// value into a fresh allocation.
pub struct CustomCell<T> {
    inner: Observable<T>,
}

impl<T> Clone for CustomCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for CustomCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomCell").field(&self.inner).finish()
    }
}

impl<T: Clone + PartialEq + 'static> CustomCell<T> {
    #[must_use]
    pub fn new(inner: Observable<T>) -> Self {
        Self { inner }
    }
}

impl<T: Clone + PartialEq + 'static> Property for CustomCell<T> {
    fn value_type(&self) -> ValueType {
        ValueType::Other(TypeToken::of::<T>())
    }

    fn get(&self) -> Value {
        Value::Other(OpaqueValue::new(self.inner.get()))
    }

    fn set(&self, value: Value) -> Result<bool, ValueError> {
        let typed = match &value {
            Value::Other(o) => o.downcast_ref::<T>().cloned(),
            _ => None,
        };
        match typed {
            Some(v) => Ok(self.inner.set(v)),
            None => Err(mismatch(ValueKind::Other, &value)),
        }
    }

    fn subscribe(&self, f: Box<dyn Fn(&Value)>) -> Subscription {
        self.inner
            .subscribe(move |v: &T| f(&Value::Other(OpaqueValue::new(v.clone()))))
    }

    fn listener_count(&self) -> usize {
        self.inner.subscriber_count()
    }
}

impl<T: Clone + PartialEq + 'static> PropertyCell for CustomCell<T> {
    fn declared_type() -> ValueType {
        ValueType::Other(TypeToken::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Size {
        Small,
        Large,
    }

    impl FormEnum for Size {
        fn constants() -> &'static [Self] {
            &[Self::Small, Self::Large]
        }

        fn name(self) -> &'static str {
            match self {
                Self::Small => "SMALL",
                Self::Large => "LARGE",
            }
        }
    }

    #[test]
    fn primitive_cells_convert() {
        let age = Observable::new(30i32);
        let prop: &dyn Property = &age;
        assert_eq!(prop.value_type(), ValueType::Int);
        assert_eq!(prop.get(), Value::Int(30));
        assert_eq!(prop.set(Value::Int(31)), Ok(true));
        assert_eq!(age.get(), 31);
        assert!(matches!(
            prop.set(Value::Long(1)),
            Err(ValueError::TypeMismatch { expected: ValueKind::Int, .. })
        ));
    }

    #[test]
    fn text_cell_accepts_null() {
        let name = Observable::new("Ada".to_string());
        let prop: &dyn Property = &name;
        assert_eq!(prop.set(Value::Null), Ok(true));
        assert_eq!(name.get(), "");
    }

    #[test]
    fn enum_cell_roundtrip() {
        let size = Observable::new(Some(Size::Small));
        let prop: &dyn Property = &size;
        assert_eq!(prop.get(), Value::Enum(EnumConstant::of(Size::Small)));
        prop.set(Value::Enum(EnumConstant::of(Size::Large))).expect("set");
        assert_eq!(size.get(), Some(Size::Large));
        prop.set(Value::Null).expect("set");
        assert_eq!(size.get(), None);
        assert_eq!(prop.get(), Value::Null);
    }

    #[test]
    fn enum_cell_rejects_foreign_constant() {
        let size = Observable::new(None::<Size>);
        let prop: &dyn Property = &size;
        let foreign = EnumConstant::new(TypeToken::of::<u8>(), 0, "X");
        assert!(prop.set(Value::Enum(foreign)).is_err());
    }

    #[test]
    fn subscriptions_forward_values() {
        let flag = Observable::new(false);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let prop: &dyn Property = &flag;
        let sub = prop.subscribe(Box::new(move |v| sink.borrow_mut().push(v.clone())));
        flag.set(true);
        assert_eq!(*seen.borrow(), vec![Value::Bool(true)]);
        assert_eq!(prop.listener_count(), 1);
        drop(sub);
        assert_eq!(prop.listener_count(), 0);
    }

    #[test]
    fn custom_cell_downcasts() {
        #[derive(Debug, Clone, PartialEq)]
        struct Point(i32, i32);

        let cell = CustomCell::new(Observable::new(Point(1, 2)));
        assert_eq!(cell.value_type(), ValueType::Other(TypeToken::of::<Point>()));
        let value = cell.get();
        let Value::Other(opaque) = &value else {
            panic!("expected opaque value");
        };
        assert_eq!(opaque.downcast_ref::<Point>(), Some(&Point(1, 2)));
        assert_eq!(cell.set(Value::Other(OpaqueValue::new(Point(3, 4)))), Ok(true));
        assert!(cell.set(Value::Int(1)).is_err());
    }
}
