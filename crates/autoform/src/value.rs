#![forbid(unsafe_code)]

//! Type tokens, declared value types and the type-erased [`Value`].
//!
//! Every bindable field declares a [`ValueType`]. The built-in kinds (text,
//! boolean, the three numeric families and enumerations) get dedicated
//! controls; anything else is [`ValueType::Other`] and only renders through a
//! factory registered by the embedding application.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::error::EnumError;

/// Runtime identity of a Rust type, with its name for display.
///
/// Equality and hashing use the `TypeId` only.
#[derive(Clone, Copy)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
}

impl TypeToken {
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path (generic arguments are kept).
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        let head_end = self.name.find('<').unwrap_or(self.name.len());
        let start = self.name[..head_end].rfind("::").map_or(0, |i| i + 2);
        &self.name[start..]
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeToken({})", self.name)
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Coarse value family, used for handler matching and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Bool,
    Int,
    Long,
    Double,
    Enum,
    Other,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Long => "long",
            Self::Double => "double",
            Self::Enum => "enum",
            Self::Other => "other",
        })
    }
}

/// An enumeration a field can be bound to.
///
/// Implemented for fieldless enums by listing their variants in declaration
/// order. The position in [`constants`](Self::constants) is the ordinal.
pub trait FormEnum: Copy + PartialEq + 'static {
    fn constants() -> &'static [Self];

    fn name(self) -> &'static str;
}

/// Lists the constants of an enumeration type.
pub type ConstantsProvider = fn() -> Result<Vec<EnumConstant>, EnumError>;

/// Declared enumeration type of a field.
#[derive(Clone, Copy)]
pub struct EnumType {
    token: TypeToken,
    constants: ConstantsProvider,
}

fn form_enum_constants<E: FormEnum>() -> Result<Vec<EnumConstant>, EnumError> {
    Ok(E::constants().iter().map(|e| EnumConstant::of(*e)).collect())
}

impl EnumType {
    #[must_use]
    pub fn of<E: FormEnum>() -> Self {
        Self {
            token: TypeToken::of::<E>(),
            constants: form_enum_constants::<E>,
        }
    }

    /// An enumeration whose constants come from a fallible source, such as a
    /// table loaded at runtime.
    #[must_use]
    pub fn with_provider(token: TypeToken, constants: ConstantsProvider) -> Self {
        Self { token, constants }
    }

    #[must_use]
    pub fn token(&self) -> TypeToken {
        self.token
    }

    /// All constants in ordinal order.
    pub fn constants(&self) -> Result<Vec<EnumConstant>, EnumError> {
        (self.constants)()
    }
}

impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl Eq for EnumType {}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EnumType").field(&self.token.name()).finish()
    }
}

/// Declared value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Bool,
    Int,
    Long,
    Double,
    Enum(EnumType),
    Other(TypeToken),
}

impl ValueType {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text => ValueKind::Text,
            Self::Bool => ValueKind::Bool,
            Self::Int => ValueKind::Int,
            Self::Long => ValueKind::Long,
            Self::Double => ValueKind::Double,
            Self::Enum(_) => ValueKind::Enum,
            Self::Other(_) => ValueKind::Other,
        }
    }

    /// Token of the Rust type holding the value.
    #[must_use]
    pub fn token(&self) -> TypeToken {
        match self {
            Self::Text => TypeToken::of::<String>(),
            Self::Bool => TypeToken::of::<bool>(),
            Self::Int => TypeToken::of::<i32>(),
            Self::Long => TypeToken::of::<i64>(),
            Self::Double => TypeToken::of::<f64>(),
            Self::Enum(e) => e.token(),
            Self::Other(token) => *token,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum(e) => write!(f, "{}", e.token()),
            Self::Other(token) => write!(f, "{token}"),
            other => write!(f, "{}", other.kind()),
        }
    }
}

/// One constant of an enumeration, detached from its Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumConstant {
    owner: TypeToken,
    ordinal: usize,
    name: &'static str,
}

impl EnumConstant {
    #[must_use]
    pub fn new(owner: TypeToken, ordinal: usize, name: &'static str) -> Self {
        Self {
            owner,
            ordinal,
            name,
        }
    }

    /// Erase a typed constant.
    #[must_use]
    pub fn of<E: FormEnum>(value: E) -> Self {
        let ordinal = E::constants()
            .iter()
            .position(|c| *c == value)
            .unwrap_or(usize::MAX);
        Self::new(TypeToken::of::<E>(), ordinal, value.name())
    }

    /// Recover the typed constant, if this one belongs to `E`.
    #[must_use]
    pub fn to_enum<E: FormEnum>(&self) -> Option<E> {
        if self.owner != TypeToken::of::<E>() {
            return None;
        }
        E::constants().get(self.ordinal).copied()
    }

    #[must_use]
    pub fn owner(&self) -> TypeToken {
        self.owner
    }

    #[must_use]
    pub const fn ordinal(&self) -> usize {
        self.ordinal
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for EnumConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A value of a type the built-in kinds do not cover.
///
/// Two opaque values are equal only if they share the same allocation.
#[derive(Clone)]
pub struct OpaqueValue {
    token: TypeToken,
    data: Rc<dyn Any>,
}

impl OpaqueValue {
    #[must_use]
    pub fn new<T: 'static>(value: T) -> Self {
        Self {
            token: TypeToken::of::<T>(),
            data: Rc::new(value),
        }
    }

    #[must_use]
    pub fn token(&self) -> TypeToken {
        self.token
    }

    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }
}

impl PartialEq for OpaqueValue {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token && Rc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OpaqueValue").field(&self.token.name()).finish()
    }
}

/// A field value at the type-erased boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    Enum(EnumConstant),
    Other(OpaqueValue),
}

impl Value {
    /// Value family, `None` for [`Value::Null`].
    #[must_use]
    pub fn kind(&self) -> Option<ValueKind> {
        Some(match self {
            Self::Null => return None,
            Self::Text(_) => ValueKind::Text,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Long(_) => ValueKind::Long,
            Self::Double(_) => ValueKind::Double,
            Self::Enum(_) => ValueKind::Enum,
            Self::Other(_) => ValueKind::Other,
        })
    }

    /// Short description for error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Double(_) => "double",
            Self::Enum(c) => c.owner().short_name(),
            Self::Other(o) => o.token().short_name(),
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<EnumConstant> for Value {
    fn from(value: EnumConstant) -> Self {
        Self::Enum(value)
    }
}
