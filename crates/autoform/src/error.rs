//! Error types for discovery, binding, and node creation.

use thiserror::Error;

use crate::format::NumericKind;
use crate::value::ValueKind;

/// A registered field that could not be exposed for one source object.
///
/// Discovery logs these and skips the field; they never abort a form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("field {declaring_type}::{field} is not reachable on this source")]
    Inaccessible {
        declaring_type: &'static str,
        field: &'static str,
    },

    #[error("field {declaring_type}::{field} is registered more than once")]
    DuplicateField {
        declaring_type: &'static str,
        field: &'static str,
    },
}

/// A value that cannot be written into an element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch {
        expected: ValueKind,
        found: &'static str,
    },

    #[error("field {field} is read-only")]
    ReadOnly { field: &'static str },

    #[error("field {field} rejects value: {reason}")]
    Constraint { field: &'static str, reason: String },
}

/// Enumeration constants could not be listed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnumError {
    #[error("constants of {enum_type} unavailable: {reason}")]
    ConstantsUnavailable {
        enum_type: &'static str,
        reason: String,
    },
}

/// Text that does not denote a number of the requested kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("{text:?} is not a valid {kind}")]
    Invalid { text: String, kind: NumericKind },

    #[error("{text:?} is out of range for {kind}")]
    OutOfRange { text: String, kind: NumericKind },
}

/// A factory could not build its control.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeCreationError {
    #[error("field {field}: factory expects {expected}, element holds {found}")]
    ValueMismatch {
        field: &'static str,
        expected: ValueKind,
        found: &'static str,
    },

    #[error("field {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl NodeCreationError {
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// Field the failed node was meant for.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::ValueMismatch { field, .. } | Self::Invalid { field, .. } => field,
        }
    }
}

/// Form assembly failure under [`NodeErrorPolicy::Abort`].
///
/// [`NodeErrorPolicy::Abort`]: crate::config::NodeErrorPolicy::Abort
#[derive(Debug, Error)]
pub enum FormError {
    #[error("cannot build node for field {field}")]
    Node {
        field: &'static str,
        #[source]
        source: NodeCreationError,
    },
}

pub type Result<T> = std::result::Result<T, FormError>;
