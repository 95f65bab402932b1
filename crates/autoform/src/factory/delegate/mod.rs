#![forbid(unsafe_code)]

//! Built-in node factories, one per value family.
//!
//! Every editor delegate follows the same shape:
//!
//! 1. check that the element holds the family it renders;
//! 2. create the control and show the element's current value;
//! 3. subscribe control→element (parse, check, write);
//! 4. subscribe element→control (update the display);
//! 5. hand both subscriptions to the node's [`Teardown`].
//!
//! Both listeners share one [`BindingGuard`], so neither direction re-enters
//! the other. After every control→element write the control is compared
//! with the element again: a rejected edit leaves the element unchanged, and
//! a source that normalizes the value from its own subscriber ends with a
//! different value than the one committed. Either way the control is put
//! back to the element's value.
//!
//! [`Teardown`]: crate::disposable::Teardown
//! [`BindingGuard`]: crate::binding::BindingGuard

mod boolean;
mod choice;
mod label;
mod numeric;
mod text;
mod unsupported;

pub use boolean::BooleanDelegate;
pub use choice::EnumDelegate;
pub use label::LabelFactory;
pub use numeric::NumericDelegate;
pub use text::TextDelegate;
pub use unsupported::UnsupportedDelegate;

use std::fmt::Display;

use tracing::debug;

use crate::controller::ElementController;
use crate::element::ObservableElement;
use crate::error::NodeCreationError;
use crate::value::{Value, ValueKind};

fn expect_kind(element: &ObservableElement, expected: ValueKind) -> Result<(), NodeCreationError> {
    let value_type = element.value_type();
    if value_type.kind() == expected {
        Ok(())
    } else {
        Err(NodeCreationError::ValueMismatch {
            field: element.name(),
            expected,
            found: value_type.token().short_name(),
        })
    }
}

/// Show the element's value again if it no longer equals `sent`.
fn resync(controller: &ElementController, sent: &Value, show: impl FnOnce(&Value)) {
    let current = controller.element().value();
    if current != *sent {
        show(&current);
    }
}

fn log_rejected(controller: &ElementController, error: &dyn Display) {
    debug!(
        message = "binding.rejected",
        field = controller.element().name(),
        error = %error,
    );
}
