#![forbid(unsafe_code)]

//! Two-state check box.

use autoform_reactive::{Observable, Subscription};

/// A check box with a selected flag.
#[derive(Debug, Clone, Default)]
pub struct CheckBox {
    selected: Observable<bool>,
    disabled: Observable<bool>,
}

impl CheckBox {
    /// Create an unchecked, enabled check box.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the box is checked.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected.get()
    }

    /// Set the checked state programmatically.
    pub fn set_selected(&self, selected: bool) -> bool {
        self.selected.set(selected)
    }

    /// Flip the checked state as a user click would.
    ///
    /// Returns `false` if the box is disabled.
    pub fn toggle(&self) -> bool {
        if self.is_disabled() {
            return false;
        }
        let next = !self.selected.get();
        #[cfg(feature = "tracing")]
        tracing::trace!(message = "check_box.toggle", selected = next);
        self.selected.set(next)
    }

    /// Observe checked-state changes.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_selected_changed(&self, f: impl Fn(&bool) + 'static) -> Subscription {
        self.selected.subscribe(f)
    }

    /// Enable or disable user clicks.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    /// Whether clicks are refused.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    /// Number of listeners attached to the checked state.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.selected.subscriber_count()
    }
}
