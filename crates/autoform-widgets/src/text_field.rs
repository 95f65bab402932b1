#![forbid(unsafe_code)]

//! Single-line text input.

use autoform_reactive::{Observable, Subscription};

/// Editable single-line text.
///
/// [`type_text`](Self::type_text) models a user edit and is refused while the
/// field is disabled; [`set_text`](Self::set_text) is the programmatic path.
/// Both fire the same change event, as a toolkit text property would.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    text: Observable<String>,
    disabled: Observable<bool>,
}

impl TextField {
    /// Create an empty, enabled field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a field showing `text`.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        let field = Self::new();
        field.text.set(text.into());
        field
    }

    /// Displayed text.
    #[must_use]
    pub fn text(&self) -> String {
        self.text.get()
    }

    /// Replace the displayed text programmatically.
    pub fn set_text(&self, text: impl Into<String>) -> bool {
        self.text.set(text.into())
    }

    /// Replace the text as if the user had typed it.
    ///
    /// Returns `false` if the field is disabled or the text is unchanged.
    pub fn type_text(&self, text: impl Into<String>) -> bool {
        if self.is_disabled() {
            return false;
        }
        let text = text.into();
        #[cfg(feature = "tracing")]
        tracing::trace!(message = "text_field.edit", len = text.len());
        self.text.set(text)
    }

    /// Observe text changes from either path.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_text_changed(&self, f: impl Fn(&String) + 'static) -> Subscription {
        self.text.subscribe(f)
    }

    /// Enable or disable user edits.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    /// Whether user edits are refused.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    /// Number of listeners attached to the text.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.text.subscriber_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn typing_updates_text() {
        let field = TextField::new();
        assert!(field.type_text("hello"));
        assert_eq!(field.text(), "hello");
        assert!(!field.type_text("hello"));
    }

    #[test]
    fn disabled_field_refuses_typing() {
        let field = TextField::with_text("fixed");
        field.set_disabled(true);
        assert!(!field.type_text("edited"));
        assert_eq!(field.text(), "fixed");
        assert!(field.set_text("programmatic"));
        assert_eq!(field.text(), "programmatic");
    }

    #[test]
    fn both_paths_fire_change_event() {
        let field = TextField::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = field.on_text_changed(move |_| h.set(h.get() + 1));
        field.type_text("a");
        field.set_text("b");
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn clones_share_state() {
        let field = TextField::new();
        let other = field.clone();
        other.type_text("shared");
        assert_eq!(field.text(), "shared");
    }
}
