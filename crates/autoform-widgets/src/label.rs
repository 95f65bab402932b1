#![forbid(unsafe_code)]

//! Static text control.

use autoform_reactive::{Observable, Subscription};

/// A read-only line of text.
#[derive(Debug, Clone, Default)]
pub struct Label {
    text: Observable<String>,
}

impl Label {
    /// Create a label showing `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Observable::new(text.into()),
        }
    }

    /// Displayed text.
    #[must_use]
    pub fn text(&self) -> String {
        self.text.get()
    }

    /// Replace the displayed text.
    pub fn set_text(&self, text: impl Into<String>) {
        self.text.set(text.into());
    }

    /// Observe text changes.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_text_changed(&self, f: impl Fn(&String) + 'static) -> Subscription {
        self.text.subscribe(f)
    }

    /// Number of listeners attached to the text.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.text.subscriber_count()
    }
}
