#![forbid(unsafe_code)]

//! Drop-down selection over a fixed list of items.

use std::fmt;

use autoform_reactive::{Observable, Subscription};

/// A single-selection control.
///
/// The selection is an index into the current item list, or `None`.
/// Replacing the items clears a selection that no longer points at an equal
/// item.
#[derive(Clone)]
pub struct ChoiceBox<T> {
    items: Observable<Vec<T>>,
    selected: Observable<Option<usize>>,
    disabled: Observable<bool>,
}

impl<T: fmt::Debug + Clone + PartialEq + 'static> fmt::Debug for ChoiceBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChoiceBox")
            .field("items", &self.items.get())
            .field("selected", &self.selected.get())
            .field("disabled", &self.disabled.get())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Default for ChoiceBox<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Clone + PartialEq + 'static> ChoiceBox<T> {
    /// Create a choice box over `items` with nothing selected.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Observable::new(items),
            selected: Observable::new(None),
            disabled: Observable::new(false),
        }
    }

    /// Current items.
    #[must_use]
    pub fn items(&self) -> Vec<T> {
        self.items.get()
    }

    /// Replace the item list.
    pub fn set_items(&self, items: Vec<T>) {
        let keep = self
            .selected_item()
            .and_then(|item| items.iter().position(|candidate| *candidate == item));
        self.items.set(items);
        self.selected.set(keep);
    }

    /// Selected index, if any.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected.get()
    }

    /// Selected item, if any.
    #[must_use]
    pub fn selected_item(&self) -> Option<T> {
        let index = self.selected.get()?;
        self.items.with(|items| items.get(index).cloned())
    }

    /// Select the first item equal to `item`.
    ///
    /// Returns `false` if no such item exists; the selection is left as is.
    pub fn select(&self, item: &T) -> bool {
        let position = self.items.with(|items| items.iter().position(|c| c == item));
        match position {
            Some(index) => {
                self.selected.set(Some(index));
                true
            }
            None => false,
        }
    }

    /// Select by index programmatically. Out-of-range indices are ignored.
    pub fn select_index(&self, index: usize) -> bool {
        if index >= self.items.with(Vec::len) {
            return false;
        }
        self.selected.set(Some(index))
    }

    /// Pick the item at `index` as a user would.
    ///
    /// Returns `false` if the box is disabled, the index is out of range, or
    /// the item is already selected.
    pub fn choose(&self, index: usize) -> bool {
        if self.disabled.get() {
            return false;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(message = "choice_box.choose", index);
        self.select_index(index)
    }

    /// Clear the selection.
    pub fn clear_selection(&self) -> bool {
        self.selected.set(None)
    }

    /// Observe selection changes. The callback receives the newly selected
    /// item, or `None` when the selection is cleared.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_selection_changed(&self, f: impl Fn(Option<T>) + 'static) -> Subscription {
        let items = self.items.clone();
        self.selected.subscribe(move |index| {
            let item = index.and_then(|i| items.with(|items| items.get(i).cloned()));
            f(item);
        })
    }

    /// Enable or disable user picks.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    /// Whether user picks are refused.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    /// Number of listeners attached to the selection.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.selected.subscriber_count()
    }
}

impl<T: Clone + PartialEq + fmt::Display + 'static> ChoiceBox<T> {
    /// Display text of every item, in order.
    #[must_use]
    pub fn item_texts(&self) -> Vec<String> {
        self.items
            .with(|items| items.iter().map(ToString::to_string).collect())
    }
}
