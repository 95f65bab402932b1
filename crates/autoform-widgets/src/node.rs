#![forbid(unsafe_code)]

//! Type-erased handle to any control a form can hold.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::{CheckBox, ChoiceBox, Label, TextField};

/// A control that is not one of the built-in [`Node`] variants.
pub trait Widget: 'static {
    /// Short, stable name of the control kind (e.g. `"choice_box"`).
    fn kind(&self) -> &'static str;

    /// Whether user input is refused.
    fn is_disabled(&self) -> bool {
        false
    }

    /// Upcast for downcasting to the concrete control.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Clone + PartialEq + 'static> Widget for ChoiceBox<T> {
    fn kind(&self) -> &'static str {
        "choice_box"
    }

    fn is_disabled(&self) -> bool {
        ChoiceBox::is_disabled(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A control ready to be placed in a layout container.
#[derive(Clone)]
pub enum Node {
    Label(Label),
    TextField(TextField),
    CheckBox(CheckBox),
    Widget(Rc<dyn Widget>),
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => f.debug_tuple("Label").field(&label.text()).finish(),
            Self::TextField(field) => f.debug_tuple("TextField").field(&field.text()).finish(),
            Self::CheckBox(cb) => f.debug_tuple("CheckBox").field(&cb.is_selected()).finish(),
            Self::Widget(w) => f.debug_tuple("Widget").field(&w.kind()).finish(),
        }
    }
}

impl Node {
    /// Wrap a custom control.
    #[must_use]
    pub fn widget(widget: impl Widget) -> Self {
        Self::Widget(Rc::new(widget))
    }

    /// Short name of the control kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Label(_) => "label",
            Self::TextField(_) => "text_field",
            Self::CheckBox(_) => "check_box",
            Self::Widget(w) => w.kind(),
        }
    }

    /// Whether user input is refused. Labels never take input.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        match self {
            Self::Label(_) => true,
            Self::TextField(field) => field.is_disabled(),
            Self::CheckBox(cb) => cb.is_disabled(),
            Self::Widget(w) => w.is_disabled(),
        }
    }

    #[must_use]
    pub fn as_label(&self) -> Option<&Label> {
        match self {
            Self::Label(label) => Some(label),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text_field(&self) -> Option<&TextField> {
        match self {
            Self::TextField(field) => Some(field),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_check_box(&self) -> Option<&CheckBox> {
        match self {
            Self::CheckBox(cb) => Some(cb),
            _ => None,
        }
    }

    /// Downcast a [`Node::Widget`] to its concrete control.
    #[must_use]
    pub fn downcast_ref<W: Widget>(&self) -> Option<&W> {
        match self {
            Self::Widget(w) => w.as_any().downcast_ref::<W>(),
            _ => None,
        }
    }

    /// Shorthand for `downcast_ref::<ChoiceBox<T>>()`.
    #[must_use]
    pub fn as_choice_box<T: Clone + PartialEq + 'static>(&self) -> Option<&ChoiceBox<T>> {
        self.downcast_ref::<ChoiceBox<T>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(Node::Label(Label::new("x")).kind(), "label");
        assert_eq!(Node::TextField(TextField::new()).kind(), "text_field");
        assert_eq!(Node::CheckBox(CheckBox::new()).kind(), "check_box");
        assert_eq!(Node::widget(ChoiceBox::new(vec![1, 2])).kind(), "choice_box");
    }

    #[test]
    fn downcast_choice_box() {
        let node = Node::widget(ChoiceBox::new(vec!["a", "b"]));
        let cb = node.as_choice_box::<&'static str>().expect("choice box");
        cb.select(&"b");
        assert_eq!(cb.selected_index(), Some(1));
        assert!(node.as_choice_box::<u32>().is_none());
        assert!(node.as_text_field().is_none());
    }

    #[test]
    fn labels_are_inert() {
        assert!(Node::Label(Label::new("x")).is_disabled());
        assert!(!Node::TextField(TextField::new()).is_disabled());
    }

    #[test]
    fn debug_names_variant() {
        let dbg = format!("{:?}", Node::Label(Label::new("Age")));
        assert!(dbg.contains("Label"));
        assert!(dbg.contains("Age"));
    }
}
