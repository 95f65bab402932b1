#![forbid(unsafe_code)]

//! Headless form controls.
//!
//! Each control keeps its displayed state in [`Observable`] cells, so a
//! binding layer can read and write what the control shows and subscribe to
//! its change events without a rendering backend. Controls are cheap handles:
//! cloning one yields another view of the same control.
//!
//! Methods named after a user gesture (`type_text`, `toggle`, `choose`) are
//! ignored while the control is disabled. Programmatic setters always apply.
//!
//! [`Observable`]: autoform_reactive::Observable

pub mod check_box;
pub mod choice_box;
pub mod label;
pub mod node;
pub mod text_field;

pub use check_box::CheckBox;
pub use choice_box::ChoiceBox;
pub use label::Label;
pub use node::{Node, Widget};
pub use text_field::TextField;
