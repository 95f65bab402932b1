#![forbid(unsafe_code)]

//! Form assembly configuration.

/// What a form does when a factory fails to build an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NodeErrorPolicy {
    /// Log the failure and show the unsupported-type placeholder instead.
    #[default]
    Placeholder,
    /// Dispose everything built so far and return the error.
    Abort,
}

/// How labels are derived from field names when no label annotation exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LabelStyle {
    /// The field name verbatim.
    #[default]
    FieldName,
    /// `first_name` and `firstName` both become `First name`.
    Humanized,
}

impl LabelStyle {
    #[must_use]
    pub fn apply(self, field: &str) -> String {
        match self {
            Self::FieldName => field.to_owned(),
            Self::Humanized => humanize(field),
        }
    }
}

fn humanize(field: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in field.chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    let mut out = words.join(" ");
    if let Some(first) = out.chars().next() {
        let upper: String = first.to_uppercase().collect();
        out.replace_range(..first.len_utf8(), &upper);
    }
    out
}

/// Options for [`FormBuilder`](crate::form::FormBuilder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FormConfig {
    pub node_errors: NodeErrorPolicy,
    pub labels: LabelStyle,
}

impl FormConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn node_errors(mut self, policy: NodeErrorPolicy) -> Self {
        self.node_errors = policy;
        self
    }

    #[must_use]
    pub fn labels(mut self, style: LabelStyle) -> Self {
        self.labels = style;
        self
    }
}
