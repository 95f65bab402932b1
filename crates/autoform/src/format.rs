#![forbid(unsafe_code)]

//! Number formatting and parsing strategy shared by the numeric delegates.
//!
//! All numeric controls of a [`DelegateFactory`] go through one
//! [`NumberFormat`], so locale and precision rules live in one place and can
//! be swapped wholesale.
//!
//! [`DelegateFactory`]: crate::factory::DelegateFactory

use std::fmt;
use std::num::IntErrorKind;

use crate::error::ParseError;
use crate::value::Value;

/// Numeric value family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumericKind {
    Int,
    Long,
    Double,
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "int",
            Self::Long => "long",
            Self::Double => "double",
        })
    }
}

/// A number of one of the supported families.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i32),
    Long(i64),
    Double(f64),
}

impl Number {
    #[must_use]
    pub fn kind(&self) -> NumericKind {
        match self {
            Self::Int(_) => NumericKind::Int,
            Self::Long(_) => NumericKind::Long,
            Self::Double(_) => NumericKind::Double,
        }
    }

    /// Numeric view of a [`Value`], if it is one.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(Self::Int(*v)),
            Value::Long(v) => Some(Self::Long(*v)),
            Value::Double(v) => Some(Self::Double(*v)),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(v) => f64::from(*v),
            #[allow(clippy::cast_precision_loss)]
            Self::Long(v) => *v as f64,
            Self::Double(v) => *v,
        }
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Int(v) => Self::Int(v),
            Number::Long(v) => Self::Long(v),
            Number::Double(v) => Self::Double(v),
        }
    }
}

/// Converts numbers to display text and back.
///
/// `parse` must never panic; text that does not denote a `kind` number is
/// reported as a [`ParseError`].
pub trait NumberFormat: Send + Sync + fmt::Debug {
    fn format(&self, number: Number) -> String;

    fn parse(&self, kind: NumericKind, text: &str) -> Result<Number, ParseError>;
}

/// Separator- and precision-configurable decimal format.
///
/// The default writes numbers the way Rust's `Display` does (`.` decimal
/// separator, no grouping, shortest round-trip fraction).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LocaleFormat {
    pub decimal_separator: char,
    pub grouping_separator: Option<char>,
    pub max_fraction_digits: Option<usize>,
}

impl Default for LocaleFormat {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: None,
            max_fraction_digits: None,
        }
    }
}

impl LocaleFormat {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    #[must_use]
    pub fn grouping_separator(mut self, separator: char) -> Self {
        self.grouping_separator = Some(separator);
        self
    }

    #[must_use]
    pub fn max_fraction_digits(mut self, digits: usize) -> Self {
        self.max_fraction_digits = Some(digits);
        self
    }

    fn localize(&self, plain: &str) -> String {
        let (sign, unsigned) = match plain.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", plain),
        };
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (unsigned, None),
        };
        let mut out = String::with_capacity(plain.len() + 4);
        out.push_str(sign);
        match self.grouping_separator {
            Some(sep) if int_part.bytes().all(|b| b.is_ascii_digit()) => {
                for (i, ch) in int_part.chars().enumerate() {
                    if i > 0 && (int_part.len() - i) % 3 == 0 {
                        out.push(sep);
                    }
                    out.push(ch);
                }
            }
            _ => out.push_str(int_part),
        }
        if let Some(frac) = frac_part {
            out.push(self.decimal_separator);
            out.push_str(frac);
        }
        out
    }

    fn delocalize(&self, text: &str) -> String {
        text.chars()
            .filter(|ch| Some(*ch) != self.grouping_separator)
            .map(|ch| if ch == self.decimal_separator { '.' } else { ch })
            .collect()
    }
}

fn int_error(kind: NumericKind, text: &str, err: &std::num::ParseIntError) -> ParseError {
    match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ParseError::OutOfRange {
            text: text.to_owned(),
            kind,
        },
        _ => ParseError::Invalid {
            text: text.to_owned(),
            kind,
        },
    }
}

impl NumberFormat for LocaleFormat {
    fn format(&self, number: Number) -> String {
        let plain = match number {
            Number::Int(v) => v.to_string(),
            Number::Long(v) => v.to_string(),
            Number::Double(v) if !v.is_finite() => return v.to_string(),
            Number::Double(v) => match self.max_fraction_digits {
                Some(digits) => {
                    let fixed = format!("{v:.digits$}");
                    if fixed.contains('.') {
                        fixed.trim_end_matches('0').trim_end_matches('.').to_owned()
                    } else {
                        fixed
                    }
                }
                None => v.to_string(),
            },
        };
        let plain = if plain == "-0" { "0".to_owned() } else { plain };
        self.localize(&plain)
    }

    fn parse(&self, kind: NumericKind, text: &str) -> Result<Number, ParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }
        let plain = self.delocalize(trimmed);
        let invalid = || ParseError::Invalid {
            text: trimmed.to_owned(),
            kind,
        };
        match kind {
            NumericKind::Int => plain
                .parse::<i32>()
                .map(Number::Int)
                .map_err(|e| int_error(kind, trimmed, &e)),
            NumericKind::Long => plain
                .parse::<i64>()
                .map(Number::Long)
                .map_err(|e| int_error(kind, trimmed, &e)),
            NumericKind::Double => {
                // Rust accepts "inf" and "NaN"; a form field does not.
                if !plain
                    .bytes()
                    .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
                {
                    return Err(invalid());
                }
                let value = plain.parse::<f64>().map_err(|_| invalid())?;
                if value.is_finite() {
                    Ok(Number::Double(value))
                } else {
                    Err(ParseError::OutOfRange {
                        text: trimmed.to_owned(),
                        kind,
                    })
                }
            }
        }
    }
}
