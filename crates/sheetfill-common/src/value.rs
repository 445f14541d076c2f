use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A scalar that can be written into, or read back out of, a single cell.
///
/// Fill payloads only ever produce `Int`, `Number`, `Text` and `Boolean`;
/// `Empty` is what a backend reports for a blank cell.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Number(f64),
    Text(String),
    Boolean(bool),
    Empty,
}

impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            LiteralValue::Int(i) => i.hash(state),
            LiteralValue::Number(n) => n.to_bits().hash(state),
            LiteralValue::Text(s) => s.hash(state),
            LiteralValue::Boolean(b) => b.hash(state),
            LiteralValue::Empty => state.write_u8(0),
        }
    }
}

impl Eq for LiteralValue {}

impl Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Int(i) => write!(f, "{i}"),
            LiteralValue::Number(n) => write!(f, "{n}"),
            LiteralValue::Text(s) => write!(f, "{s}"),
            LiteralValue::Boolean(b) => write!(f, "{b}"),
            LiteralValue::Empty => write!(f, ""),
        }
    }
}

impl LiteralValue {
    /// The value written for absent/null inputs.
    pub fn blank_text() -> Self {
        LiteralValue::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, LiteralValue::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            LiteralValue::Int(i) => Some(*i as f64),
            LiteralValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            LiteralValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        LiteralValue::Int(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Number(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Boolean(value)
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::Text(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::Text(value.to_string())
    }
}
