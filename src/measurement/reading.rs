//! Scalar readings stored inside a subtype

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single typed value
///
/// Serialized untagged so that YAML scalars map directly onto the variant
/// that fits them (`true` → `Bool`, `550` → `Int`, `"1.29.0"` → `String`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Reading {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Reading::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Reading::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Reading::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to floats; other variants yield `None`
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Reading::Float(f) => Some(*f),
            Reading::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Bool(b) => write!(f, "{b}"),
            Reading::Int(i) => write!(f, "{i}"),
            Reading::Float(x) => write!(f, "{x}"),
            Reading::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Reading {
    fn from(value: &str) -> Self {
        Reading::String(value.to_string())
    }
}

impl From<String> for Reading {
    fn from(value: String) -> Self {
        Reading::String(value)
    }
}

impl From<bool> for Reading {
    fn from(value: bool) -> Self {
        Reading::Bool(value)
    }
}

impl From<i64> for Reading {
    fn from(value: i64) -> Self {
        Reading::Int(value)
    }
}

impl From<f64> for Reading {
    fn from(value: f64) -> Self {
        Reading::Float(value)
    }
}
