//! Scalar parameter values
//!
//! A `ParamValue` remembers the exact text it renders to. Numbers and booleans
//! are converted once, at construction; strings are kept verbatim so a value
//! such as `"0.0010"` reaches the command line untouched.
//!
//! Unquoted numbers in a config file are parsed as numbers first, so
//! `0.0010` is read as the float `0.001` and renders as `0.001`. Quote a
//! value to keep trailing zeros or any other exact spelling.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One candidate value of a parameter dimension, stored as its rendered literal
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParamValue(String);

impl ParamValue {
    /// Integer value, rendered in plain decimal
    #[must_use]
    pub fn int(value: i64) -> Self {
        Self(value.to_string())
    }

    /// Floating point value, rendered in shortest round-trip form with a
    /// decimal point always present and never in exponent notation
    /// (`0.0`, `0.1`, `0.00001`, `10000000000000000.0`)
    #[must_use]
    pub fn float(value: f64) -> Self {
        let mut text = value.to_string();
        if value.is_finite() && !text.contains('.') {
            text.push_str(".0");
        }
        Self(text)
    }

    /// Boolean value, rendered as lowercase `true`/`false`
    #[must_use]
    pub fn bool(value: bool) -> Self {
        Self(value.to_string())
    }

    /// Verbatim literal
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::literal(value)
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Untyped scalar as it appears in a config file
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawValue::deserialize(deserializer)? {
            RawValue::Bool(b) => Self::bool(b),
            RawValue::Int(i) => Self::int(i),
            RawValue::Float(x) => Self::float(x),
            RawValue::Text(s) => Self(s),
        })
    }
}
