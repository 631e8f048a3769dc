//! Stat values and their ordering.

use crate::AttrValue;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// One per-identifier stat result.
///
/// Counting stats produce `Int`, averaged or weighted stats produce `Float`,
/// attribute lookups produce `Attr` for anything that is not a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Int(i64),
    Float(f64),
    Attr(AttrValue),
}

impl StatValue {
    /// Convert an attribute value, turning JSON numbers into `Int`/`Float`.
    #[must_use]
    pub fn from_attr(value: AttrValue) -> Self {
        if let AttrValue::Number(number) = &value {
            if let Some(i) = number.as_i64() {
                return Self::Int(i);
            }
            if let Some(f) = number.as_f64() {
                return Self::Float(f);
            }
        }
        Self::Attr(value)
    }

    /// Numeric value, if any.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Attr(AttrValue::Number(n)) => n.as_f64(),
            Self::Attr(_) => None,
        }
    }

    /// Whether this is a missing attribute.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Attr(AttrValue::Null))
    }

    /// Whether the value is a whole number.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        match self {
            Self::Int(_) => true,
            Self::Float(f) => f.fract() == 0.0 && f.is_finite(),
            Self::Attr(AttrValue::Number(n)) => n.is_i64() || n.is_u64(),
            Self::Attr(_) => false,
        }
    }

    /// Partial order: numbers numerically, strings lexically, booleans with
    /// `false < true`. Anything else (null, arrays, objects, mixed kinds) is
    /// incomparable.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        if let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) {
            return a.partial_cmp(&b);
        }
        match (self, other) {
            (Self::Attr(AttrValue::String(a)), Self::Attr(AttrValue::String(b))) => Some(a.cmp(b)),
            (Self::Attr(AttrValue::Bool(a)), Self::Attr(AttrValue::Bool(b))) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Attr(AttrValue::String(s)) => f.write_str(s),
            Self::Attr(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for StatValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for StatValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<usize> for StatValue {
    fn from(value: usize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for StatValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for StatValue {
    fn from(value: &str) -> Self {
        Self::Attr(AttrValue::String(value.to_string()))
    }
}

impl From<AttrValue> for StatValue {
    fn from(value: AttrValue) -> Self {
        Self::from_attr(value)
    }
}
