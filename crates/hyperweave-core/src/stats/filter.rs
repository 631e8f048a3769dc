//! Filter modes shared by `filterby` and `filterby_attr`.

use super::value::StatValue;
use crate::HyperweaveError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparison applied to each stat value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    Eq,
    Neq,
    Lt,
    Gt,
    Leq,
    Geq,
    /// Inclusive on both ends; needs a [`FilterArg::Range`].
    Between,
}

impl FromStr for FilterMode {
    type Err = HyperweaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Self::Eq),
            "neq" => Ok(Self::Neq),
            "lt" => Ok(Self::Lt),
            "gt" => Ok(Self::Gt),
            "leq" => Ok(Self::Leq),
            "geq" => Ok(Self::Geq),
            "between" => Ok(Self::Between),
            other => Err(HyperweaveError::InvalidFilterMode(other.to_string())),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Lt => "lt",
            Self::Gt => "gt",
            Self::Leq => "leq",
            Self::Geq => "geq",
            Self::Between => "between",
        })
    }
}

/// The value a filter compares against.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterArg {
    Value(StatValue),
    Range(StatValue, StatValue),
}

macro_rules! filter_arg_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FilterArg {
                fn from(value: $ty) -> Self {
                    Self::Value(StatValue::from(value))
                }
            }
        )*
    };
}

filter_arg_from!(i32, i64, usize, f64, &str, crate::AttrValue);

impl From<StatValue> for FilterArg {
    fn from(value: StatValue) -> Self {
        Self::Value(value)
    }
}

impl FilterArg {
    /// Inclusive range argument for [`FilterMode::Between`].
    pub fn range(lo: impl Into<StatValue>, hi: impl Into<StatValue>) -> Self {
        Self::Range(lo.into(), hi.into())
    }
}

impl FilterMode {
    /// Check that `arg` has the shape this mode needs.
    pub fn check(self, arg: &FilterArg) -> Result<(), HyperweaveError> {
        match (self, arg) {
            (Self::Between, FilterArg::Value(_)) => Err(HyperweaveError::InvalidOperation(
                "`between` needs a two-valued range".to_string(),
            )),
            (Self::Between, FilterArg::Range(..)) | (_, FilterArg::Value(_)) => Ok(()),
            (mode, FilterArg::Range(..)) => Err(HyperweaveError::InvalidOperation(format!(
                "`{mode}` needs a single value, not a range"
            ))),
        }
    }

    /// Whether `value` passes. Incomparable values only pass `neq`.
    pub fn matches(self, value: &StatValue, arg: &FilterArg) -> Result<bool, HyperweaveError> {
        self.check(arg)?;
        let passes = match arg {
            FilterArg::Range(lo, hi) => {
                matches!(
                    value.compare(lo),
                    Some(Ordering::Greater | Ordering::Equal)
                ) && matches!(value.compare(hi), Some(Ordering::Less | Ordering::Equal))
            }
            FilterArg::Value(target) => match (self, value.compare(target)) {
                (Self::Neq, ord) => ord != Some(Ordering::Equal),
                (_, None) => false,
                (Self::Eq, Some(ord)) => ord == Ordering::Equal,
                (Self::Lt, Some(ord)) => ord == Ordering::Less,
                (Self::Gt, Some(ord)) => ord == Ordering::Greater,
                (Self::Leq, Some(ord)) => ord != Ordering::Greater,
                (Self::Geq, Some(ord)) => ord != Ordering::Less,
                (Self::Between, Some(_)) => false,
            },
        };
        Ok(passes)
    }
}
