//! # Core Type Definitions
//!
//! This module contains the shared vocabulary of the crate:
//! - Node and edge identifiers (`Id`)
//! - The collection tag used by lookups and stats (`EntityKind`)
//! - Attribute values and records (`AttrValue`, `Attrs`)
//! - Error types (`HyperweaveError`)
//!
//! ## Ordering Guarantees
//!
//! `Id` implements `Ord` with every integer identifier sorting before every
//! string identifier. All stores key their `BTreeMap`/`BTreeSet` collections on
//! this order, so iteration over nodes, edges and members is deterministic.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a node or an edge.
///
/// Identifiers are either integers or strings. Integer identifiers take part in
/// automatic allocation (see [`crate::id_alloc::IdAllocator`]); string
/// identifiers never perturb the allocator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// Integer identifier.
    Int(i64),
    /// String identifier.
    Str(String),
}

impl Id {
    /// Get the integer value, if this is an integer identifier.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Str(_) => None,
        }
    }

    /// Get the string value, if this is a string identifier.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Int(_) => None,
            Self::Str(s) => Some(s),
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Id {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Id {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<usize> for Id {
    fn from(value: usize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&Id> for Id {
    fn from(value: &Id) -> Self {
        value.clone()
    }
}

/// Which identifier collection an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// The node collection.
    Node,
    /// The edge collection.
    Edge,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Edge => f.write_str("edge"),
        }
    }
}

// =============================================================================
// ATTRIBUTES
// =============================================================================

/// A single attribute value. Any JSON-representable value is accepted.
pub type AttrValue = serde_json::Value;

/// An attribute record: string keys to values, in insertion order.
pub type Attrs = serde_json::Map<String, AttrValue>;

/// Build an attribute record from key/value pairs.
pub fn attrs<I, K, V>(pairs: I) -> Attrs
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<AttrValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while building or querying a structure.
///
/// - Not-found and invalid-operation conditions always reach the caller
/// - Duplicate identifiers are NOT errors: they are logged and skipped
/// - Malformed input aborts the whole import; partial structures are dropped
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HyperweaveError {
    /// The requested node does not exist.
    #[error("Node not found: {0}")]
    NodeNotFound(Id),

    /// The requested edge does not exist.
    #[error("Edge not found: {0}")]
    EdgeNotFound(Id),

    /// The identifier exists in the structure but not in the queried bunch.
    #[error("Identifier {0} is not in this bunch")]
    IdNotInBunch(Id),

    /// No stat with this name applies to the queried collection.
    #[error("Unknown stat: {0}")]
    UnknownStat(String),

    /// A mutating call reached a frozen structure.
    #[error("Structure is frozen and cannot be modified")]
    Frozen,

    /// The operation is not valid for this structure or these arguments.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// The filter mode string is not one of the supported modes.
    #[error("Invalid filter mode: {0}")]
    InvalidFilterMode(String),

    /// Composed stats were bound to different bunches.
    #[error("Stat collision: {0}")]
    StatCollision(String),

    /// Parallel parameter lists have different lengths.
    #[error("Length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// Input data could not be parsed or coerced.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl HyperweaveError {
    /// Not-found error for an identifier of the given collection.
    #[must_use]
    pub fn not_found(kind: EntityKind, id: Id) -> Self {
        match kind {
            EntityKind::Node => Self::NodeNotFound(id),
            EntityKind::Edge => Self::EdgeNotFound(id),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_sort_before_strings() {
        let mut ids = vec![Id::from("a"), Id::from(3), Id::from("B"), Id::from(-1)];
        ids.sort();
        assert_eq!(
            ids,
            vec![Id::from(-1), Id::from(3), Id::from("B"), Id::from("a")]
        );
    }

    #[test]
    fn id_serializes_untagged() {
        let json = serde_json::to_string(&vec![Id::from(1), Id::from("x")]).expect("serialize");
        assert_eq!(json, r#"[1,"x"]"#);

        let back: Vec<Id> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, vec![Id::from(1), Id::from("x")]);
    }

    #[test]
    fn not_found_names_collection() {
        let err = HyperweaveError::not_found(EntityKind::Edge, Id::from(7));
        assert_eq!(err, HyperweaveError::EdgeNotFound(Id::from(7)));
        assert_eq!(err.to_string(), "Edge not found: 7");
    }

    #[test]
    fn attrs_builder_keeps_order() {
        let record = attrs([("b", 1), ("a", 2)]);
        let keys: Vec<_> = record.keys().cloned().collect();
        assert_eq!(keys, vec!["b".to_string(), "a".to_string()]);
    }
}
