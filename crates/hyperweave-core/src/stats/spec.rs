//! # Stat Specs and Registry
//!
//! A [`StatSpec`] is a stat name plus keyword parameters, detached from any
//! structure. It renders as `name` or `name(key=value, ...)`, and parses back
//! from the same text, so differently parametrized versions of one stat get
//! distinct names inside a composed record.
//!
//! Dispatch goes through a static table from name to `(applicability,
//! function)`. A name that is missing from the table, or that exists only for
//! the other collection, is [`HyperweaveError::UnknownStat`].

use super::edgestats;
use super::nodestats;
use super::value::StatValue;
use crate::network::HypergraphRead;
use crate::{AttrValue, EntityKind, HyperweaveError, Id};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Per-identifier results of one stat evaluation.
pub type StatMap = BTreeMap<Id, StatValue>;

/// Signature shared by every registered stat.
pub type StatFn = fn(&dyn HypergraphRead, &[Id], &StatSpec) -> Result<StatMap, HyperweaveError>;

// =============================================================================
// STAT SPEC
// =============================================================================

/// A stat name with its keyword parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct StatSpec {
    name: String,
    params: Vec<(String, AttrValue)>,
}

impl StatSpec {
    /// A spec without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Add or replace one parameter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn params(&self) -> &[(String, AttrValue)] {
        &self.params
    }

    /// Raw parameter value.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&AttrValue> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Non-negative integer parameter.
    pub fn param_usize(&self, key: &str) -> Result<Option<usize>, HyperweaveError> {
        match self.param(key) {
            None | Some(AttrValue::Null) => Ok(None),
            Some(value) => value
                .as_u64()
                .map(|v| Some(v as usize))
                .ok_or_else(|| self.bad_param(key, "a non-negative integer")),
        }
    }

    /// Numeric parameter.
    pub fn param_f64(&self, key: &str) -> Result<Option<f64>, HyperweaveError> {
        match self.param(key) {
            None | Some(AttrValue::Null) => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.bad_param(key, "a number")),
        }
    }

    /// String parameter.
    pub fn param_str(&self, key: &str) -> Result<Option<&str>, HyperweaveError> {
        match self.param(key) {
            None | Some(AttrValue::Null) => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| self.bad_param(key, "a string")),
        }
    }

    fn bad_param(&self, key: &str, expected: &str) -> HyperweaveError {
        HyperweaveError::InvalidOperation(format!(
            "parameter `{key}` of stat `{}` must be {expected}",
            self.name
        ))
    }

    /// Evaluate against `net` for the given identifiers of collection `kind`.
    ///
    /// Specs hold no reference to a structure; every call reads current state.
    pub fn eval(
        &self,
        net: &dyn HypergraphRead,
        kind: EntityKind,
        ids: &[Id],
    ) -> Result<StatMap, HyperweaveError> {
        let entry = lookup(&self.name, kind)?;
        (entry.func)(net, ids, self)
    }
}

fn render_value(value: &AttrValue) -> String {
    match value {
        AttrValue::String(s)
            if !s.is_empty()
                && s.chars().all(|c| c.is_alphanumeric() || c == '_')
                && !matches!(s.as_str(), "true" | "false" | "null")
                && s.parse::<f64>().is_err() =>
        {
            s.clone()
        }
        other => other.to_string(),
    }
}

impl fmt::Display for StatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.params.is_empty() {
            return Ok(());
        }
        let rendered: Vec<String> = self
            .params
            .iter()
            .map(|(k, v)| format!("{k}={}", render_value(v)))
            .collect();
        write!(f, "({})", rendered.join(", "))
    }
}

/// Split on commas that are not inside double quotes.
fn split_params(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quoted = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

impl FromStr for StatSpec {
    type Err = HyperweaveError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let malformed = || HyperweaveError::MalformedInput(format!("invalid stat spec `{text}`"));

        let (name, args) = match text.split_once('(') {
            Some((name, rest)) => (name.trim(), Some(rest.strip_suffix(')').ok_or_else(malformed)?)),
            None => (text, None),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(malformed());
        }

        let mut spec = Self::new(name);
        if let Some(args) = args.filter(|a| !a.trim().is_empty()) {
            for part in split_params(args) {
                let (key, raw) = part.split_once('=').ok_or_else(malformed)?;
                let (key, raw) = (key.trim(), raw.trim());
                if key.is_empty() {
                    return Err(malformed());
                }
                let value = serde_json::from_str::<AttrValue>(raw)
                    .unwrap_or_else(|_| AttrValue::String(raw.to_string()));
                spec = spec.with(key, value);
            }
        }
        Ok(spec)
    }
}

/// Anything that names a stat: a spec, or its textual form.
pub trait IntoStatSpec {
    fn into_stat_spec(self) -> Result<StatSpec, HyperweaveError>;
}

impl IntoStatSpec for StatSpec {
    fn into_stat_spec(self) -> Result<StatSpec, HyperweaveError> {
        Ok(self)
    }
}

impl IntoStatSpec for &StatSpec {
    fn into_stat_spec(self) -> Result<StatSpec, HyperweaveError> {
        Ok(self.clone())
    }
}

impl IntoStatSpec for &str {
    fn into_stat_spec(self) -> Result<StatSpec, HyperweaveError> {
        self.parse()
    }
}

impl IntoStatSpec for String {
    fn into_stat_spec(self) -> Result<StatSpec, HyperweaveError> {
        self.parse()
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// One registered stat.
#[derive(Debug, Clone, Copy)]
pub struct StatEntry {
    pub name: &'static str,
    pub applies_to: EntityKind,
    pub func: StatFn,
    pub summary: &'static str,
}

static REGISTRY: &[StatEntry] = &[
    StatEntry {
        name: "attrs",
        applies_to: EntityKind::Node,
        func: nodestats::attrs,
        summary: "node attribute `attr` (or the whole record), `missing` when absent",
    },
    StatEntry {
        name: "degree",
        applies_to: EntityKind::Node,
        func: nodestats::degree,
        summary: "number of edges, optionally of one `order` or summed by `weight`",
    },
    StatEntry {
        name: "average_neighbor_degree",
        applies_to: EntityKind::Node,
        func: nodestats::average_neighbor_degree,
        summary: "mean degree of the node's neighbors",
    },
    StatEntry {
        name: "clique_eigenvector_centrality",
        applies_to: EntityKind::Node,
        func: nodestats::clique_eigenvector_centrality,
        summary: "eigenvector centrality of the clique expansion",
    },
    StatEntry {
        name: "in_degree",
        applies_to: EntityKind::Node,
        func: nodestats::in_degree,
        summary: "number of edges whose head contains the node (directed only)",
    },
    StatEntry {
        name: "out_degree",
        applies_to: EntityKind::Node,
        func: nodestats::out_degree,
        summary: "number of edges whose tail contains the node (directed only)",
    },
    StatEntry {
        name: "attrs",
        applies_to: EntityKind::Edge,
        func: edgestats::attrs,
        summary: "edge attribute `attr` (or the whole record), `missing` when absent",
    },
    StatEntry {
        name: "order",
        applies_to: EntityKind::Edge,
        func: edgestats::order,
        summary: "size minus one, optionally counting only members of one `degree`",
    },
    StatEntry {
        name: "size",
        applies_to: EntityKind::Edge,
        func: edgestats::size,
        summary: "number of members, optionally counting only members of one `degree`",
    },
    StatEntry {
        name: "tail_size",
        applies_to: EntityKind::Edge,
        func: edgestats::tail_size,
        summary: "number of tail members (directed only)",
    },
    StatEntry {
        name: "head_size",
        applies_to: EntityKind::Edge,
        func: edgestats::head_size,
        summary: "number of head members (directed only)",
    },
];

/// Every registered stat.
#[must_use]
pub fn registry() -> &'static [StatEntry] {
    REGISTRY
}

/// Resolve a stat name for a collection.
pub fn lookup(name: &str, kind: EntityKind) -> Result<&'static StatEntry, HyperweaveError> {
    REGISTRY
        .iter()
        .find(|entry| entry.name == name && entry.applies_to == kind)
        .ok_or_else(|| HyperweaveError::UnknownStat(format!("{kind} stat `{name}`")))
}
