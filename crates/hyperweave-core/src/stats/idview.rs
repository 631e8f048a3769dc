//! # Bunches and Bound Stats
//!
//! An [`IdView`] is a bunch: the node or edge identifiers of a structure,
//! either all of them (read afresh on every call) or a filtered subset.
//! Binding a stat to a bunch gives an [`IdStat`]; nothing is computed until a
//! value is read, and every read re-runs the stat, so results always reflect
//! the structure at that moment.

use super::filter::{FilterArg, FilterMode};
use super::spec::{IntoStatSpec, StatMap, StatSpec, lookup};
use super::value::StatValue;
use crate::algorithms::{maximal_edges, neighbors};
use crate::network::HypergraphRead;
use crate::primitives::{DEFAULT_HIST_BINS, MAX_UNIT_HIST_BINS};
use crate::{AttrValue, EntityKind, HyperweaveError, Id};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// ID VIEW
// =============================================================================

/// The node or edge identifiers of a structure, optionally filtered.
#[derive(Clone)]
pub struct IdView<'a> {
    net: &'a dyn HypergraphRead,
    kind: EntityKind,
    ids: Option<BTreeSet<Id>>,
}

impl std::fmt::Debug for IdView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdView")
            .field("kind", &self.kind)
            .field("ids", &self.ids())
            .finish()
    }
}

impl<'a> IdView<'a> {
    /// Every identifier of `kind`.
    #[must_use]
    pub fn new(net: &'a dyn HypergraphRead, kind: EntityKind) -> Self {
        Self {
            net,
            kind,
            ids: None,
        }
    }

    /// An explicit bunch. Every identifier must exist in `net`.
    pub fn from_ids<I, N>(
        net: &'a dyn HypergraphRead,
        kind: EntityKind,
        ids: I,
    ) -> Result<Self, HyperweaveError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Id>,
    {
        let ids: BTreeSet<Id> = ids.into_iter().map(Into::into).collect();
        let exists = |id: &Id| match kind {
            EntityKind::Node => net.has_node(id),
            EntityKind::Edge => net.has_edge(id),
        };
        if let Some(missing) = ids.iter().find(|id| !exists(id)) {
            return Err(HyperweaveError::not_found(kind, missing.clone()));
        }
        Ok(Self {
            net,
            kind,
            ids: Some(ids),
        })
    }

    fn with_ids(&self, ids: BTreeSet<Id>) -> Self {
        Self {
            net: self.net,
            kind: self.kind,
            ids: Some(ids),
        }
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The structure this bunch reads from.
    #[must_use]
    pub fn network(&self) -> &'a dyn HypergraphRead {
        self.net
    }

    /// Identifiers in order.
    #[must_use]
    pub fn ids(&self) -> Vec<Id> {
        match (&self.ids, self.kind) {
            (Some(ids), _) => ids.iter().cloned().collect(),
            (None, EntityKind::Node) => self.net.nodes().cloned().collect(),
            (None, EntityKind::Edge) => self.net.edges().cloned().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match (&self.ids, self.kind) {
            (Some(ids), _) => ids.len(),
            (None, EntityKind::Node) => self.net.num_nodes(),
            (None, EntityKind::Edge) => self.net.num_edges(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains(&self, id: &Id) -> bool {
        match (&self.ids, self.kind) {
            (Some(ids), _) => ids.contains(id),
            (None, EntityKind::Node) => self.net.has_node(id),
            (None, EntityKind::Edge) => self.net.has_edge(id),
        }
    }

    /// Bind a stat to this bunch. Unknown names fail here, not on first read.
    pub fn stat(&self, spec: impl IntoStatSpec) -> Result<IdStat<'a>, HyperweaveError> {
        let spec = spec.into_stat_spec()?;
        lookup(spec.name(), self.kind)?;
        Ok(IdStat {
            view: self.clone(),
            spec,
        })
    }

    /// Sub-bunch whose stat values pass `mode` against `arg`.
    pub fn filterby(
        &self,
        spec: impl IntoStatSpec,
        arg: impl Into<FilterArg>,
        mode: FilterMode,
    ) -> Result<IdView<'a>, HyperweaveError> {
        let arg = arg.into();
        mode.check(&arg)?;
        let values = self.stat(spec)?.as_map()?;
        let mut kept = BTreeSet::new();
        for (id, value) in values {
            if mode.matches(&value, &arg)? {
                kept.insert(id);
            }
        }
        Ok(self.with_ids(kept))
    }

    /// Sub-bunch whose attribute `attr` passes `mode` against `arg`.
    ///
    /// Absent attributes take `missing`, or null when `None`; null only
    /// passes `neq`.
    pub fn filterby_attr(
        &self,
        attr: &str,
        arg: impl Into<FilterArg>,
        mode: FilterMode,
        missing: Option<AttrValue>,
    ) -> Result<IdView<'a>, HyperweaveError> {
        let spec = StatSpec::new("attrs")
            .with("attr", attr)
            .with("missing", missing.unwrap_or(AttrValue::Null));
        self.filterby(spec, arg, mode)
    }

    /// Bind several stats to this bunch at once.
    pub fn multi<I, S>(&self, specs: I) -> Result<MultiStat<'a>, HyperweaveError>
    where
        I: IntoIterator<Item = S>,
        S: IntoStatSpec,
    {
        let stats = specs
            .into_iter()
            .map(|spec| self.stat(spec))
            .collect::<Result<Vec<_>, _>>()?;
        MultiStat::new(stats)
    }

    fn expect_kind(&self, kind: EntityKind, what: &str) -> Result<(), HyperweaveError> {
        if self.kind != kind {
            return Err(HyperweaveError::InvalidOperation(format!(
                "`{what}` applies to {kind} bunches, this is a {} bunch",
                self.kind
            )));
        }
        Ok(())
    }

    /// Members of every edge in the bunch.
    pub fn members(&self) -> Result<BTreeMap<Id, BTreeSet<Id>>, HyperweaveError> {
        self.expect_kind(EntityKind::Edge, "members")?;
        self.ids()
            .into_iter()
            .map(|e| {
                let members = self.net.members(&e)?.clone();
                Ok((e, members))
            })
            .collect()
    }

    /// Memberships of every node in the bunch.
    pub fn memberships(&self) -> Result<BTreeMap<Id, BTreeSet<Id>>, HyperweaveError> {
        self.expect_kind(EntityKind::Node, "memberships")?;
        self.ids()
            .into_iter()
            .map(|n| {
                let edges = self.net.memberships(&n)?;
                Ok((n, edges))
            })
            .collect()
    }

    /// Edges of the bunch not strictly contained in another edge of the
    /// structure.
    pub fn maximal(&self, strict: bool) -> Result<IdView<'a>, HyperweaveError> {
        self.expect_kind(EntityKind::Edge, "maximal")?;
        let maximal = maximal_edges(self.net, strict);
        let kept = self
            .ids()
            .into_iter()
            .filter(|e| maximal.contains(e))
            .collect();
        Ok(self.with_ids(kept))
    }

    /// Neighbors of one node of the bunch.
    pub fn neighbors(&self, node: &Id) -> Result<BTreeSet<Id>, HyperweaveError> {
        self.expect_kind(EntityKind::Node, "neighbors")?;
        if !self.contains(node) {
            return Err(HyperweaveError::IdNotInBunch(node.clone()));
        }
        neighbors(self.net, node)
    }
}

// =============================================================================
// ID STAT
// =============================================================================

/// One histogram bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub center: f64,
    pub lo: f64,
    pub hi: f64,
    /// Count, or density when requested.
    pub value: f64,
}

/// A stat bound to a bunch. Reads re-evaluate.
#[derive(Debug, Clone)]
pub struct IdStat<'a> {
    view: IdView<'a>,
    spec: StatSpec,
}

impl<'a> IdStat<'a> {
    #[must_use]
    pub fn spec(&self) -> &StatSpec {
        &self.spec
    }

    /// Rendered name, e.g. `degree(order=2)`.
    #[must_use]
    pub fn name(&self) -> String {
        self.spec.to_string()
    }

    #[must_use]
    pub fn view(&self) -> &IdView<'a> {
        &self.view
    }

    /// Value for one identifier of the bunch.
    pub fn get(&self, id: &Id) -> Result<StatValue, HyperweaveError> {
        if !self.view.contains(id) {
            return Err(HyperweaveError::IdNotInBunch(id.clone()));
        }
        let mut values = self
            .spec
            .eval(self.view.net, self.view.kind, std::slice::from_ref(id))?;
        values
            .remove(id)
            .ok_or_else(|| HyperweaveError::IdNotInBunch(id.clone()))
    }

    pub fn as_map(&self) -> Result<StatMap, HyperweaveError> {
        self.spec
            .eval(self.view.net, self.view.kind, &self.view.ids())
    }

    /// Values in bunch order.
    pub fn as_vec(&self) -> Result<Vec<StatValue>, HyperweaveError> {
        Ok(self.as_map()?.into_values().collect())
    }

    /// Distinct values in order of first appearance.
    pub fn as_set(&self) -> Result<Vec<StatValue>, HyperweaveError> {
        let mut distinct: Vec<StatValue> = Vec::new();
        for value in self.as_vec()? {
            if !distinct.contains(&value) {
                distinct.push(value);
            }
        }
        Ok(distinct)
    }

    fn numbers(&self) -> Result<Vec<(Id, f64)>, HyperweaveError> {
        self.as_map()?
            .into_iter()
            .map(|(id, value)| match value.as_f64() {
                Some(x) => Ok((id, x)),
                None => Err(HyperweaveError::InvalidOperation(format!(
                    "stat `{}` is not numeric for {id}",
                    self.spec
                ))),
            })
            .collect()
    }

    /// Best entry under `better`; ties keep the first one seen.
    fn extreme(
        &self,
        better: impl Fn(&StatValue, &StatValue) -> bool,
    ) -> Result<Option<(Id, StatValue)>, HyperweaveError> {
        let mut best: Option<(Id, StatValue)> = None;
        for (id, value) in self.as_map()? {
            if value.as_f64().is_none() && value.compare(&value).is_none() {
                return Err(HyperweaveError::InvalidOperation(format!(
                    "stat `{}` has incomparable value for {id}",
                    self.spec
                )));
            }
            let replace = match &best {
                None => true,
                Some((_, current)) => better(&value, current),
            };
            if replace {
                best = Some((id, value));
            }
        }
        Ok(best)
    }

    fn is_greater(a: &StatValue, b: &StatValue) -> bool {
        a.compare(b) == Some(std::cmp::Ordering::Greater)
    }

    fn is_less(a: &StatValue, b: &StatValue) -> bool {
        a.compare(b) == Some(std::cmp::Ordering::Less)
    }

    pub fn max(&self) -> Result<Option<StatValue>, HyperweaveError> {
        Ok(self.extreme(Self::is_greater)?.map(|(_, v)| v))
    }

    pub fn min(&self) -> Result<Option<StatValue>, HyperweaveError> {
        Ok(self.extreme(Self::is_less)?.map(|(_, v)| v))
    }

    /// Identifier of the largest value; the first one on ties.
    pub fn argmax(&self) -> Result<Option<Id>, HyperweaveError> {
        Ok(self.extreme(Self::is_greater)?.map(|(id, _)| id))
    }

    /// Identifier of the smallest value; the first one on ties.
    pub fn argmin(&self) -> Result<Option<Id>, HyperweaveError> {
        Ok(self.extreme(Self::is_less)?.map(|(id, _)| id))
    }

    pub fn sum(&self) -> Result<f64, HyperweaveError> {
        Ok(self.numbers()?.iter().map(|(_, x)| x).sum())
    }

    /// `None` on an empty bunch.
    pub fn mean(&self) -> Result<Option<f64>, HyperweaveError> {
        let values = self.numbers()?;
        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(values.iter().map(|(_, x)| x).sum::<f64>() / values.len() as f64))
    }

    /// Raw (`center = false`) or central moment of the given order.
    pub fn moment(&self, order: i32, center: bool) -> Result<Option<f64>, HyperweaveError> {
        let values = self.numbers()?;
        if values.is_empty() {
            return Ok(None);
        }
        let n = values.len() as f64;
        let shift = if center {
            values.iter().map(|(_, x)| x).sum::<f64>() / n
        } else {
            0.0
        };
        Ok(Some(
            values.iter().map(|(_, x)| (x - shift).powi(order)).sum::<f64>() / n,
        ))
    }

    /// Population variance.
    pub fn var(&self) -> Result<Option<f64>, HyperweaveError> {
        self.moment(2, true)
    }

    /// Population standard deviation.
    pub fn std(&self) -> Result<Option<f64>, HyperweaveError> {
        Ok(self.var()?.map(f64::sqrt))
    }

    /// Histogram of the values.
    ///
    /// Without `bins`, whole-number data whose maximum exceeds its minimum by
    /// less than [`MAX_UNIT_HIST_BINS`] gets one unit bin per integer from the
    /// minimum to the maximum; other data gets [`DEFAULT_HIST_BINS`]
    /// equal-width bins. The maximum falls in the last bin. With `density`,
    /// bin values integrate to one.
    pub fn ashist(
        &self,
        bins: Option<usize>,
        density: bool,
    ) -> Result<Vec<HistogramBin>, HyperweaveError> {
        let values: Vec<f64> = self.numbers()?.into_iter().map(|(_, x)| x).collect();
        if values.is_empty() {
            return Ok(Vec::new());
        }
        if bins == Some(0) {
            return Err(HyperweaveError::InvalidOperation(
                "a histogram needs at least one bin".to_string(),
            ));
        }

        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let integral = values.iter().all(|x| x.fract() == 0.0);
        let unit_bins = if integral { unit_bin_count(lo, hi) } else { None };

        let (start, width, count) = match (bins, unit_bins) {
            (None, Some(count)) => (lo - 0.5, 1.0, count),
            _ if hi == lo => (lo - 0.5, 1.0, 1),
            (requested, _) => {
                let count = requested.unwrap_or(DEFAULT_HIST_BINS);
                (lo, (hi - lo) / count as f64, count)
            }
        };

        let mut counts = vec![0usize; count];
        for x in &values {
            let slot = (((x - start) / width).floor() as usize).min(count - 1);
            counts[slot] += 1;
        }

        let total = values.len() as f64;
        Ok(counts
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                let bin_lo = start + i as f64 * width;
                let bin_hi = bin_lo + width;
                HistogramBin {
                    center: (bin_lo + bin_hi) / 2.0,
                    lo: bin_lo,
                    hi: bin_hi,
                    value: if density {
                        c as f64 / (total * width)
                    } else {
                        c as f64
                    },
                }
            })
            .collect())
    }
}

/// One bin per integer in `[lo, hi]`, or `None` when the span is too wide.
fn unit_bin_count(lo: f64, hi: f64) -> Option<usize> {
    let span = hi - lo;
    if !span.is_finite() || span >= MAX_UNIT_HIST_BINS as f64 {
        return None;
    }
    Some(span as usize + 1)
}

// =============================================================================
// MULTI STAT
// =============================================================================

/// Rendered stat name to value, in composition order.
pub type StatRecord = Vec<(String, StatValue)>;

/// Several stats over one bunch, read together.
#[derive(Debug, Clone)]
pub struct MultiStat<'a> {
    stats: Vec<IdStat<'a>>,
}

impl<'a> MultiStat<'a> {
    /// Compose bound stats. They must all be bound to the same bunch.
    pub fn new(stats: Vec<IdStat<'a>>) -> Result<Self, HyperweaveError> {
        if let Some(first) = stats.first() {
            let kind = first.view.kind;
            let ids = first.view.ids();
            if let Some(other) = stats
                .iter()
                .find(|s| s.view.kind != kind || s.view.ids() != ids)
            {
                return Err(HyperweaveError::StatCollision(format!(
                    "`{}` and `{}` are bound to different bunches",
                    first.name(),
                    other.name()
                )));
            }
        }
        Ok(Self { stats })
    }

    /// Rendered names of the component stats.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.stats.iter().map(IdStat::name).collect()
    }

    /// One record per identifier of the bunch.
    pub fn as_map(&self) -> Result<BTreeMap<Id, StatRecord>, HyperweaveError> {
        let mut out: BTreeMap<Id, StatRecord> = BTreeMap::new();
        let Some(first) = self.stats.first() else {
            return Ok(out);
        };
        for id in first.view.ids() {
            out.insert(id, Vec::with_capacity(self.stats.len()));
        }
        for stat in &self.stats {
            let name = stat.name();
            for (id, value) in stat.as_map()? {
                if let Some(record) = out.get_mut(&id) {
                    record.push((name.clone(), value));
                }
            }
        }
        Ok(out)
    }
}

// =============================================================================
// TESTS
// =============================================================================
