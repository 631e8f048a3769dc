//! # Simpliciality
//!
//! How close a hypergraph is to a simplicial complex.
//!
//! Every metric builds a [`SubsetTrie`] over the edges with at least
//! `min_size` nodes and then inspects the maximal edges:
//!
//! - `simplicial_fraction`: share of maximal edges whose faces are all present
//! - `edit_simpliciality`: `s / (s + m)` where `s` counts edges with at least
//!   `min_size` nodes and `m` counts the distinct faces that would have to be
//!   added to close every maximal edge
//! - `face_edit_simpliciality`: mean over maximal edges of
//!   `(present faces + 1) / (possible faces + 1)`
//!
//! With `exclude_min_size`, maximal edges of exactly `min_size` nodes are left
//! out of the inspected set, since they have no required faces. When nothing
//! is left to inspect, the structure is vacuously simplicial and every metric
//! returns `1.0`.

use super::structure::maximal_edges;
use crate::network::HypergraphRead;
use crate::primitives::DEFAULT_MIN_SIZE;
use crate::trie::{NodeCodes, SubsetTrie, combinations};
use crate::Id;
use std::collections::BTreeSet;

/// Parameters shared by the simpliciality metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimplicialityParams {
    /// Smallest face size required for closure.
    pub min_size: usize,
    /// Skip maximal edges of exactly `min_size` nodes.
    pub exclude_min_size: bool,
}

impl Default for SimplicialityParams {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            exclude_min_size: true,
        }
    }
}

/// Number of possible faces of a `size`-node edge with between `min_size` and
/// `size - 1` nodes.
#[must_use]
pub fn max_number_of_subfaces(min_size: usize, size: usize) -> usize {
    (min_size..size).map(|k| binomial(size, k)).sum()
}

fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = result * (n - i) as u128 / (i + 1) as u128;
    }
    usize::try_from(result).unwrap_or(usize::MAX)
}

/// Trie over every edge with at least `min_size` nodes.
struct EdgeIndex {
    codes: NodeCodes,
    trie: SubsetTrie,
    counted: usize,
}

impl EdgeIndex {
    fn build<N>(net: &N, min_size: usize) -> Self
    where
        N: HypergraphRead + ?Sized,
    {
        let mut codes = NodeCodes::new();
        let mut trie = SubsetTrie::new();
        let mut counted = 0;
        for edge in net.edges() {
            let Ok(members) = net.members(edge) else {
                continue;
            };
            if members.len() < min_size {
                continue;
            }
            counted += 1;
            let key = codes.key_of(members);
            trie.insert(&key, edge.clone());
        }
        Self {
            codes,
            trie,
            counted,
        }
    }

    fn key(&self, members: &BTreeSet<Id>) -> Vec<u32> {
        self.codes.lookup_key(members).unwrap_or_default()
    }

    fn present_faces(&self, members: &BTreeSet<Id>, min_size: usize) -> usize {
        let key = self.key(members);
        match key.len().checked_sub(1) {
            Some(max_size) => self.trie.count_subsets(&key, min_size, max_size),
            None => 0,
        }
    }

    fn is_simplex(&self, members: &BTreeSet<Id>, min_size: usize) -> bool {
        self.present_faces(members, min_size) == max_number_of_subfaces(min_size, members.len())
    }

    fn missing_faces(&self, members: &BTreeSet<Id>, min_size: usize) -> Vec<Vec<u32>> {
        let key = self.key(members);
        (min_size..key.len())
            .flat_map(|size| combinations(&key, size))
            .filter(|face| !self.trie.contains(face))
            .collect()
    }
}

/// Member sets of the maximal edges the metrics inspect.
fn inspected_edges<N>(net: &N, params: SimplicialityParams) -> Vec<BTreeSet<Id>>
where
    N: HypergraphRead + ?Sized,
{
    let threshold = if params.exclude_min_size {
        params.min_size + 1
    } else {
        params.min_size
    };
    maximal_edges(net, false)
        .iter()
        .filter_map(|edge| net.members(edge).ok())
        .filter(|members| members.len() >= threshold)
        .cloned()
        .collect()
}

/// Share of maximal edges that are simplices.
pub fn simplicial_fraction<N>(net: &N, params: SimplicialityParams) -> f64
where
    N: HypergraphRead + ?Sized,
{
    let inspected = inspected_edges(net, params);
    if inspected.is_empty() {
        return 1.0;
    }
    let index = EdgeIndex::build(net, params.min_size);
    let simplices = inspected
        .iter()
        .filter(|members| index.is_simplex(members, params.min_size))
        .count();
    simplices as f64 / inspected.len() as f64
}

/// Edges present relative to edges present plus faces missing.
pub fn edit_simpliciality<N>(net: &N, params: SimplicialityParams) -> f64
where
    N: HypergraphRead + ?Sized,
{
    let inspected = inspected_edges(net, params);
    if inspected.is_empty() {
        return 1.0;
    }
    let index = EdgeIndex::build(net, params.min_size);
    let missing: BTreeSet<Vec<u32>> = inspected
        .iter()
        .flat_map(|members| index.missing_faces(members, params.min_size))
        .collect();

    let present = index.counted as f64;
    if present + missing.len() as f64 == 0.0 {
        return 1.0;
    }
    present / (present + missing.len() as f64)
}

/// Mean per-edge share of faces present, smoothed by one.
pub fn face_edit_simpliciality<N>(net: &N, params: SimplicialityParams) -> f64
where
    N: HypergraphRead + ?Sized,
{
    let inspected = inspected_edges(net, params);
    if inspected.is_empty() {
        return 1.0;
    }
    let index = EdgeIndex::build(net, params.min_size);
    let total: f64 = inspected
        .iter()
        .map(|members| {
            let present = index.present_faces(members, params.min_size) as f64;
            let possible = max_number_of_subfaces(params.min_size, members.len()) as f64;
            (present + 1.0) / (possible + 1.0)
        })
        .sum();
    total / inspected.len() as f64
}

// =============================================================================
// TESTS
// =============================================================================
