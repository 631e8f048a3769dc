//! Neighborhoods, maximal edges, connectivity and density.

use crate::network::HypergraphRead;
use crate::{HyperweaveError, Id};
use std::collections::{BTreeSet, VecDeque};

/// Nodes sharing at least one edge with `node`, excluding `node` itself.
pub fn neighbors<N>(net: &N, node: &Id) -> Result<BTreeSet<Id>, HyperweaveError>
where
    N: HypergraphRead + ?Sized,
{
    let mut out = BTreeSet::new();
    for edge in net.memberships(node)? {
        out.extend(net.members(&edge)?.iter().cloned());
    }
    out.remove(node);
    Ok(out)
}

/// Edges not contained in another edge.
///
/// With `strict = false`, an edge is dropped only when another edge strictly
/// contains it, so duplicated maximal edges are all kept. With
/// `strict = true`, any other edge with a superset (or equal) member set
/// drops it.
pub fn maximal_edges<N>(net: &N, strict: bool) -> BTreeSet<Id>
where
    N: HypergraphRead + ?Sized,
{
    net.edges()
        .filter(|edge| is_maximal(net, edge, strict))
        .cloned()
        .collect()
}

fn is_maximal<N>(net: &N, edge: &Id, strict: bool) -> bool
where
    N: HypergraphRead + ?Sized,
{
    let Ok(members) = net.members(edge) else {
        return false;
    };

    // A superset must contain every member, so the memberships of the
    // least-connected member bound the candidates.
    let pivot = members
        .iter()
        .min_by_key(|n| net.degree(n).unwrap_or(usize::MAX));
    let candidates: Vec<Id> = match pivot {
        Some(node) => net.memberships(node).unwrap_or_default().into_iter().collect(),
        None => net.edges().cloned().collect(),
    };

    !candidates.iter().filter(|other| *other != edge).any(|other| {
        net.members(other).is_ok_and(|theirs| {
            members.is_subset(theirs) && (strict || theirs.len() > members.len())
        })
    })
}

/// Node sets of the connected components, in order of their smallest node.
///
/// Isolated nodes form singleton components.
pub fn connected_components<N>(net: &N) -> Vec<BTreeSet<Id>>
where
    N: HypergraphRead + ?Sized,
{
    let mut seen: BTreeSet<Id> = BTreeSet::new();
    let mut components = Vec::new();

    for start in net.nodes() {
        if seen.contains(start) {
            continue;
        }
        let mut component = BTreeSet::new();
        let mut queue = VecDeque::from([start.clone()]);
        seen.insert(start.clone());

        while let Some(node) = queue.pop_front() {
            for edge in net.memberships(&node).unwrap_or_default() {
                let Ok(members) = net.members(&edge) else {
                    continue;
                };
                for next in members {
                    if seen.insert(next.clone()) {
                        queue.push_back(next.clone());
                    }
                }
            }
            component.insert(node);
        }
        components.push(component);
    }
    components
}

/// Whether every node is reachable from every other. An empty structure is
/// not connected.
pub fn is_connected<N>(net: &N) -> bool
where
    N: HypergraphRead + ?Sized,
{
    connected_components(net).len() == 1
}

/// Largest component; ties go to the one found first.
pub fn largest_connected_component<N>(net: &N) -> BTreeSet<Id>
where
    N: HypergraphRead + ?Sized,
{
    connected_components(net)
        .into_iter()
        .fold(BTreeSet::new(), |best, c| if c.len() > best.len() { c } else { best })
}

/// Distinct edge sizes, ascending.
pub fn unique_edge_sizes<N>(net: &N) -> Vec<usize>
where
    N: HypergraphRead + ?Sized,
{
    let sizes: BTreeSet<usize> = net
        .edges()
        .filter_map(|e| net.members(e).ok().map(BTreeSet::len))
        .collect();
    sizes.into_iter().collect()
}

/// Fraction of possible edges that are present.
///
/// With `order = Some(d)`, only edges of `d + 1` nodes are counted against
/// `C(n, d + 1)`; otherwise all edges count against every non-empty node
/// subset, minus the `n` singletons when `ignore_singletons` is set.
/// Returns `0.0` when no edge is possible.
pub fn density<N>(net: &N, order: Option<usize>, ignore_singletons: bool) -> f64
where
    N: HypergraphRead + ?Sized,
{
    let n = net.num_nodes();
    let size_of = |e: &Id| net.members(e).map(BTreeSet::len).unwrap_or(0);

    let (present, possible) = match order {
        Some(d) => {
            let present = net.edges().filter(|e| size_of(e) == d + 1).count();
            (present, binomial_f64(n, d + 1))
        }
        None => {
            let present = net
                .edges()
                .filter(|e| {
                    let size = size_of(e);
                    size > 0 && !(ignore_singletons && size == 1)
                })
                .count();
            let mut possible = 2f64.powi(n as i32) - 1.0;
            if ignore_singletons {
                possible -= n as f64;
            }
            (present, possible)
        }
    };

    if possible <= 0.0 {
        return 0.0;
    }
    present as f64 / possible
}

fn binomial_f64(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

// =============================================================================
// TESTS
// =============================================================================
