//! Node stats. Every function follows [`super::spec::StatFn`].

use super::spec::{StatMap, StatSpec};
use super::value::StatValue;
use crate::algorithms::neighbors;
use crate::network::{DirectedRead, HypergraphRead};
use crate::primitives::{MAX_POWER_ITERATIONS, POWER_ITERATION_TOLERANCE};
use crate::{AttrValue, HyperweaveError, Id};
use std::collections::{BTreeMap, BTreeSet};

fn edge_size(net: &dyn HypergraphRead, edge: &Id) -> Result<usize, HyperweaveError> {
    Ok(net.members(edge)?.len())
}

fn has_order(
    net: &dyn HypergraphRead,
    edge: &Id,
    order: Option<usize>,
) -> Result<bool, HyperweaveError> {
    Ok(match order {
        Some(order) => edge_size(net, edge)? == order + 1,
        None => true,
    })
}

/// Directed access or an error naming the stat.
pub(super) fn directed<'a>(
    net: &'a dyn HypergraphRead,
    spec: &StatSpec,
) -> Result<&'a dyn DirectedRead, HyperweaveError> {
    net.as_directed().ok_or_else(|| {
        HyperweaveError::InvalidOperation(format!(
            "stat `{}` needs a directed structure, found a {}",
            spec.name(),
            net.kind()
        ))
    })
}

/// `attrs(attr, missing)`.
pub fn attrs(
    net: &dyn HypergraphRead,
    ids: &[Id],
    spec: &StatSpec,
) -> Result<StatMap, HyperweaveError> {
    let attr = spec.param_str("attr")?;
    let missing = spec.param("missing").cloned().unwrap_or(AttrValue::Null);
    ids.iter()
        .map(|node| {
            let record = net.node_attrs(node)?;
            let value = match attr {
                Some(key) => record.get(key).cloned().unwrap_or_else(|| missing.clone()),
                None => AttrValue::Object(record.clone()),
            };
            Ok((node.clone(), StatValue::from_attr(value)))
        })
        .collect()
}

/// `degree(order, weight)`.
///
/// With `weight`, each edge contributes its numeric `weight` attribute
/// (1 when absent) and the result is a float.
pub fn degree(
    net: &dyn HypergraphRead,
    ids: &[Id],
    spec: &StatSpec,
) -> Result<StatMap, HyperweaveError> {
    let order = spec.param_usize("order")?;
    let weight = spec.param_str("weight")?;
    let mut out = BTreeMap::new();

    for node in ids {
        let mut count = 0usize;
        let mut total = 0.0;
        for edge in net.memberships(node)? {
            if !has_order(net, &edge, order)? {
                continue;
            }
            count += 1;
            if let Some(key) = weight {
                total += net
                    .edge_attrs(&edge)?
                    .get(key)
                    .and_then(AttrValue::as_f64)
                    .unwrap_or(1.0);
            }
        }
        let value = match weight {
            Some(_) => StatValue::Float(total),
            None => StatValue::from(count),
        };
        out.insert(node.clone(), value);
    }
    Ok(out)
}

/// `average_neighbor_degree`; `0.0` for nodes without neighbors.
pub fn average_neighbor_degree(
    net: &dyn HypergraphRead,
    ids: &[Id],
    _spec: &StatSpec,
) -> Result<StatMap, HyperweaveError> {
    let mut out = BTreeMap::new();
    for node in ids {
        let around = neighbors(net, node)?;
        let mut total = 0usize;
        for other in &around {
            total += net.degree(other)?;
        }
        let mean = if around.is_empty() {
            0.0
        } else {
            total as f64 / around.len() as f64
        };
        out.insert(node.clone(), StatValue::Float(mean));
    }
    Ok(out)
}

/// `clique_eigenvector_centrality(tol, max_iter)`.
///
/// Power iteration on `A + I` of the clique expansion, normalized to unit L1
/// norm after every step. Computed over the whole structure, then restricted
/// to the requested identifiers.
pub fn clique_eigenvector_centrality(
    net: &dyn HypergraphRead,
    ids: &[Id],
    spec: &StatSpec,
) -> Result<StatMap, HyperweaveError> {
    let tolerance = spec.param_f64("tol")?.unwrap_or(POWER_ITERATION_TOLERANCE);
    let max_iter = spec.param_usize("max_iter")?.unwrap_or(MAX_POWER_ITERATIONS);

    let nodes: Vec<Id> = net.nodes().cloned().collect();
    let index: BTreeMap<&Id, usize> = nodes.iter().enumerate().map(|(i, n)| (n, i)).collect();
    let mut adjacency: Vec<Vec<usize>> = Vec::with_capacity(nodes.len());
    for node in &nodes {
        let around: BTreeSet<Id> = neighbors(net, node)?;
        adjacency.push(around.iter().filter_map(|n| index.get(n).copied()).collect());
    }

    let n = nodes.len();
    let mut x = vec![1.0 / n.max(1) as f64; n];
    for _ in 0..max_iter {
        let mut next: Vec<f64> = x.clone();
        for (i, row) in adjacency.iter().enumerate() {
            next[i] += row.iter().map(|&j| x[j]).sum::<f64>();
        }
        let norm: f64 = next.iter().sum();
        if norm > 0.0 {
            next.iter_mut().for_each(|v| *v /= norm);
        }
        let change: f64 = next.iter().zip(&x).map(|(a, b)| (a - b).abs()).sum();
        x = next;
        if change < tolerance {
            break;
        }
    }

    ids.iter()
        .map(|node| {
            let i = index
                .get(node)
                .copied()
                .ok_or_else(|| HyperweaveError::NodeNotFound(node.clone()))?;
            Ok((node.clone(), StatValue::Float(x[i])))
        })
        .collect()
}

/// `in_degree(order)`: directed only.
pub fn in_degree(
    net: &dyn HypergraphRead,
    ids: &[Id],
    spec: &StatSpec,
) -> Result<StatMap, HyperweaveError> {
    let dir = directed(net, spec)?;
    let order = spec.param_usize("order")?;
    let mut out = BTreeMap::new();
    for node in ids {
        let mut count = 0usize;
        for edge in dir.in_edges(node)? {
            if has_order(net, &edge, order)? {
                count += 1;
            }
        }
        out.insert(node.clone(), StatValue::from(count));
    }
    Ok(out)
}

/// `out_degree(order)`: directed only.
pub fn out_degree(
    net: &dyn HypergraphRead,
    ids: &[Id],
    spec: &StatSpec,
) -> Result<StatMap, HyperweaveError> {
    let dir = directed(net, spec)?;
    let order = spec.param_usize("order")?;
    let mut out = BTreeMap::new();
    for node in ids {
        let mut count = 0usize;
        for edge in dir.out_edges(node)? {
            if has_order(net, &edge, order)? {
                count += 1;
            }
        }
        out.insert(node.clone(), StatValue::from(count));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiHypergraph, Hypergraph};
    use serde_json::json;

    fn sample() -> Hypergraph {
        let mut hg = Hypergraph::new();
        hg.add_edges_from(vec![vec![1, 2, 3], vec![4], vec![5, 6], vec![6, 7, 8]])
            .expect("edges");
        hg
    }

    fn all_nodes(net: &dyn HypergraphRead) -> Vec<Id> {
        net.nodes().cloned().collect()
    }

    #[test]
    fn degree_counts_memberships() {
        let hg = sample();
        let out = degree(&hg, &all_nodes(&hg), &StatSpec::new("degree")).expect("degree");

        assert_eq!(out[&Id::from(6)], StatValue::Int(2));
        assert_eq!(out[&Id::from(4)], StatValue::Int(1));
    }

    #[test]
    fn degree_by_order_and_weight() {
        let mut hg = sample();
        hg.set_edge_attr(&Id::from(3), "w", 2.5).expect("attr");
        let ids = vec![Id::from(6)];

        let by_order = degree(&hg, &ids, &StatSpec::new("degree").with("order", 1))
            .expect("degree");
        assert_eq!(by_order[&Id::from(6)], StatValue::Int(1));

        let weighted = degree(&hg, &ids, &StatSpec::new("degree").with("weight", "w"))
            .expect("degree");
        assert_eq!(weighted[&Id::from(6)], StatValue::Float(3.5));
    }

    #[test]
    fn attribute_lookup_with_missing_default() {
        let mut hg = sample();
        hg.set_node_attr(&Id::from(1), "color", "red").expect("attr");
        let ids = vec![Id::from(1), Id::from(2)];

        let spec = StatSpec::new("attrs").with("attr", "color").with("missing", "none");
        let out = attrs(&hg, &ids, &spec).expect("attrs");
        assert_eq!(out[&Id::from(1)], StatValue::from("red"));
        assert_eq!(out[&Id::from(2)], StatValue::from("none"));

        let whole = attrs(&hg, &ids[..1], &StatSpec::new("attrs")).expect("attrs");
        assert_eq!(whole[&Id::from(1)], StatValue::Attr(json!({"color": "red"})));
    }

    #[test]
    fn neighbor_degree_average() {
        let hg = sample();
        let out = average_neighbor_degree(&hg, &[Id::from(5), Id::from(4)], &StatSpec::new("x"))
            .expect("avg");

        assert_eq!(out[&Id::from(5)], StatValue::Float(2.0));
        assert_eq!(out[&Id::from(4)], StatValue::Float(0.0));
    }

    #[test]
    fn centrality_is_normalized_and_symmetric() {
        let mut hg = Hypergraph::new();
        hg.add_edges_from(vec![vec![1, 2, 3]]).expect("edges");
        let out = clique_eigenvector_centrality(
            &hg,
            &all_nodes(&hg),
            &StatSpec::new("clique_eigenvector_centrality"),
        )
        .expect("centrality");

        let total: f64 = out.values().filter_map(StatValue::as_f64).sum();
        assert!((total - 1.0).abs() < 1e-9);
        let one = out[&Id::from(1)].as_f64().expect("num");
        let two = out[&Id::from(2)].as_f64().expect("num");
        assert!((one - two).abs() < 1e-9);
    }

    #[test]
    fn directed_degrees() {
        let mut dh = DiHypergraph::new();
        dh.add_edges_from(vec![(vec![1], vec![2, 3]), (vec![2], vec![1])])
            .expect("edges");
        let ids = vec![Id::from(1), Id::from(2)];

        let ins = in_degree(&dh, &ids, &StatSpec::new("in_degree")).expect("in");
        let outs = out_degree(&dh, &ids, &StatSpec::new("out_degree")).expect("out");
        assert_eq!(ins[&Id::from(2)], StatValue::Int(1));
        assert_eq!(outs[&Id::from(1)], StatValue::Int(1));

        let hg = sample();
        assert!(matches!(
            in_degree(&hg, &[Id::from(1)], &StatSpec::new("in_degree")),
            Err(HyperweaveError::InvalidOperation(_))
        ));
    }
}
