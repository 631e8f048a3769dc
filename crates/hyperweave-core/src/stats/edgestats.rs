//! Edge stats. Every function follows [`super::spec::StatFn`].

use super::nodestats::directed;
use super::spec::{StatMap, StatSpec};
use super::value::StatValue;
use crate::network::HypergraphRead;
use crate::{AttrValue, HyperweaveError, Id};
use std::collections::BTreeMap;

/// Members of `edge`, counting only those of degree `degree` when given.
fn counted_members(
    net: &dyn HypergraphRead,
    edge: &Id,
    degree: Option<usize>,
) -> Result<usize, HyperweaveError> {
    let members = net.members(edge)?;
    let Some(degree) = degree else {
        return Ok(members.len());
    };
    let mut count = 0;
    for node in members {
        if net.degree(node)? == degree {
            count += 1;
        }
    }
    Ok(count)
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
        .map(|edge| {
            let record = net.edge_attrs(edge)?;
            let value = match attr {
                Some(key) => record.get(key).cloned().unwrap_or_else(|| missing.clone()),
                None => AttrValue::Object(record.clone()),
            };
            Ok((edge.clone(), StatValue::from_attr(value)))
        })
        .collect()
}

/// `order(degree)`: size minus one, so an empty edge has order `-1`.
pub fn order(
    net: &dyn HypergraphRead,
    ids: &[Id],
    spec: &StatSpec,
) -> Result<StatMap, HyperweaveError> {
    let degree = spec.param_usize("degree")?;
    ids.iter()
        .map(|edge| {
            let size = counted_members(net, edge, degree)? as i64;
            Ok((edge.clone(), StatValue::Int(size - 1)))
        })
        .collect()
}

/// `size(degree)`.
pub fn size(
    net: &dyn HypergraphRead,
    ids: &[Id],
    spec: &StatSpec,
) -> Result<StatMap, HyperweaveError> {
    let degree = spec.param_usize("degree")?;
    ids.iter()
        .map(|edge| {
            let size = counted_members(net, edge, degree)?;
            Ok((edge.clone(), StatValue::from(size)))
        })
        .collect()
}

/// `tail_size`: directed only.
pub fn tail_size(
    net: &dyn HypergraphRead,
    ids: &[Id],
    spec: &StatSpec,
) -> Result<StatMap, HyperweaveError> {
    let dir = directed(net, spec)?;
    let mut out = BTreeMap::new();
    for edge in ids {
        out.insert(edge.clone(), StatValue::from(dir.tail(edge)?.len()));
    }
    Ok(out)
}

/// `head_size`: directed only.
pub fn head_size(
    net: &dyn HypergraphRead,
    ids: &[Id],
    spec: &StatSpec,
) -> Result<StatMap, HyperweaveError> {
    let dir = directed(net, spec)?;
    let mut out = BTreeMap::new();
    for edge in ids {
        out.insert(edge.clone(), StatValue::from(dir.head(edge)?.len()));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiHypergraph, Hypergraph};

    fn sample() -> Hypergraph {
        let mut hg = Hypergraph::new();
        hg.add_edges_from(vec![vec![1, 2, 3], vec![4], vec![5, 6], vec![6, 7, 8]])
            .expect("edges");
        hg
    }

    fn all_edges(net: &dyn HypergraphRead) -> Vec<Id> {
        net.edges().cloned().collect()
    }

    #[test]
    fn order_is_size_minus_one() {
        let hg = sample();
        let out = order(&hg, &all_edges(&hg), &StatSpec::new("order")).expect("order");

        let expected: StatMap = [(0, 2), (1, 0), (2, 1), (3, 2)]
            .into_iter()
            .map(|(e, o)| (Id::from(e), StatValue::Int(o)))
            .collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn empty_edge_has_negative_order() {
        let mut hg = sample();
        hg.remove_node(&Id::from(4)).expect("remove");

        let out = order(&hg, &[Id::from(1)], &StatSpec::new("order")).expect("order");
        assert_eq!(out[&Id::from(1)], StatValue::Int(-1));
    }

    #[test]
    fn size_counts_members_of_one_degree() {
        let hg = sample();
        let spec = StatSpec::new("size").with("degree", 1);
        let out = size(&hg, &[Id::from(3)], &spec).expect("size");

        assert_eq!(out[&Id::from(3)], StatValue::Int(2));
    }

    #[test]
    fn directed_sides() {
        let mut dh = DiHypergraph::new();
        dh.add_edge(vec![1, 2], vec![3]).expect("edge");

        let tails = tail_size(&dh, &[Id::from(0)], &StatSpec::new("tail_size")).expect("tail");
        let heads = head_size(&dh, &[Id::from(0)], &StatSpec::new("head_size")).expect("head");
        assert_eq!(tails[&Id::from(0)], StatValue::Int(2));
        assert_eq!(heads[&Id::from(0)], StatValue::Int(1));
    }
}
