//! # Construction Forms
//!
//! The four tabular forms a structure can be built from and exported to:
//!
//! | Form | Shape |
//! |------|-------|
//! | edge list | ordered member sets, identifiers `0..n` |
//! | edge dict | edge identifier to member set |
//! | incidence matrix | rows = nodes, columns = edges, nonzero = incident |
//! | bipartite pairs | `(node, edge)` rows |
//!
//! Equivalent data gives the same node set, edge set and `members()` in every
//! form. The only loss is in the pair form, which has no row for isolated
//! nodes or empty edges.

use crate::network::HypergraphRead;
use crate::{Hypergraph, HyperweaveError, Id};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// EDGE LIST / EDGE DICT
// =============================================================================

/// Build a hypergraph whose edges get identifiers `0..n` in input order.
pub fn from_edge_list<I, M, N>(edges: I) -> Result<Hypergraph, HyperweaveError>
where
    I: IntoIterator<Item = M>,
    M: IntoIterator<Item = N>,
    N: Into<Id>,
{
    let mut hg = Hypergraph::new();
    hg.add_edges_from(edges)?;
    Ok(hg)
}

/// Member sets in edge order.
pub fn to_edge_list<N: HypergraphRead + ?Sized>(net: &N) -> Vec<BTreeSet<Id>> {
    net.edges()
        .filter_map(|e| net.members(e).ok().cloned())
        .collect()
}

/// Build a hypergraph from `(edge, members)` pairs.
pub fn from_edge_dict<I, E, M, N>(edges: I) -> Result<Hypergraph, HyperweaveError>
where
    I: IntoIterator<Item = (E, M)>,
    E: Into<Id>,
    M: IntoIterator<Item = N>,
    N: Into<Id>,
{
    let mut hg = Hypergraph::new();
    hg.add_edges_from_dict(edges)?;
    Ok(hg)
}

pub fn to_edge_dict<N: HypergraphRead + ?Sized>(net: &N) -> BTreeMap<Id, BTreeSet<Id>> {
    net.members_map()
}

// =============================================================================
// INCIDENCE MATRIX
// =============================================================================

/// Dense node-by-edge incidence matrix with its row and column identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidenceMatrix {
    /// Row identifiers.
    pub nodes: Vec<Id>,
    /// Column identifiers.
    pub edges: Vec<Id>,
    /// `rows[i][j] != 0` iff `nodes[i]` is a member of `edges[j]`.
    pub rows: Vec<Vec<u8>>,
}

impl IncidenceMatrix {
    /// A matrix with rows and columns identified by their positions.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, HyperweaveError> {
        let width = rows.first().map_or(0, Vec::len);
        let matrix = Self {
            nodes: (0..rows.len()).map(Id::from).collect(),
            edges: (0..width).map(Id::from).collect(),
            rows,
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Check that the shape matches the identifier indexes.
    pub fn validate(&self) -> Result<(), HyperweaveError> {
        if self.rows.len() != self.nodes.len() {
            return Err(HyperweaveError::LengthMismatch {
                expected: self.nodes.len(),
                found: self.rows.len(),
            });
        }
        if let Some(row) = self.rows.iter().find(|r| r.len() != self.edges.len()) {
            return Err(HyperweaveError::LengthMismatch {
                expected: self.edges.len(),
                found: row.len(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.nodes.len(), self.edges.len())
    }
}

/// Build a hypergraph from an incidence matrix.
///
/// Zero rows become isolated nodes and zero columns become empty edges.
pub fn from_incidence_matrix(matrix: &IncidenceMatrix) -> Result<Hypergraph, HyperweaveError> {
    matrix.validate()?;
    let mut hg = Hypergraph::new();
    hg.add_nodes_from(matrix.nodes.iter().cloned())?;
    for (j, edge) in matrix.edges.iter().enumerate() {
        let members = matrix
            .nodes
            .iter()
            .zip(&matrix.rows)
            .filter(|(_, row)| row[j] != 0)
            .map(|(node, _)| node.clone());
        hg.add_edge_with_id(members, edge.clone())?;
    }
    Ok(hg)
}

/// Incidence matrix with nodes and edges in iteration order.
pub fn to_incidence_matrix<N: HypergraphRead + ?Sized>(net: &N) -> IncidenceMatrix {
    let nodes: Vec<Id> = net.nodes().cloned().collect();
    let edges: Vec<Id> = net.edges().cloned().collect();
    let column: BTreeMap<&Id, usize> = edges.iter().enumerate().map(|(j, e)| (e, j)).collect();

    let rows = nodes
        .iter()
        .map(|node| {
            let mut row = vec![0u8; edges.len()];
            for edge in net.memberships(node).unwrap_or_default() {
                if let Some(&j) = column.get(&edge) {
                    row[j] = 1;
                }
            }
            row
        })
        .collect();

    IncidenceMatrix { nodes, edges, rows }
}

// =============================================================================
// BIPARTITE PAIRS
// =============================================================================

/// Build a hypergraph from `(node, edge)` rows. Edges keep the identifiers
/// given in the edge column.
pub fn from_bipartite_pairs<I, N, E>(pairs: I) -> Result<Hypergraph, HyperweaveError>
where
    I: IntoIterator<Item = (N, E)>,
    N: Into<Id>,
    E: Into<Id>,
{
    let mut order: Vec<Id> = Vec::new();
    let mut grouped: BTreeMap<Id, BTreeSet<Id>> = BTreeMap::new();
    for (node, edge) in pairs {
        let edge = edge.into();
        if !grouped.contains_key(&edge) {
            order.push(edge.clone());
        }
        grouped.entry(edge).or_default().insert(node.into());
    }

    let mut hg = Hypergraph::new();
    for edge in order {
        let members = grouped.remove(&edge).unwrap_or_default();
        hg.add_edge_with_id(members, edge)?;
    }
    Ok(hg)
}

/// `(node, edge)` rows, grouped by edge.
pub fn to_bipartite_pairs<N: HypergraphRead + ?Sized>(net: &N) -> Vec<(Id, Id)> {
    let mut pairs = Vec::new();
    for edge in net.edges() {
        if let Ok(members) = net.members(edge) {
            pairs.extend(members.iter().map(|n| (n.clone(), edge.clone())));
        }
    }
    pairs
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn edges() -> Vec<Vec<i64>> {
        vec![vec![1, 2, 3], vec![4], vec![5, 6], vec![6, 7, 8]]
    }

    #[test]
    fn four_forms_agree() {
        let from_list = from_edge_list(edges()).expect("list");
        let from_dict = from_edge_dict(edges().into_iter().enumerate()).expect("dict");
        let from_matrix =
            from_incidence_matrix(&to_incidence_matrix(&from_list)).expect("matrix");
        let from_pairs = from_bipartite_pairs(to_bipartite_pairs(&from_list)).expect("pairs");

        let expected = from_list.members_map();
        for other in [&from_dict, &from_matrix, &from_pairs] {
            assert_eq!(other.members_map(), expected);
            assert_eq!(
                other.nodes().collect::<Vec<_>>(),
                from_list.nodes().collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn matrix_keeps_isolated_nodes_and_empty_edges() {
        let matrix = IncidenceMatrix::from_rows(vec![vec![1, 0], vec![1, 0], vec![0, 0]])
            .expect("matrix");
        let hg = from_incidence_matrix(&matrix).expect("hypergraph");

        assert_eq!(hg.num_nodes(), 3);
        assert_eq!(hg.degree(&Id::from(2)).expect("degree"), 0);
        assert!(hg.members(&Id::from(1)).expect("members").is_empty());
        assert_eq!(to_incidence_matrix(&hg), matrix);
    }

    #[test]
    fn ragged_matrix_is_rejected() {
        let result = IncidenceMatrix::from_rows(vec![vec![1, 0], vec![1]]);
        assert_eq!(
            result,
            Err(HyperweaveError::LengthMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn pairs_keep_string_edge_ids() {
        let hg = from_bipartite_pairs(vec![(1, "a"), (2, "a"), (2, "b")]).expect("pairs");

        assert_eq!(
            to_edge_dict(&hg),
            [
                (Id::from("a"), [Id::from(1), Id::from(2)].into_iter().collect()),
                (Id::from("b"), [Id::from(2)].into_iter().collect()),
            ]
            .into_iter()
            .collect()
        );
        assert_eq!(to_edge_list(&hg).len(), 2);
    }
}
