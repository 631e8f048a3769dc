//! # Read Interface
//!
//! The `HypergraphRead` trait is the seam between storage and everything built
//! on top of it: views, the stats engine, algorithms, and conversion all read
//! through it, so they work the same over a `Hypergraph`, a `DiHypergraph`, a
//! `SimplicialComplex`, or any view of one.
//!
//! ## Iteration
//!
//! Iterators borrow the structure. Mutating a structure while iterating it is
//! not possible through safe code: the borrow checker rejects it.

use crate::{Attrs, HyperweaveError, Id};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Which family of structure is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    /// Undirected hypergraph.
    Hypergraph,
    /// Directed hypergraph with tail/head edges.
    #[serde(rename = "dihypergraph")]
    DiHypergraph,
    /// Downward-closed simplicial complex.
    Simplicial,
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hypergraph => f.write_str("hypergraph"),
            Self::DiHypergraph => f.write_str("dihypergraph"),
            Self::Simplicial => f.write_str("simplicial"),
        }
    }
}

/// Read-only access to a node/edge incidence structure.
///
/// The trait is object safe; the stats engine works over
/// `&dyn HypergraphRead`.
pub trait HypergraphRead {
    /// The structure family.
    fn kind(&self) -> NetworkKind;

    /// All node identifiers, in order.
    fn nodes(&self) -> Box<dyn Iterator<Item = &Id> + '_>;

    /// All edge identifiers, in order.
    fn edges(&self) -> Box<dyn Iterator<Item = &Id> + '_>;

    /// Whether `node` is visible.
    fn has_node(&self, node: &Id) -> bool;

    /// Whether `edge` is visible.
    fn has_edge(&self, edge: &Id) -> bool;

    /// Member nodes of `edge` (for directed edges, `tail ∪ head`).
    fn members(&self, edge: &Id) -> Result<&BTreeSet<Id>, HyperweaveError>;

    /// Edges `node` belongs to.
    fn memberships(&self, node: &Id) -> Result<BTreeSet<Id>, HyperweaveError>;

    /// Attribute record of `node`.
    fn node_attrs(&self, node: &Id) -> Result<&Attrs, HyperweaveError>;

    /// Attribute record of `edge`.
    fn edge_attrs(&self, edge: &Id) -> Result<&Attrs, HyperweaveError>;

    /// Whole-structure metadata.
    fn net_attrs(&self) -> &Attrs;

    /// Whether mutation is disabled.
    fn is_frozen(&self) -> bool;

    /// Directed access, for directed structures only.
    fn as_directed(&self) -> Option<&dyn DirectedRead> {
        None
    }

    /// Number of visible nodes.
    fn num_nodes(&self) -> usize {
        self.nodes().count()
    }

    /// Number of visible edges.
    fn num_edges(&self) -> usize {
        self.edges().count()
    }

    /// Number of edges `node` belongs to.
    fn degree(&self, node: &Id) -> Result<usize, HyperweaveError> {
        Ok(self.memberships(node)?.len())
    }

    /// Members of every edge.
    fn members_map(&self) -> BTreeMap<Id, BTreeSet<Id>> {
        self.edges()
            .filter_map(|e| self.members(e).ok().map(|m| (e.clone(), m.clone())))
            .collect()
    }

    /// Memberships of every node.
    fn memberships_map(&self) -> BTreeMap<Id, BTreeSet<Id>> {
        self.nodes()
            .filter_map(|n| self.memberships(n).ok().map(|m| (n.clone(), m)))
            .collect()
    }
}

/// Read-only access to the tail/head split of a directed structure.
pub trait DirectedRead: HypergraphRead {
    /// Sender nodes of `edge`.
    fn tail(&self, edge: &Id) -> Result<&BTreeSet<Id>, HyperweaveError>;

    /// Receiver nodes of `edge`.
    fn head(&self, edge: &Id) -> Result<&BTreeSet<Id>, HyperweaveError>;

    /// Edges whose head contains `node`.
    fn in_edges(&self, node: &Id) -> Result<BTreeSet<Id>, HyperweaveError>;

    /// Edges whose tail contains `node`.
    fn out_edges(&self, node: &Id) -> Result<BTreeSet<Id>, HyperweaveError>;
}
