//! # Views
//!
//! Read-only overlays that borrow a structure instead of copying it.
//!
//! - [`View::full`]: same node and edge universe as the source.
//! - [`View::induced`]: nodes are the requested nodes that exist in the
//!   source; edges are the source edges (optionally limited to a requested
//!   set) whose members all lie among the retained nodes. Edges partially
//!   outside are dropped, never truncated. Retained nodes may end up isolated.
//! - [`View::edge_induced`]: the requested edges plus their member nodes.
//!
//! Views have no mutating methods and always report `is_frozen() == true`.
//! The borrow they hold keeps the source alive and unmodified for the view's
//! whole lifetime. Views implement [`HypergraphRead`], so a view of a view is
//! just another view.

use crate::network::{DirectedRead, HypergraphRead, NetworkKind};
use crate::{Attrs, HyperweaveError, Id};
use std::collections::BTreeSet;

/// A read-only, optionally filtered handle onto a structure.
#[derive(Clone)]
pub struct View<'a> {
    source: &'a dyn HypergraphRead,
    nodes: Option<BTreeSet<Id>>,
    edges: Option<BTreeSet<Id>>,
}

impl std::fmt::Debug for View<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("kind", &self.source.kind())
            .field("nodes", &self.num_nodes())
            .field("edges", &self.num_edges())
            .finish()
    }
}

impl<'a> View<'a> {
    /// View over the whole source.
    #[must_use]
    pub fn full(source: &'a dyn HypergraphRead) -> Self {
        Self {
            source,
            nodes: None,
            edges: None,
        }
    }

    /// View induced by an optional node set and an optional edge set.
    #[must_use]
    pub fn induced(
        source: &'a dyn HypergraphRead,
        nodes: Option<BTreeSet<Id>>,
        edges: Option<BTreeSet<Id>>,
    ) -> Self {
        if nodes.is_none() && edges.is_none() {
            return Self::full(source);
        }

        let nodes: Option<BTreeSet<Id>> =
            nodes.map(|set| set.into_iter().filter(|n| source.has_node(n)).collect());

        let candidates: Vec<&Id> = match &edges {
            Some(set) => set.iter().filter(|e| source.has_edge(e)).collect(),
            None => source.edges().collect(),
        };
        let kept = candidates
            .into_iter()
            .filter(|e| match (&nodes, source.members(e)) {
                (Some(retained), Ok(members)) => members.is_subset(retained),
                (None, Ok(_)) => true,
                (_, Err(_)) => false,
            })
            .cloned()
            .collect();

        Self {
            source,
            nodes,
            edges: Some(kept),
        }
    }

    /// View over the given edges and the union of their members.
    #[must_use]
    pub fn edge_induced(source: &'a dyn HypergraphRead, edges: BTreeSet<Id>) -> Self {
        let edges: BTreeSet<Id> = edges.into_iter().filter(|e| source.has_edge(e)).collect();
        let nodes = edges
            .iter()
            .filter_map(|e| source.members(e).ok())
            .flat_map(|members| members.iter().cloned())
            .collect();
        Self {
            source,
            nodes: Some(nodes),
            edges: Some(edges),
        }
    }

    /// The structure this view reads from.
    #[must_use]
    pub fn source(&self) -> &'a dyn HypergraphRead {
        self.source
    }

    fn check_node(&self, node: &Id) -> Result<(), HyperweaveError> {
        if self.has_node(node) {
            Ok(())
        } else {
            Err(HyperweaveError::NodeNotFound(node.clone()))
        }
    }

    fn check_edge(&self, edge: &Id) -> Result<(), HyperweaveError> {
        if self.has_edge(edge) {
            Ok(())
        } else {
            Err(HyperweaveError::EdgeNotFound(edge.clone()))
        }
    }

    fn directed_source(&self) -> Result<&'a dyn DirectedRead, HyperweaveError> {
        self.source.as_directed().ok_or_else(|| {
            HyperweaveError::InvalidOperation("source structure is not directed".to_string())
        })
    }
}

impl HypergraphRead for View<'_> {
    fn kind(&self) -> NetworkKind {
        self.source.kind()
    }

    fn nodes(&self) -> Box<dyn Iterator<Item = &Id> + '_> {
        match &self.nodes {
            Some(set) => Box::new(set.iter()),
            None => self.source.nodes(),
        }
    }

    fn edges(&self) -> Box<dyn Iterator<Item = &Id> + '_> {
        match &self.edges {
            Some(set) => Box::new(set.iter()),
            None => self.source.edges(),
        }
    }

    fn has_node(&self, node: &Id) -> bool {
        match &self.nodes {
            Some(set) => set.contains(node),
            None => self.source.has_node(node),
        }
    }

    fn has_edge(&self, edge: &Id) -> bool {
        match &self.edges {
            Some(set) => set.contains(edge),
            None => self.source.has_edge(edge),
        }
    }

    fn members(&self, edge: &Id) -> Result<&BTreeSet<Id>, HyperweaveError> {
        self.check_edge(edge)?;
        self.source.members(edge)
    }

    fn memberships(&self, node: &Id) -> Result<BTreeSet<Id>, HyperweaveError> {
        self.check_node(node)?;
        let all = self.source.memberships(node)?;
        if self.edges.is_none() {
            return Ok(all);
        }
        Ok(all.into_iter().filter(|e| self.has_edge(e)).collect())
    }

    fn node_attrs(&self, node: &Id) -> Result<&Attrs, HyperweaveError> {
        self.check_node(node)?;
        self.source.node_attrs(node)
    }

    fn edge_attrs(&self, edge: &Id) -> Result<&Attrs, HyperweaveError> {
        self.check_edge(edge)?;
        self.source.edge_attrs(edge)
    }

    fn net_attrs(&self) -> &Attrs {
        self.source.net_attrs()
    }

    fn is_frozen(&self) -> bool {
        true
    }

    fn as_directed(&self) -> Option<&dyn DirectedRead> {
        match self.source.as_directed() {
            Some(_) => Some(self),
            None => None,
        }
    }

    fn num_nodes(&self) -> usize {
        match &self.nodes {
            Some(set) => set.len(),
            None => self.source.num_nodes(),
        }
    }

    fn num_edges(&self) -> usize {
        match &self.edges {
            Some(set) => set.len(),
            None => self.source.num_edges(),
        }
    }
}

impl DirectedRead for View<'_> {
    fn tail(&self, edge: &Id) -> Result<&BTreeSet<Id>, HyperweaveError> {
        self.check_edge(edge)?;
        self.directed_source()?.tail(edge)
    }

    fn head(&self, edge: &Id) -> Result<&BTreeSet<Id>, HyperweaveError> {
        self.check_edge(edge)?;
        self.directed_source()?.head(edge)
    }

    fn in_edges(&self, node: &Id) -> Result<BTreeSet<Id>, HyperweaveError> {
        self.check_node(node)?;
        let all = self.directed_source()?.in_edges(node)?;
        Ok(all.into_iter().filter(|e| self.has_edge(e)).collect())
    }

    fn out_edges(&self, node: &Id) -> Result<BTreeSet<Id>, HyperweaveError> {
        self.check_node(node)?;
        let all = self.directed_source()?.out_edges(node)?;
        Ok(all.into_iter().filter(|e| self.has_edge(e)).collect())
    }
}

// =============================================================================
// TESTS
// =============================================================================
