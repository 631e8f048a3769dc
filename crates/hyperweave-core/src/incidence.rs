//! # Dual Incidence Store
//!
//! The two symmetric mappings at the heart of every undirected structure:
//!
//! ```text
//! node_edges: node -> { edge ids }
//! edge_nodes: edge -> { node ids }
//! ```
//!
//! ## Invariant
//!
//! `e ∈ node_edges[n]` iff `n ∈ edge_nodes[e]`, after every call.
//!
//! Every operation validates its arguments before the first write, so a call
//! that returns an error leaves both mappings untouched. The work done by a
//! call is proportional to the size of the edge (or the degree of the node)
//! it touches, never to the size of the whole store.

use crate::{HyperweaveError, Id};
use std::collections::{BTreeMap, BTreeSet};

/// Node-to-edge and edge-to-node mappings kept in lockstep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidenceStore {
    node_edges: BTreeMap<Id, BTreeSet<Id>>,
    edge_nodes: BTreeMap<Id, BTreeSet<Id>>,
}

impl IncidenceStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Number of nodes.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.node_edges.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.edge_nodes.len()
    }

    /// Whether `node` exists.
    #[must_use]
    pub fn has_node(&self, node: &Id) -> bool {
        self.node_edges.contains_key(node)
    }

    /// Whether `edge` exists.
    #[must_use]
    pub fn has_edge(&self, edge: &Id) -> bool {
        self.edge_nodes.contains_key(edge)
    }

    /// All node identifiers in order.
    pub fn nodes(&self) -> impl Iterator<Item = &Id> {
        self.node_edges.keys()
    }

    /// All edge identifiers in order.
    pub fn edges(&self) -> impl Iterator<Item = &Id> {
        self.edge_nodes.keys()
    }

    /// Member nodes of `edge`.
    pub fn members(&self, edge: &Id) -> Result<&BTreeSet<Id>, HyperweaveError> {
        self.edge_nodes
            .get(edge)
            .ok_or_else(|| HyperweaveError::EdgeNotFound(edge.clone()))
    }

    /// Edges `node` belongs to.
    pub fn memberships(&self, node: &Id) -> Result<&BTreeSet<Id>, HyperweaveError> {
        self.node_edges
            .get(node)
            .ok_or_else(|| HyperweaveError::NodeNotFound(node.clone()))
    }

    /// Check the duality invariant over the whole store.
    ///
    /// This walks every incidence twice; it exists for tests and debugging.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let forward = self.edge_nodes.iter().all(|(edge, members)| {
            members.iter().all(|node| {
                self.node_edges
                    .get(node)
                    .is_some_and(|edges| edges.contains(edge))
            })
        });
        let backward = self.node_edges.iter().all(|(node, edges)| {
            edges.iter().all(|edge| {
                self.edge_nodes
                    .get(edge)
                    .is_some_and(|members| members.contains(node))
            })
        });
        forward && backward
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Add an isolated node. Returns `false` if it already existed.
    pub fn add_node(&mut self, node: Id) -> bool {
        if self.node_edges.contains_key(&node) {
            return false;
        }
        self.node_edges.insert(node, BTreeSet::new());
        true
    }

    /// Add an edge with the given members, creating missing member nodes.
    ///
    /// Returns the member nodes that did not exist before, so callers can
    /// create their attribute records.
    pub fn add_edge(
        &mut self,
        edge: Id,
        members: BTreeSet<Id>,
    ) -> Result<Vec<Id>, HyperweaveError> {
        if self.edge_nodes.contains_key(&edge) {
            return Err(HyperweaveError::InvalidOperation(format!(
                "edge {edge} already exists"
            )));
        }

        let mut created = Vec::new();
        for node in &members {
            let edges = self.node_edges.entry(node.clone()).or_insert_with(|| {
                created.push(node.clone());
                BTreeSet::new()
            });
            edges.insert(edge.clone());
        }
        self.edge_nodes.insert(edge, members);
        Ok(created)
    }

    /// Remove a node, stripping it from every edge that referenced it.
    ///
    /// Edges left empty are kept: an empty edge is a valid state.
    /// Returns the edges the node belonged to.
    pub fn remove_node(&mut self, node: &Id) -> Result<BTreeSet<Id>, HyperweaveError> {
        let edges = self
            .node_edges
            .remove(node)
            .ok_or_else(|| HyperweaveError::NodeNotFound(node.clone()))?;
        for edge in &edges {
            if let Some(members) = self.edge_nodes.get_mut(edge) {
                members.remove(node);
            }
        }
        Ok(edges)
    }

    /// Remove an edge, stripping it from each member's memberships.
    /// Returns the former members.
    pub fn remove_edge(&mut self, edge: &Id) -> Result<BTreeSet<Id>, HyperweaveError> {
        let members = self
            .edge_nodes
            .remove(edge)
            .ok_or_else(|| HyperweaveError::EdgeNotFound(edge.clone()))?;
        for node in &members {
            if let Some(edges) = self.node_edges.get_mut(node) {
                edges.remove(edge);
            }
        }
        Ok(members)
    }

    /// Add a single incidence between an existing node and an existing edge.
    /// Returns `false` if it was already present.
    pub fn add_incidence(&mut self, edge: &Id, node: &Id) -> Result<bool, HyperweaveError> {
        if !self.node_edges.contains_key(node) {
            return Err(HyperweaveError::NodeNotFound(node.clone()));
        }
        let members = self
            .edge_nodes
            .get_mut(edge)
            .ok_or_else(|| HyperweaveError::EdgeNotFound(edge.clone()))?;
        if !members.insert(node.clone()) {
            return Ok(false);
        }
        if let Some(edges) = self.node_edges.get_mut(node) {
            edges.insert(edge.clone());
        }
        Ok(true)
    }

    /// Remove a single incidence. Returns `false` if the node was not a member.
    pub fn remove_incidence(&mut self, edge: &Id, node: &Id) -> Result<bool, HyperweaveError> {
        if !self.node_edges.contains_key(node) {
            return Err(HyperweaveError::NodeNotFound(node.clone()));
        }
        let members = self
            .edge_nodes
            .get_mut(edge)
            .ok_or_else(|| HyperweaveError::EdgeNotFound(edge.clone()))?;
        if !members.remove(node) {
            return Ok(false);
        }
        if let Some(edges) = self.node_edges.get_mut(node) {
            edges.remove(edge);
        }
        Ok(true)
    }

    /// Remove every edge, keeping nodes (now isolated).
    pub fn clear_edges(&mut self) {
        self.edge_nodes.clear();
        for edges in self.node_edges.values_mut() {
            edges.clear();
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[i64]) -> BTreeSet<Id> {
        ids.iter().map(|&i| Id::from(i)).collect()
    }

    #[test]
    fn add_edge_creates_members_and_both_sides() {
        let mut store = IncidenceStore::new();
        store.add_node(Id::from(1));

        let created = store.add_edge(Id::from(0), set(&[1, 2])).expect("add");

        assert_eq!(created, vec![Id::from(2)]);
        assert_eq!(store.members(&Id::from(0)).expect("members"), &set(&[1, 2]));
        assert_eq!(store.memberships(&Id::from(2)).expect("memberships"), &set(&[0]));
        assert!(store.is_consistent());
    }

    #[test]
    fn duplicate_edge_id_leaves_store_unchanged() {
        let mut store = IncidenceStore::new();
        store.add_edge(Id::from(0), set(&[1])).expect("add");
        let before = store.clone();

        assert!(store.add_edge(Id::from(0), set(&[2, 3])).is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn remove_node_keeps_empty_edges() {
        let mut store = IncidenceStore::new();
        store.add_edge(Id::from(0), set(&[1])).expect("add");
        store.add_edge(Id::from(1), set(&[1, 2])).expect("add");

        let touched = store.remove_node(&Id::from(1)).expect("remove");

        assert_eq!(touched, set(&[0, 1]));
        assert!(store.has_edge(&Id::from(0)));
        assert!(store.members(&Id::from(0)).expect("members").is_empty());
        assert_eq!(store.members(&Id::from(1)).expect("members"), &set(&[2]));
        assert!(store.is_consistent());
    }

    #[test]
    fn remove_edge_strips_memberships() {
        let mut store = IncidenceStore::new();
        store.add_edge(Id::from(0), set(&[1, 2])).expect("add");

        store.remove_edge(&Id::from(0)).expect("remove");

        assert!(store.memberships(&Id::from(1)).expect("m").is_empty());
        assert_eq!(store.num_nodes(), 2);
        assert!(store.is_consistent());
    }

    #[test]
    fn single_incidences() {
        let mut store = IncidenceStore::new();
        store.add_node(Id::from(5));
        store.add_edge(Id::from(0), set(&[1])).expect("add");

        assert_eq!(store.add_incidence(&Id::from(0), &Id::from(5)), Ok(true));
        assert_eq!(store.add_incidence(&Id::from(0), &Id::from(5)), Ok(false));
        assert_eq!(store.remove_incidence(&Id::from(0), &Id::from(1)), Ok(true));
        assert_eq!(store.members(&Id::from(0)).expect("members"), &set(&[5]));
        assert!(store.is_consistent());
    }

    #[test]
    fn missing_ids_are_reported() {
        let mut store = IncidenceStore::new();
        assert_eq!(
            store.remove_edge(&Id::from(3)),
            Err(HyperweaveError::EdgeNotFound(Id::from(3)))
        );
        assert_eq!(
            store.memberships(&Id::from("x")),
            Err(HyperweaveError::NodeNotFound(Id::from("x")))
        );
    }
}
