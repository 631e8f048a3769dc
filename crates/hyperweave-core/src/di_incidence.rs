//! # Directed Incidence Store
//!
//! Directed edges split their members into a tail (senders) and a head
//! (receivers). Nodes keep the matching split:
//!
//! ```text
//! edge -> { tail, head, members = tail ∪ head }
//! node -> { out_edges (node in tail), in_edges (node in head) }
//! ```
//!
//! A node may sit in both the tail and the head of the same edge. The union
//! sets are maintained alongside the split sets so undirected readers can
//! borrow them directly.

use crate::{HyperweaveError, Id};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Which side of a directed edge a node sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Sender side.
    Tail,
    /// Receiver side.
    Head,
}

/// Stored directed edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiEdge {
    /// Sender nodes.
    pub tail: BTreeSet<Id>,
    /// Receiver nodes.
    pub head: BTreeSet<Id>,
    /// `tail ∪ head`.
    pub members: BTreeSet<Id>,
}

impl DiEdge {
    fn new(tail: BTreeSet<Id>, head: BTreeSet<Id>) -> Self {
        let members = tail.union(&head).cloned().collect();
        Self {
            tail,
            head,
            members,
        }
    }

    fn refresh_members(&mut self) {
        self.members = self.tail.union(&self.head).cloned().collect();
    }
}

/// Stored directed node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiNode {
    /// Edges whose head contains this node.
    pub in_edges: BTreeSet<Id>,
    /// Edges whose tail contains this node.
    pub out_edges: BTreeSet<Id>,
    /// `in_edges ∪ out_edges`.
    pub edges: BTreeSet<Id>,
}

impl DiNode {
    fn refresh_edges(&mut self) {
        self.edges = self.in_edges.union(&self.out_edges).cloned().collect();
    }
}

/// Directed node/edge mappings kept in lockstep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiIncidenceStore {
    nodes: BTreeMap<Id, DiNode>,
    edges: BTreeMap<Id, DiEdge>,
}

impl DiIncidenceStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Whether `node` exists.
    #[must_use]
    pub fn has_node(&self, node: &Id) -> bool {
        self.nodes.contains_key(node)
    }

    /// Whether `edge` exists.
    #[must_use]
    pub fn has_edge(&self, edge: &Id) -> bool {
        self.edges.contains_key(edge)
    }

    /// All node identifiers in order.
    pub fn nodes(&self) -> impl Iterator<Item = &Id> {
        self.nodes.keys()
    }

    /// All edge identifiers in order.
    pub fn edges(&self) -> impl Iterator<Item = &Id> {
        self.edges.keys()
    }

    /// Stored edge record.
    pub fn edge(&self, edge: &Id) -> Result<&DiEdge, HyperweaveError> {
        self.edges
            .get(edge)
            .ok_or_else(|| HyperweaveError::EdgeNotFound(edge.clone()))
    }

    /// Stored node record.
    pub fn node(&self, node: &Id) -> Result<&DiNode, HyperweaveError> {
        self.nodes
            .get(node)
            .ok_or_else(|| HyperweaveError::NodeNotFound(node.clone()))
    }

    /// Check the duality invariant on both the tail and head sides.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let forward = self.edges.iter().all(|(id, edge)| {
            edge.tail.iter().all(|n| {
                self.nodes
                    .get(n)
                    .is_some_and(|node| node.out_edges.contains(id))
            }) && edge.head.iter().all(|n| {
                self.nodes
                    .get(n)
                    .is_some_and(|node| node.in_edges.contains(id))
            })
        });
        let backward = self.nodes.iter().all(|(id, node)| {
            node.out_edges.iter().all(|e| {
                self.edges
                    .get(e)
                    .is_some_and(|edge| edge.tail.contains(id))
            }) && node.in_edges.iter().all(|e| {
                self.edges
                    .get(e)
                    .is_some_and(|edge| edge.head.contains(id))
            })
        });
        forward && backward
    }

    /// Add an isolated node. Returns `false` if it already existed.
    pub fn add_node(&mut self, node: Id) -> bool {
        if self.nodes.contains_key(&node) {
            return false;
        }
        self.nodes.insert(node, DiNode::default());
        true
    }

    /// Add a directed edge, creating missing nodes. Returns the created nodes.
    pub fn add_edge(
        &mut self,
        edge: Id,
        tail: BTreeSet<Id>,
        head: BTreeSet<Id>,
    ) -> Result<Vec<Id>, HyperweaveError> {
        if self.edges.contains_key(&edge) {
            return Err(HyperweaveError::InvalidOperation(format!(
                "edge {edge} already exists"
            )));
        }

        let record = DiEdge::new(tail, head);
        let mut created = Vec::new();
        for node in &record.members {
            let entry = self.nodes.entry(node.clone()).or_insert_with(|| {
                created.push(node.clone());
                DiNode::default()
            });
            if record.tail.contains(node) {
                entry.out_edges.insert(edge.clone());
            }
            if record.head.contains(node) {
                entry.in_edges.insert(edge.clone());
            }
            entry.edges.insert(edge.clone());
        }
        self.edges.insert(edge, record);
        Ok(created)
    }

    /// Remove a node from the store and from both sides of every edge.
    /// Emptied edges are kept. Returns the edges the node belonged to.
    pub fn remove_node(&mut self, node: &Id) -> Result<BTreeSet<Id>, HyperweaveError> {
        let record = self
            .nodes
            .remove(node)
            .ok_or_else(|| HyperweaveError::NodeNotFound(node.clone()))?;
        for edge in &record.edges {
            if let Some(stored) = self.edges.get_mut(edge) {
                stored.tail.remove(node);
                stored.head.remove(node);
                stored.members.remove(node);
            }
        }
        Ok(record.edges)
    }

    /// Remove an edge and strip it from every node. Returns the former record.
    pub fn remove_edge(&mut self, edge: &Id) -> Result<DiEdge, HyperweaveError> {
        let record = self
            .edges
            .remove(edge)
            .ok_or_else(|| HyperweaveError::EdgeNotFound(edge.clone()))?;
        for node in &record.members {
            if let Some(stored) = self.nodes.get_mut(node) {
                stored.in_edges.remove(edge);
                stored.out_edges.remove(edge);
                stored.edges.remove(edge);
            }
        }
        Ok(record)
    }

    /// Add `node` to one side of `edge`. Returns `false` if already there.
    pub fn add_incidence(
        &mut self,
        edge: &Id,
        node: &Id,
        side: Direction,
    ) -> Result<bool, HyperweaveError> {
        let stored_node = self
            .nodes
            .get_mut(node)
            .ok_or_else(|| HyperweaveError::NodeNotFound(node.clone()))?;
        let stored_edge = self
            .edges
            .get_mut(edge)
            .ok_or_else(|| HyperweaveError::EdgeNotFound(edge.clone()))?;

        let inserted = match side {
            Direction::Tail => {
                stored_node.out_edges.insert(edge.clone());
                stored_edge.tail.insert(node.clone())
            }
            Direction::Head => {
                stored_node.in_edges.insert(edge.clone());
                stored_edge.head.insert(node.clone())
            }
        };
        stored_node.edges.insert(edge.clone());
        stored_edge.members.insert(node.clone());
        Ok(inserted)
    }

    /// Remove `node` from one side of `edge`. Returns `false` if it was absent.
    pub fn remove_incidence(
        &mut self,
        edge: &Id,
        node: &Id,
        side: Direction,
    ) -> Result<bool, HyperweaveError> {
        let stored_node = self
            .nodes
            .get_mut(node)
            .ok_or_else(|| HyperweaveError::NodeNotFound(node.clone()))?;
        let stored_edge = self
            .edges
            .get_mut(edge)
            .ok_or_else(|| HyperweaveError::EdgeNotFound(edge.clone()))?;

        let removed = match side {
            Direction::Tail => {
                stored_node.out_edges.remove(edge);
                stored_edge.tail.remove(node)
            }
            Direction::Head => {
                stored_node.in_edges.remove(edge);
                stored_edge.head.remove(node)
            }
        };
        stored_node.refresh_edges();
        stored_edge.refresh_members();
        Ok(removed)
    }

    /// Remove every edge, keeping nodes (now isolated).
    pub fn clear_edges(&mut self) {
        self.edges.clear();
        for record in self.nodes.values_mut() {
            *record = DiNode::default();
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
    fn add_edge_splits_node_sides() {
        let mut store = DiIncidenceStore::new();
        store
            .add_edge(Id::from(0), set(&[1, 2]), set(&[3]))
            .expect("add");

        assert_eq!(store.node(&Id::from(1)).expect("n").out_edges, set(&[0]));
        assert!(store.node(&Id::from(1)).expect("n").in_edges.is_empty());
        assert_eq!(store.node(&Id::from(3)).expect("n").in_edges, set(&[0]));
        assert_eq!(store.edge(&Id::from(0)).expect("e").members, set(&[1, 2, 3]));
        assert!(store.is_consistent());
    }

    #[test]
    fn node_on_both_sides_survives_one_side_removal() {
        let mut store = DiIncidenceStore::new();
        store
            .add_edge(Id::from(0), set(&[1]), set(&[1, 2]))
            .expect("add");

        store
            .remove_incidence(&Id::from(0), &Id::from(1), Direction::Tail)
            .expect("remove");

        let edge = store.edge(&Id::from(0)).expect("e");
        assert!(edge.tail.is_empty());
        assert_eq!(edge.members, set(&[1, 2]));
        assert_eq!(store.node(&Id::from(1)).expect("n").edges, set(&[0]));
        assert!(store.is_consistent());
    }

    #[test]
    fn remove_node_strips_both_sides() {
        let mut store = DiIncidenceStore::new();
        store
            .add_edge(Id::from(0), set(&[1]), set(&[2]))
            .expect("add");

        store.remove_node(&Id::from(2)).expect("remove");

        let edge = store.edge(&Id::from(0)).expect("e");
        assert!(edge.head.is_empty());
        assert_eq!(edge.members, set(&[1]));
        assert!(store.is_consistent());
    }

    #[test]
    fn remove_edge_returns_record() {
        let mut store = DiIncidenceStore::new();
        store
            .add_edge(Id::from(4), set(&[1]), set(&[2]))
            .expect("add");

        let record = store.remove_edge(&Id::from(4)).expect("remove");

        assert_eq!(record.tail, set(&[1]));
        assert!(store.node(&Id::from(1)).expect("n").edges.is_empty());
        assert!(store.is_consistent());
    }

    #[test]
    fn clearing_edges_isolates_nodes() {
        let mut store = DiIncidenceStore::new();
        store
            .add_edge(Id::from(0), set(&[1]), set(&[2, 3]))
            .expect("add");

        store.clear_edges();

        assert_eq!(store.num_edges(), 0);
        assert_eq!(store.num_nodes(), 3);
        assert_eq!(store.node(&Id::from(2)).expect("n"), &DiNode::default());
        assert!(store.is_consistent());
    }
}
