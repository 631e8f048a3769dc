//! # Directed Hypergraph
//!
//! Edges carry a tail (senders) and a head (receivers); either side may be
//! empty. The mutation rules match [`crate::Hypergraph`]: freeze checks come
//! first, taken identifiers are skipped with a warning, and removing a node
//! leaves emptied edges in place.
//!
//! While frozen, [`DiHypergraph::unique_edge_sizes`] is memoized over
//! `tail ∪ head` sizes; [`DiHypergraph::unfreeze`] drops the memo.

use crate::attrs::AttrStore;
use crate::di_incidence::{DiEdge, DiIncidenceStore, Direction};
use crate::hypergraph::member_set;
use crate::id_alloc::IdAllocator;
use crate::network::{DirectedRead, HypergraphRead, NetworkKind};
use crate::view::View;
use crate::{AttrValue, Attrs, EntityKind, HyperweaveError, Id};
use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default)]
struct FrozenCache {
    unique_edge_sizes: OnceCell<Vec<usize>>,
}

/// A directed hypergraph.
#[derive(Debug, Clone)]
pub struct DiHypergraph {
    store: DiIncidenceStore,
    node_attrs: AttrStore,
    edge_attrs: AttrStore,
    net_attrs: Attrs,
    node_ids: IdAllocator,
    edge_ids: IdAllocator,
    frozen: bool,
    cache: FrozenCache,
}

impl Default for DiHypergraph {
    fn default() -> Self {
        Self {
            store: DiIncidenceStore::new(),
            node_attrs: AttrStore::new(EntityKind::Node),
            edge_attrs: AttrStore::new(EntityKind::Edge),
            net_attrs: Attrs::new(),
            node_ids: IdAllocator::new(),
            edge_ids: IdAllocator::new(),
            frozen: false,
            cache: FrozenCache::default(),
        }
    }
}

impl DiHypergraph {
    /// Create an empty directed hypergraph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty directed hypergraph carrying the given metadata.
    #[must_use]
    pub fn with_attrs(net_attrs: Attrs) -> Self {
        Self {
            net_attrs,
            ..Self::default()
        }
    }

    fn ensure_mutable(&self) -> Result<(), HyperweaveError> {
        if self.frozen {
            return Err(HyperweaveError::Frozen);
        }
        Ok(())
    }

    /// Check the duality invariant on both sides of every edge.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.store.is_consistent()
    }

    // -------------------------------------------------------------------------
    // Nodes
    // -------------------------------------------------------------------------

    /// Add a node. Returns `false` if it already existed.
    pub fn add_node(&mut self, node: impl Into<Id>) -> Result<bool, HyperweaveError> {
        self.ensure_mutable()?;
        Ok(self.insert_node(node.into()))
    }

    /// Add a node, merging `attrs` into its record.
    pub fn add_node_with_attrs(
        &mut self,
        node: impl Into<Id>,
        attrs: Attrs,
    ) -> Result<bool, HyperweaveError> {
        let node = node.into();
        let added = self.add_node(node.clone())?;
        self.node_attrs.merge(&node, attrs)?;
        Ok(added)
    }

    /// Add a node under a freshly allocated identifier.
    pub fn add_fresh_node(&mut self, attrs: Attrs) -> Result<Id, HyperweaveError> {
        self.ensure_mutable()?;
        let store = &self.store;
        let node = self.node_ids.allocate(|id| store.has_node(id));
        self.insert_node(node.clone());
        self.node_attrs.merge(&node, attrs)?;
        Ok(node)
    }

    /// Add several nodes. Returns how many were new.
    pub fn add_nodes_from<I, N>(&mut self, nodes: I) -> Result<usize, HyperweaveError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Id>,
    {
        self.ensure_mutable()?;
        let mut added = 0;
        for node in nodes {
            if self.add_node(node)? {
                added += 1;
            }
        }
        Ok(added)
    }

    fn insert_node(&mut self, node: Id) -> bool {
        self.node_ids.observe(&node);
        self.node_attrs.ensure(&node);
        self.store.add_node(node)
    }

    /// Remove a node from both sides of every edge. Emptied edges stay.
    pub fn remove_node(&mut self, node: &Id) -> Result<(), HyperweaveError> {
        self.ensure_mutable()?;
        self.store.remove_node(node)?;
        self.node_attrs.remove(node);
        Ok(())
    }

    /// Remove a node together with every edge it sits in, on either side.
    pub fn remove_node_strong(&mut self, node: &Id) -> Result<(), HyperweaveError> {
        self.ensure_mutable()?;
        let edges = self.store.node(node)?.edges.clone();
        for edge in &edges {
            self.store.remove_edge(edge)?;
            self.edge_attrs.remove(edge);
        }
        self.store.remove_node(node)?;
        self.node_attrs.remove(node);
        Ok(())
    }

    /// Remove several nodes. Every identifier is checked before the first
    /// removal.
    pub fn remove_nodes_from(&mut self, nodes: &[Id]) -> Result<(), HyperweaveError> {
        self.ensure_mutable()?;
        if let Some(missing) = nodes.iter().find(|n| !self.store.has_node(n)) {
            return Err(HyperweaveError::NodeNotFound(missing.clone()));
        }
        for node in nodes {
            if self.store.has_node(node) {
                self.remove_node(node)?;
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Edges
    // -------------------------------------------------------------------------

    /// Add a directed edge under a fresh identifier.
    pub fn add_edge<T, H, N, M>(&mut self, tail: T, head: H) -> Result<Id, HyperweaveError>
    where
        T: IntoIterator<Item = N>,
        H: IntoIterator<Item = M>,
        N: Into<Id>,
        M: Into<Id>,
    {
        self.ensure_mutable()?;
        let edge = self.fresh_edge_id();
        self.insert_edge(edge.clone(), member_set(tail), member_set(head), Attrs::new())?;
        Ok(edge)
    }

    /// Add a directed edge under an explicit identifier.
    ///
    /// Returns `false`, logging a warning, if the identifier is taken.
    pub fn add_edge_with_id<T, H, N, M>(
        &mut self,
        tail: T,
        head: H,
        edge: impl Into<Id>,
    ) -> Result<bool, HyperweaveError>
    where
        T: IntoIterator<Item = N>,
        H: IntoIterator<Item = M>,
        N: Into<Id>,
        M: Into<Id>,
    {
        self.ensure_mutable()?;
        let edge = edge.into();
        if self.skip_duplicate(&edge) {
            return Ok(false);
        }
        self.insert_edge(edge, member_set(tail), member_set(head), Attrs::new())?;
        Ok(true)
    }

    /// Add a directed edge with attributes; `edge = None` allocates.
    pub fn add_edge_with_attrs<T, H, N, M>(
        &mut self,
        tail: T,
        head: H,
        edge: Option<Id>,
        attrs: Attrs,
    ) -> Result<Option<Id>, HyperweaveError>
    where
        T: IntoIterator<Item = N>,
        H: IntoIterator<Item = M>,
        N: Into<Id>,
        M: Into<Id>,
    {
        self.ensure_mutable()?;
        let edge = match edge {
            Some(edge) if self.skip_duplicate(&edge) => return Ok(None),
            Some(edge) => edge,
            None => self.fresh_edge_id(),
        };
        self.insert_edge(edge.clone(), member_set(tail), member_set(head), attrs)?;
        Ok(Some(edge))
    }

    /// Add many `(tail, head)` edges under fresh identifiers.
    pub fn add_edges_from<I, T, H, N, M>(&mut self, edges: I) -> Result<Vec<Id>, HyperweaveError>
    where
        I: IntoIterator<Item = (T, H)>,
        T: IntoIterator<Item = N>,
        H: IntoIterator<Item = M>,
        N: Into<Id>,
        M: Into<Id>,
    {
        self.ensure_mutable()?;
        let mut added = Vec::new();
        for (tail, head) in edges {
            added.push(self.add_edge(tail, head)?);
        }
        Ok(added)
    }

    /// Add many edges from `(identifier, (tail, head))` pairs, skipping taken
    /// identifiers.
    pub fn add_edges_from_dict<I, E, T, H, N, M>(
        &mut self,
        edges: I,
    ) -> Result<Vec<Id>, HyperweaveError>
    where
        I: IntoIterator<Item = (E, (T, H))>,
        E: Into<Id>,
        T: IntoIterator<Item = N>,
        H: IntoIterator<Item = M>,
        N: Into<Id>,
        M: Into<Id>,
    {
        self.ensure_mutable()?;
        let mut added = Vec::new();
        for (edge, (tail, head)) in edges {
            let edge = edge.into();
            if self.add_edge_with_id(tail, head, edge.clone())? {
                added.push(edge);
            }
        }
        Ok(added)
    }

    /// Add many `(tail, head)` edges from parallel edge and identifier lists.
    pub fn add_edges_with_ids<T, H, N, M>(
        &mut self,
        edges: Vec<(T, H)>,
        ids: Vec<Id>,
    ) -> Result<Vec<Id>, HyperweaveError>
    where
        T: IntoIterator<Item = N>,
        H: IntoIterator<Item = M>,
        N: Into<Id>,
        M: Into<Id>,
    {
        self.ensure_mutable()?;
        if edges.len() != ids.len() {
            return Err(HyperweaveError::LengthMismatch {
                expected: edges.len(),
                found: ids.len(),
            });
        }
        self.add_edges_from_dict(ids.into_iter().zip(edges))
    }

    fn fresh_edge_id(&mut self) -> Id {
        let store = &self.store;
        self.edge_ids.allocate(|id| store.has_edge(id))
    }

    fn skip_duplicate(&self, edge: &Id) -> bool {
        if self.store.has_edge(edge) {
            tracing::warn!(edge = %edge, "edge identifier already exists, skipping");
            return true;
        }
        false
    }

    fn insert_edge(
        &mut self,
        edge: Id,
        tail: BTreeSet<Id>,
        head: BTreeSet<Id>,
        attrs: Attrs,
    ) -> Result<(), HyperweaveError> {
        let created = self.store.add_edge(edge.clone(), tail, head)?;
        for node in &created {
            self.node_ids.observe(node);
            self.node_attrs.ensure(node);
        }
        self.edge_ids.observe(&edge);
        self.edge_attrs.ensure(&edge);
        self.edge_attrs.merge(&edge, attrs)
    }

    /// Remove an edge, returning its former tail/head record.
    pub fn remove_edge(&mut self, edge: &Id) -> Result<DiEdge, HyperweaveError> {
        self.ensure_mutable()?;
        let record = self.store.remove_edge(edge)?;
        self.edge_attrs.remove(edge);
        Ok(record)
    }

    /// Remove several edges. Every identifier is checked before the first
    /// removal.
    pub fn remove_edges_from(&mut self, edges: &[Id]) -> Result<(), HyperweaveError> {
        self.ensure_mutable()?;
        if let Some(missing) = edges.iter().find(|e| !self.store.has_edge(e)) {
            return Err(HyperweaveError::EdgeNotFound(missing.clone()));
        }
        for edge in edges {
            if self.store.has_edge(edge) {
                self.remove_edge(edge)?;
            }
        }
        Ok(())
    }

    /// Remove every edge; nodes stay as isolated nodes.
    pub fn clear_edges(&mut self) -> Result<(), HyperweaveError> {
        self.ensure_mutable()?;
        self.store.clear_edges();
        self.edge_attrs.clear();
        Ok(())
    }

    /// Add `node` to one side of `edge`, creating the node if needed.
    pub fn add_node_to_edge(
        &mut self,
        edge: &Id,
        node: impl Into<Id>,
        side: Direction,
    ) -> Result<bool, HyperweaveError> {
        self.ensure_mutable()?;
        if !self.store.has_edge(edge) {
            return Err(HyperweaveError::EdgeNotFound(edge.clone()));
        }
        let node = node.into();
        self.insert_node(node.clone());
        self.store.add_incidence(edge, &node, side)
    }

    /// Remove `node` from one side of `edge`.
    pub fn remove_node_from_edge(
        &mut self,
        edge: &Id,
        node: &Id,
        side: Direction,
    ) -> Result<bool, HyperweaveError> {
        self.ensure_mutable()?;
        self.store.remove_incidence(edge, node, side)
    }

    // -------------------------------------------------------------------------
    // Attributes, freezing, views
    // -------------------------------------------------------------------------

    /// Set one attribute of a node.
    pub fn set_node_attr(
        &mut self,
        node: &Id,
        key: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Result<(), HyperweaveError> {
        self.ensure_mutable()?;
        self.node_attrs.set(node, key, value)
    }

    /// Merge partial records into many nodes.
    pub fn set_node_attrs(&mut self, values: BTreeMap<Id, Attrs>) -> Result<(), HyperweaveError> {
        self.ensure_mutable()?;
        self.node_attrs.set_many(values)
    }

    /// Set one attribute of an edge.
    pub fn set_edge_attr(
        &mut self,
        edge: &Id,
        key: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Result<(), HyperweaveError> {
        self.ensure_mutable()?;
        self.edge_attrs.set(edge, key, value)
    }

    /// Merge partial records into many edges.
    pub fn set_edge_attrs(&mut self, values: BTreeMap<Id, Attrs>) -> Result<(), HyperweaveError> {
        self.ensure_mutable()?;
        self.edge_attrs.set_many(values)
    }

    /// Set one whole-structure attribute.
    pub fn set_net_attr(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Result<(), HyperweaveError> {
        self.ensure_mutable()?;
        self.net_attrs.insert(key.into(), value.into());
        Ok(())
    }

    /// Disable every mutating method.
    pub fn freeze(&mut self) {
        if !self.frozen {
            tracing::debug!(
                nodes = self.store.num_nodes(),
                edges = self.store.num_edges(),
                "freezing directed hypergraph"
            );
        }
        self.frozen = true;
    }

    /// Re-enable mutation and drop memoized results.
    pub fn unfreeze(&mut self) {
        if self.frozen {
            tracing::debug!("unfreezing directed hypergraph");
        }
        self.frozen = false;
        self.cache = FrozenCache::default();
    }

    /// Read-only view over the whole structure.
    #[must_use]
    pub fn view(&self) -> View<'_> {
        View::full(self)
    }

    /// View induced by a node set.
    pub fn subhypergraph<I, N>(&self, nodes: I) -> View<'_>
    where
        I: IntoIterator<Item = N>,
        N: Into<Id>,
    {
        View::induced(self, Some(member_set(nodes)), None)
    }

    /// View over the given edges and their member nodes.
    pub fn edge_subhypergraph<I, N>(&self, edges: I) -> View<'_>
    where
        I: IntoIterator<Item = N>,
        N: Into<Id>,
    {
        View::edge_induced(self, member_set(edges))
    }

    /// Distinct `tail ∪ head` sizes, ascending. Memoized while frozen.
    pub fn unique_edge_sizes(&self) -> Vec<usize> {
        if self.frozen {
            return self
                .cache
                .unique_edge_sizes
                .get_or_init(|| self.compute_unique_edge_sizes())
                .clone();
        }
        self.compute_unique_edge_sizes()
    }

    fn compute_unique_edge_sizes(&self) -> Vec<usize> {
        let sizes: BTreeSet<usize> = self
            .store
            .edges()
            .filter_map(|e| self.store.edge(e).ok().map(|r| r.members.len()))
            .collect();
        sizes.into_iter().collect()
    }

    /// Largest edge order (size minus one); `None` without edges.
    pub fn max_edge_order(&self) -> Option<i64> {
        self.unique_edge_sizes()
            .last()
            .map(|&size| size as i64 - 1)
    }
}

// =============================================================================
// READ INTERFACE
// =============================================================================

impl HypergraphRead for DiHypergraph {
    fn kind(&self) -> NetworkKind {
        NetworkKind::DiHypergraph
    }

    fn nodes(&self) -> Box<dyn Iterator<Item = &Id> + '_> {
        Box::new(self.store.nodes())
    }

    fn edges(&self) -> Box<dyn Iterator<Item = &Id> + '_> {
        Box::new(self.store.edges())
    }

    fn has_node(&self, node: &Id) -> bool {
        self.store.has_node(node)
    }

    fn has_edge(&self, edge: &Id) -> bool {
        self.store.has_edge(edge)
    }

    fn members(&self, edge: &Id) -> Result<&BTreeSet<Id>, HyperweaveError> {
        Ok(&self.store.edge(edge)?.members)
    }

    fn memberships(&self, node: &Id) -> Result<BTreeSet<Id>, HyperweaveError> {
        Ok(self.store.node(node)?.edges.clone())
    }

    fn degree(&self, node: &Id) -> Result<usize, HyperweaveError> {
        Ok(self.store.node(node)?.edges.len())
    }

    fn node_attrs(&self, node: &Id) -> Result<&Attrs, HyperweaveError> {
        self.node_attrs.get(node)
    }

    fn edge_attrs(&self, edge: &Id) -> Result<&Attrs, HyperweaveError> {
        self.edge_attrs.get(edge)
    }

    fn net_attrs(&self) -> &Attrs {
        &self.net_attrs
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn as_directed(&self) -> Option<&dyn DirectedRead> {
        Some(self)
    }

    fn num_nodes(&self) -> usize {
        self.store.num_nodes()
    }

    fn num_edges(&self) -> usize {
        self.store.num_edges()
    }
}

impl DirectedRead for DiHypergraph {
    fn tail(&self, edge: &Id) -> Result<&BTreeSet<Id>, HyperweaveError> {
        Ok(&self.store.edge(edge)?.tail)
    }

    fn head(&self, edge: &Id) -> Result<&BTreeSet<Id>, HyperweaveError> {
        Ok(&self.store.edge(edge)?.head)
    }

    fn in_edges(&self, node: &Id) -> Result<BTreeSet<Id>, HyperweaveError> {
        Ok(self.store.node(node)?.in_edges.clone())
    }

    fn out_edges(&self, node: &Id) -> Result<BTreeSet<Id>, HyperweaveError> {
        Ok(self.store.node(node)?.out_edges.clone())
    }
}

// =============================================================================
// TESTS
// =============================================================================
