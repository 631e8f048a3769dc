//! # Hypergraph
//!
//! The undirected structure: a dual incidence store plus attribute records,
//! identifier allocators, and the freeze flag.
//!
//! ## Mutation Rules
//!
//! - Every mutating method checks the freeze flag before touching any state
//!   and fails with [`HyperweaveError::Frozen`].
//! - Explicit edge identifiers that already exist are skipped with a
//!   `warn`-level log line; the call reports `false` (or omits the edge from a
//!   batch result) and the rest of a batch continues.
//! - Removing a node strips it from its edges; edges left empty are kept.
//!
//! ## Frozen Cache
//!
//! While frozen, [`Hypergraph::unique_edge_sizes`] memoizes its result. The
//! cache is dropped on [`Hypergraph::unfreeze`].

use crate::attrs::AttrStore;
use crate::id_alloc::IdAllocator;
use crate::incidence::IncidenceStore;
use crate::network::{HypergraphRead, NetworkKind};
use crate::view::View;
use crate::{AttrValue, Attrs, EntityKind, HyperweaveError, Id};
use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// FROZEN CACHE
// =============================================================================

/// Results memoized while the structure is frozen.
#[derive(Debug, Clone, Default)]
struct FrozenCache {
    unique_edge_sizes: OnceCell<Vec<usize>>,
}

// =============================================================================
// HYPERGRAPH
// =============================================================================

/// An undirected hypergraph.
#[derive(Debug, Clone)]
pub struct Hypergraph {
    store: IncidenceStore,
    node_attrs: AttrStore,
    edge_attrs: AttrStore,
    net_attrs: Attrs,
    node_ids: IdAllocator,
    edge_ids: IdAllocator,
    frozen: bool,
    cache: FrozenCache,
}

impl Default for Hypergraph {
    fn default() -> Self {
        Self {
            store: IncidenceStore::new(),
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

/// Collect members into a deduplicated node set.
pub(crate) fn member_set<I, N>(members: I) -> BTreeSet<Id>
where
    I: IntoIterator<Item = N>,
    N: Into<Id>,
{
    members.into_iter().map(Into::into).collect()
}

impl Hypergraph {
    /// Create an empty hypergraph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty hypergraph carrying the given metadata.
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

    /// Check the duality invariant of the underlying store.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.store.is_consistent()
    }

    // -------------------------------------------------------------------------
    // Nodes
    // -------------------------------------------------------------------------

    /// Add a node. Returns `false` if it already existed (nothing changes).
    pub fn add_node(&mut self, node: impl Into<Id>) -> Result<bool, HyperweaveError> {
        self.ensure_mutable()?;
        let node = node.into();
        Ok(self.insert_node(node))
    }

    /// Add a node, merging `attrs` into its record whether or not it existed.
    pub fn add_node_with_attrs(
        &mut self,
        node: impl Into<Id>,
        attrs: Attrs,
    ) -> Result<bool, HyperweaveError> {
        self.ensure_mutable()?;
        let node = node.into();
        let added = self.insert_node(node.clone());
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
        Ok(nodes
            .into_iter()
            .map(|n| self.insert_node(n.into()))
            .filter(|added| *added)
            .count())
    }

    fn insert_node(&mut self, node: Id) -> bool {
        self.node_ids.observe(&node);
        self.node_attrs.ensure(&node);
        self.store.add_node(node)
    }

    /// Remove a node, stripping it from every edge. Emptied edges stay.
    pub fn remove_node(&mut self, node: &Id) -> Result<(), HyperweaveError> {
        self.ensure_mutable()?;
        self.store.remove_node(node)?;
        self.node_attrs.remove(node);
        Ok(())
    }

    /// Remove a node together with every edge that contains it.
    pub fn remove_node_strong(&mut self, node: &Id) -> Result<(), HyperweaveError> {
        self.ensure_mutable()?;
        let edges = self.store.memberships(node)?.clone();
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

    /// Add an edge under a freshly allocated identifier.
    pub fn add_edge<I, N>(&mut self, members: I) -> Result<Id, HyperweaveError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Id>,
    {
        self.ensure_mutable()?;
        let edge = self.fresh_edge_id();
        self.insert_edge(edge.clone(), member_set(members), Attrs::new())?;
        Ok(edge)
    }

    /// Add an edge under an explicit identifier.
    ///
    /// Returns `false`, logging a warning, if the identifier is taken.
    pub fn add_edge_with_id<I, N>(
        &mut self,
        members: I,
        edge: impl Into<Id>,
    ) -> Result<bool, HyperweaveError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Id>,
    {
        self.ensure_mutable()?;
        let edge = edge.into();
        if self.skip_duplicate(&edge) {
            return Ok(false);
        }
        self.insert_edge(edge, member_set(members), Attrs::new())?;
        Ok(true)
    }

    /// Add an edge with attributes; `edge = None` allocates an identifier.
    ///
    /// Returns the identifier used, or `None` if an explicit identifier was
    /// already taken.
    pub fn add_edge_with_attrs<I, N>(
        &mut self,
        members: I,
        edge: Option<Id>,
        attrs: Attrs,
    ) -> Result<Option<Id>, HyperweaveError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Id>,
    {
        self.ensure_mutable()?;
        let edge = match edge {
            Some(edge) if self.skip_duplicate(&edge) => return Ok(None),
            Some(edge) => edge,
            None => self.fresh_edge_id(),
        };
        self.insert_edge(edge.clone(), member_set(members), attrs)?;
        Ok(Some(edge))
    }

    /// Add an edge whose members come with node attributes.
    ///
    /// Each `(node, attrs)` pair creates or updates the node and merges the
    /// attributes into its record; the edge's member set is the set of keys.
    pub fn add_edge_with_node_attrs<I, N>(
        &mut self,
        members: I,
        edge: Option<Id>,
    ) -> Result<Option<Id>, HyperweaveError>
    where
        I: IntoIterator<Item = (N, Attrs)>,
        N: Into<Id>,
    {
        self.ensure_mutable()?;
        let pairs: Vec<(Id, Attrs)> = members.into_iter().map(|(n, a)| (n.into(), a)).collect();
        let edge = match edge {
            Some(edge) if self.skip_duplicate(&edge) => return Ok(None),
            Some(edge) => edge,
            None => self.fresh_edge_id(),
        };
        let set = pairs.iter().map(|(n, _)| n.clone()).collect();
        self.insert_edge(edge.clone(), set, Attrs::new())?;
        for (node, attrs) in pairs {
            self.node_attrs.merge(&node, attrs)?;
        }
        Ok(Some(edge))
    }

    /// Add many edges under fresh identifiers. Returns the new identifiers.
    pub fn add_edges_from<I, M, N>(&mut self, edges: I) -> Result<Vec<Id>, HyperweaveError>
    where
        I: IntoIterator<Item = M>,
        M: IntoIterator<Item = N>,
        N: Into<Id>,
    {
        self.ensure_mutable()?;
        let mut added = Vec::new();
        for members in edges {
            let edge = self.fresh_edge_id();
            self.insert_edge(edge.clone(), member_set(members), Attrs::new())?;
            added.push(edge);
        }
        Ok(added)
    }

    /// Add many edges from `(identifier, members)` pairs.
    ///
    /// Taken identifiers are skipped with a warning; the batch continues.
    /// Returns the identifiers actually added.
    pub fn add_edges_from_dict<I, E, M, N>(&mut self, edges: I) -> Result<Vec<Id>, HyperweaveError>
    where
        I: IntoIterator<Item = (E, M)>,
        E: Into<Id>,
        M: IntoIterator<Item = N>,
        N: Into<Id>,
    {
        self.ensure_mutable()?;
        let mut added = Vec::new();
        for (edge, members) in edges {
            let edge = edge.into();
            if self.skip_duplicate(&edge) {
                continue;
            }
            self.insert_edge(edge.clone(), member_set(members), Attrs::new())?;
            added.push(edge);
        }
        Ok(added)
    }

    /// Add many edges from parallel member and identifier lists.
    pub fn add_edges_with_ids<M, N>(
        &mut self,
        edges: Vec<M>,
        ids: Vec<Id>,
    ) -> Result<Vec<Id>, HyperweaveError>
    where
        M: IntoIterator<Item = N>,
        N: Into<Id>,
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

    /// Push the edge allocator past every given identifier, so identifiers
    /// inserted later in a batch never collide with allocated ones.
    pub(crate) fn reserve_edge_ids<'i, I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = &'i Id>,
    {
        for edge in edges {
            self.edge_ids.observe(edge);
        }
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
        members: BTreeSet<Id>,
        attrs: Attrs,
    ) -> Result<(), HyperweaveError> {
        let created = self.store.add_edge(edge.clone(), members)?;
        for node in &created {
            self.node_ids.observe(node);
            self.node_attrs.ensure(node);
        }
        self.edge_ids.observe(&edge);
        self.edge_attrs.ensure(&edge);
        self.edge_attrs.merge(&edge, attrs)
    }

    /// Remove an edge. Returns its former members.
    pub fn remove_edge(&mut self, edge: &Id) -> Result<BTreeSet<Id>, HyperweaveError> {
        self.ensure_mutable()?;
        let members = self.store.remove_edge(edge)?;
        self.edge_attrs.remove(edge);
        Ok(members)
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

    /// Add `node` to `edge`, creating either one if missing.
    pub fn add_node_to_edge(
        &mut self,
        edge: impl Into<Id>,
        node: impl Into<Id>,
    ) -> Result<(), HyperweaveError> {
        self.ensure_mutable()?;
        let (edge, node) = (edge.into(), node.into());
        self.insert_node(node.clone());
        if !self.store.has_edge(&edge) {
            self.insert_edge(edge.clone(), BTreeSet::new(), Attrs::new())?;
        }
        self.store.add_incidence(&edge, &node)?;
        Ok(())
    }

    /// Remove `node` from `edge`. With `remove_empty`, an edge left without
    /// members is removed as well.
    pub fn remove_node_from_edge(
        &mut self,
        edge: &Id,
        node: &Id,
        remove_empty: bool,
    ) -> Result<(), HyperweaveError> {
        self.ensure_mutable()?;
        if !self.store.remove_incidence(edge, node)? {
            return Err(HyperweaveError::InvalidOperation(format!(
                "node {node} is not a member of edge {edge}"
            )));
        }
        if remove_empty && self.store.members(edge)?.is_empty() {
            self.store.remove_edge(edge)?;
            self.edge_attrs.remove(edge);
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

    // -------------------------------------------------------------------------
    // Attributes
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

    /// Single node attribute, or `default` when absent.
    pub fn node_attr(
        &self,
        node: &Id,
        key: &str,
        default: Option<AttrValue>,
    ) -> Result<Option<AttrValue>, HyperweaveError> {
        self.node_attrs.get_key(node, key, default)
    }

    /// Single edge attribute, or `default` when absent.
    pub fn edge_attr(
        &self,
        edge: &Id,
        key: &str,
        default: Option<AttrValue>,
    ) -> Result<Option<AttrValue>, HyperweaveError> {
        self.edge_attrs.get_key(edge, key, default)
    }

    // -------------------------------------------------------------------------
    // Freezing and views
    // -------------------------------------------------------------------------

    /// Disable every mutating method.
    pub fn freeze(&mut self) {
        if !self.frozen {
            tracing::debug!(
                nodes = self.store.num_nodes(),
                edges = self.store.num_edges(),
                "freezing hypergraph"
            );
        }
        self.frozen = true;
    }

    /// Re-enable mutation and drop memoized results.
    pub fn unfreeze(&mut self) {
        if self.frozen {
            tracing::debug!("unfreezing hypergraph");
        }
        self.frozen = false;
        self.cache = FrozenCache::default();
    }

    /// Read-only view over the whole hypergraph.
    #[must_use]
    pub fn view(&self) -> View<'_> {
        View::full(self)
    }

    /// View induced by a node set: nodes are the requested nodes that exist,
    /// edges are the edges whose members all lie in that set.
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

    /// View restricted to both a node set and an edge set.
    #[must_use]
    pub fn restrict(&self, nodes: Option<BTreeSet<Id>>, edges: Option<BTreeSet<Id>>) -> View<'_> {
        View::induced(self, nodes, edges)
    }

    // -------------------------------------------------------------------------
    // Cacheable reads
    // -------------------------------------------------------------------------

    /// Distinct edge sizes, ascending. Memoized while frozen.
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
            .filter_map(|e| self.store.members(e).ok().map(BTreeSet::len))
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

impl HypergraphRead for Hypergraph {
    fn kind(&self) -> NetworkKind {
        NetworkKind::Hypergraph
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
        self.store.members(edge)
    }

    fn memberships(&self, node: &Id) -> Result<BTreeSet<Id>, HyperweaveError> {
        self.store.memberships(node).cloned()
    }

    fn degree(&self, node: &Id) -> Result<usize, HyperweaveError> {
        Ok(self.store.memberships(node)?.len())
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

    fn num_nodes(&self) -> usize {
        self.store.num_nodes()
    }

    fn num_edges(&self) -> usize {
        self.store.num_edges()
    }
}

// =============================================================================
// TESTS
// =============================================================================
