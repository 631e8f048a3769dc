//! # Simplicial Complex
//!
//! A [`Hypergraph`] whose edge set is downward closed: every face of a stored
//! simplex with at least [`MIN_FACE_SIZE`] nodes is itself stored.
//!
//! ## Closure Maintenance
//!
//! Inserting a simplex enumerates its proper subsets of size
//! `MIN_FACE_SIZE..len` and stores those not already present, each under a
//! fresh identifier. Every subset is reached by enumeration, so no recursion
//! is needed. Re-inserting a stored node set (in any order) is a no-op.
//!
//! ## Removal
//!
//! Removal does not restore closure:
//!
//! - [`SimplicialComplex::remove_simplex_id`] removes exactly that identifier.
//!   Removing `{2,3}` from the closure of `{1,2,3}` leaves `{1,2}`, `{1,3}`
//!   and `{1,2,3}` in place, so the complex is no longer closed.
//! - [`SimplicialComplex::remove_node`] strips the node from every simplex.
//!   Shrunken simplices stay, even when empty or equal to another stored
//!   simplex.
//! - [`SimplicialComplex::remove_simplex_with_cofaces`] removes a simplex and
//!   every stored simplex containing it, which keeps a closed complex closed.
//!
//! There is no plain-edge insertion method; edges only enter through the
//! simplex path.

use crate::algorithms::simpliciality::max_number_of_subfaces;
use crate::hypergraph::{Hypergraph, member_set};
use crate::network::{HypergraphRead, NetworkKind};
use crate::primitives::MIN_FACE_SIZE;
use crate::trie::{NodeCodes, SubsetTrie, combinations};
use crate::view::View;
use crate::{AttrValue, Attrs, HyperweaveError, Id};
use std::collections::{BTreeMap, BTreeSet};

/// A downward-closed set of simplices.
#[derive(Debug, Clone, Default)]
pub struct SimplicialComplex {
    inner: Hypergraph,
    codes: NodeCodes,
    trie: SubsetTrie,
}

/// Outcome of one closed insertion.
struct Inserted {
    simplex: Option<Id>,
    stored: Vec<Id>,
}

impl SimplicialComplex {
    /// Create an empty complex.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty complex carrying the given metadata.
    #[must_use]
    pub fn with_attrs(net_attrs: Attrs) -> Self {
        Self {
            inner: Hypergraph::with_attrs(net_attrs),
            ..Self::default()
        }
    }

    fn ensure_mutable(&self) -> Result<(), HyperweaveError> {
        if self.inner.is_frozen() {
            return Err(HyperweaveError::Frozen);
        }
        Ok(())
    }

    /// The underlying hypergraph, read-only.
    #[must_use]
    pub fn as_hypergraph(&self) -> &Hypergraph {
        &self.inner
    }

    // -------------------------------------------------------------------------
    // Nodes
    // -------------------------------------------------------------------------

    /// Add an isolated node. Returns `false` if it already existed.
    pub fn add_node(&mut self, node: impl Into<Id>) -> Result<bool, HyperweaveError> {
        self.inner.add_node(node)
    }

    /// Add a node, merging `attrs` into its record.
    pub fn add_node_with_attrs(
        &mut self,
        node: impl Into<Id>,
        attrs: Attrs,
    ) -> Result<bool, HyperweaveError> {
        self.inner.add_node_with_attrs(node, attrs)
    }

    /// Add several isolated nodes. Returns how many were new.
    pub fn add_nodes_from<I, N>(&mut self, nodes: I) -> Result<usize, HyperweaveError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Id>,
    {
        self.inner.add_nodes_from(nodes)
    }

    /// Remove a node, stripping it from every simplex that contains it.
    /// The shrunken simplices are kept.
    pub fn remove_node(&mut self, node: &Id) -> Result<(), HyperweaveError> {
        self.ensure_mutable()?;
        let simplices = self.inner.memberships(node)?;
        for simplex in &simplices {
            self.unindex(simplex)?;
        }
        self.inner.remove_node(node)?;
        for simplex in &simplices {
            self.index(simplex)?;
        }
        tracing::debug!(node = %node, simplices = simplices.len(), "stripped node from simplices");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Simplices
    // -------------------------------------------------------------------------

    /// Add a simplex and its missing faces.
    ///
    /// Returns the new simplex identifier, or `None` if the node set was
    /// already stored.
    pub fn add_simplex<I, N>(&mut self, members: I) -> Result<Option<Id>, HyperweaveError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Id>,
    {
        Ok(self
            .insert_closed(member_set(members), None, Attrs::new(), None)?
            .simplex)
    }

    /// Add a simplex under an explicit identifier.
    ///
    /// Returns `false` if the identifier is taken (logged) or the node set is
    /// already stored.
    pub fn add_simplex_with_id<I, N>(
        &mut self,
        members: I,
        simplex: impl Into<Id>,
    ) -> Result<bool, HyperweaveError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Id>,
    {
        let inserted =
            self.insert_closed(member_set(members), Some(simplex.into()), Attrs::new(), None)?;
        Ok(inserted.simplex.is_some())
    }

    /// Add a simplex with attributes; `simplex = None` allocates.
    pub fn add_simplex_with_attrs<I, N>(
        &mut self,
        members: I,
        simplex: Option<Id>,
        attrs: Attrs,
    ) -> Result<Option<Id>, HyperweaveError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Id>,
    {
        Ok(self
            .insert_closed(member_set(members), simplex, attrs, None)?
            .simplex)
    }

    /// Add many simplices. With `max_order = Some(k)`, simplices with more
    /// than `k + 1` nodes are replaced by their faces of `k + 1` nodes.
    ///
    /// Returns every identifier stored by the call, faces included.
    pub fn add_simplices_from<I, M, N>(
        &mut self,
        simplices: I,
        max_order: Option<usize>,
    ) -> Result<Vec<Id>, HyperweaveError>
    where
        I: IntoIterator<Item = M>,
        M: IntoIterator<Item = N>,
        N: Into<Id>,
    {
        self.ensure_mutable()?;
        let mut stored = Vec::new();
        for members in simplices {
            let inserted =
                self.insert_closed(member_set(members), None, Attrs::new(), max_order)?;
            stored.extend(inserted.stored);
        }
        Ok(stored)
    }

    /// Add many simplices from `(identifier, members)` pairs. Taken
    /// identifiers are skipped with a warning.
    ///
    /// A named simplex cannot be truncated: if any simplex has more than
    /// `max_order + 1` nodes the call fails before inserting anything.
    pub fn add_simplices_from_dict<I, E, M, N>(
        &mut self,
        simplices: I,
        max_order: Option<usize>,
    ) -> Result<Vec<Id>, HyperweaveError>
    where
        I: IntoIterator<Item = (E, M)>,
        E: Into<Id>,
        M: IntoIterator<Item = N>,
        N: Into<Id>,
    {
        self.ensure_mutable()?;
        let simplices: Vec<(Id, BTreeSet<Id>)> = simplices
            .into_iter()
            .map(|(simplex, members)| (simplex.into(), member_set(members)))
            .collect();
        if let Some(k) = max_order {
            if let Some((simplex, members)) = simplices.iter().find(|(_, m)| m.len() > k + 1) {
                return Err(HyperweaveError::InvalidOperation(format!(
                    "simplex {simplex} has {} nodes, more than max_order {k} allows",
                    members.len()
                )));
            }
        }

        let mut stored = Vec::new();
        for (simplex, members) in simplices {
            let inserted = self.insert_closed(members, Some(simplex), Attrs::new(), None)?;
            stored.extend(inserted.stored);
        }
        Ok(stored)
    }

    /// Store a simplex exactly as recorded: its faces are closed as usual,
    /// but a node set that is empty or already stored under another
    /// identifier is kept as a separate simplex. Fails if the identifier is
    /// taken.
    pub(crate) fn restore_simplex(
        &mut self,
        members: BTreeSet<Id>,
        simplex: Id,
        attrs: Attrs,
    ) -> Result<(), HyperweaveError> {
        if self.inner.has_edge(&simplex) {
            return Err(HyperweaveError::MalformedInput(format!(
                "simplex {simplex} is recorded twice"
            )));
        }
        let key = self.codes.lookup_key(&members);
        if members.is_empty() || key.is_some_and(|k| self.trie.contains(&k)) {
            self.inner
                .add_edge_with_attrs(members, Some(simplex), attrs)?;
            return Ok(());
        }
        self.insert_closed(members, Some(simplex), attrs, None)?;
        Ok(())
    }

    /// Reserve recorded identifiers so faces allocated during a restore
    /// never take an identifier that appears later in the record.
    pub(crate) fn reserve_simplex_ids<'i, I>(&mut self, simplices: I)
    where
        I: IntoIterator<Item = &'i Id>,
    {
        self.inner.reserve_edge_ids(simplices);
    }

    fn insert_closed(
        &mut self,
        members: BTreeSet<Id>,
        explicit: Option<Id>,
        attrs: Attrs,
        max_order: Option<usize>,
    ) -> Result<Inserted, HyperweaveError> {
        self.ensure_mutable()?;
        if members.is_empty() {
            return Err(HyperweaveError::InvalidOperation(
                "a simplex needs at least one node".to_string(),
            ));
        }
        if let Some(id) = &explicit {
            if self.inner.has_edge(id) {
                tracing::warn!(simplex = %id, "simplex identifier already exists, skipping");
                return Ok(Inserted {
                    simplex: None,
                    stored: Vec::new(),
                });
            }
        }

        let mut coded: Vec<(u32, Id)> = members
            .iter()
            .map(|n| (self.codes.intern(n), n.clone()))
            .collect();
        coded.sort_unstable_by_key(|(code, _)| *code);

        let limit = max_order.map_or(coded.len(), |k| (k + 1).min(coded.len()));
        let mut stored = Vec::new();
        let mut simplex = None;

        if limit == coded.len() {
            simplex = self.store_face(&coded, explicit, attrs)?;
            stored.extend(simplex.clone());
        }
        for size in (MIN_FACE_SIZE..=limit).rev() {
            if size == coded.len() {
                continue;
            }
            for face in combinations(&coded, size) {
                stored.extend(self.store_face(&face, None, Attrs::new())?);
            }
        }

        if !stored.is_empty() {
            tracing::debug!(size = coded.len(), stored = stored.len(), "inserted simplex faces");
        }
        Ok(Inserted { simplex, stored })
    }

    /// Store one code-sorted node set unless already present.
    fn store_face(
        &mut self,
        face: &[(u32, Id)],
        explicit: Option<Id>,
        attrs: Attrs,
    ) -> Result<Option<Id>, HyperweaveError> {
        let key: Vec<u32> = face.iter().map(|(code, _)| *code).collect();
        if self.trie.contains(&key) {
            return Ok(None);
        }
        let nodes = face.iter().map(|(_, node)| node.clone());
        let Some(id) = self.inner.add_edge_with_attrs(nodes, explicit, attrs)? else {
            return Ok(None);
        };
        self.trie.insert(&key, id.clone());
        Ok(Some(id))
    }

    /// Index a stored simplex under its current node set, unless the set is
    /// empty or already indexed.
    fn index(&mut self, simplex: &Id) -> Result<(), HyperweaveError> {
        let key = self.codes.key_of(self.inner.members(simplex)?);
        if !key.is_empty() && !self.trie.contains(&key) {
            self.trie.insert(&key, simplex.clone());
        }
        Ok(())
    }

    /// Drop the index entry of a stored simplex. Another simplex with the
    /// same node set takes its place.
    fn unindex(&mut self, simplex: &Id) -> Result<(), HyperweaveError> {
        let members = self.inner.members(simplex)?;
        let Some(key) = self.codes.lookup_key(members) else {
            return Ok(());
        };
        if self.trie.get(&key) != Some(simplex) {
            return Ok(());
        }
        self.trie.remove(&key);

        let twin = match members.first() {
            Some(node) => self
                .inner
                .memberships(node)?
                .into_iter()
                .find(|other| {
                    other != simplex && self.inner.members(other).ok() == Some(members)
                }),
            None => None,
        };
        if let Some(twin) = twin {
            self.trie.insert(&key, twin);
        }
        Ok(())
    }

    /// Remove exactly one simplex. Its faces and cofaces stay.
    ///
    /// Returns the former members.
    pub fn remove_simplex_id(&mut self, simplex: &Id) -> Result<BTreeSet<Id>, HyperweaveError> {
        self.ensure_mutable()?;
        self.unindex(simplex)?;
        self.inner.remove_edge(simplex)
    }

    /// Remove several simplices, each exactly. Every identifier is checked
    /// first.
    pub fn remove_simplex_ids_from(&mut self, simplices: &[Id]) -> Result<(), HyperweaveError> {
        self.ensure_mutable()?;
        if let Some(missing) = simplices.iter().find(|s| !self.inner.has_edge(s)) {
            return Err(HyperweaveError::EdgeNotFound(missing.clone()));
        }
        for simplex in simplices {
            // Listed twice.
            if self.inner.has_edge(simplex) {
                self.remove_simplex_id(simplex)?;
            }
        }
        Ok(())
    }

    /// Remove a simplex and every stored simplex containing it.
    ///
    /// Returns the removed identifiers, the requested one first.
    pub fn remove_simplex_with_cofaces(
        &mut self,
        simplex: &Id,
    ) -> Result<Vec<Id>, HyperweaveError> {
        self.ensure_mutable()?;
        let key = self
            .codes
            .lookup_key(self.inner.members(simplex)?)
            .unwrap_or_default();
        self.remove_simplex_id(simplex)?;

        let mut removed = vec![simplex.clone()];
        while !key.is_empty() {
            let cofaces = self.trie.supersets(&key);
            if cofaces.is_empty() {
                break;
            }
            for coface in cofaces {
                self.remove_simplex_id(&coface)?;
                removed.push(coface);
            }
        }
        if removed.len() > 1 {
            tracing::debug!(simplex = %simplex, cofaces = removed.len() - 1, "pruned cofaces");
        }
        Ok(removed)
    }

    // -------------------------------------------------------------------------
    // Simplex queries
    // -------------------------------------------------------------------------

    /// Identifier of the simplex with exactly these nodes.
    pub fn simplex_id<'n, I>(&self, members: I) -> Option<Id>
    where
        I: IntoIterator<Item = &'n Id>,
    {
        let key = self.codes.lookup_key(members)?;
        self.trie.get(&key).cloned()
    }

    /// Whether a simplex with exactly these nodes is stored.
    pub fn has_simplex<'n, I>(&self, members: I) -> bool
    where
        I: IntoIterator<Item = &'n Id>,
    {
        self.simplex_id(members).is_some()
    }

    /// Whether these nodes are a face of some stored simplex (a simplex is a
    /// face of itself).
    pub fn is_face<'n, I>(&self, members: I) -> bool
    where
        I: IntoIterator<Item = &'n Id>,
    {
        self.codes
            .lookup_key(members)
            .is_some_and(|key| self.trie.has_superset(&key))
    }

    /// Number of stored proper faces with at least `min_size` nodes.
    pub fn count_subfaces<'n, I>(&self, members: I, min_size: usize) -> usize
    where
        I: IntoIterator<Item = &'n Id>,
    {
        let Some(key) = self.codes.lookup_key(members) else {
            return 0;
        };
        match key.len().checked_sub(1) {
            Some(max_size) => self.trie.count_subsets(&key, min_size, max_size),
            None => 0,
        }
    }

    /// Whether the stored edge set is downward closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.edges().all(|edge| {
            self.inner.members(edge).is_ok_and(|members| {
                self.count_subfaces(members, MIN_FACE_SIZE)
                    == max_number_of_subfaces(MIN_FACE_SIZE, members.len())
            })
        })
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
        self.inner.set_node_attr(node, key, value)
    }

    /// Merge attribute records into several nodes.
    pub fn set_node_attrs(&mut self, values: BTreeMap<Id, Attrs>) -> Result<(), HyperweaveError> {
        self.inner.set_node_attrs(values)
    }

    /// Set one attribute of a simplex.
    pub fn set_edge_attr(
        &mut self,
        simplex: &Id,
        key: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Result<(), HyperweaveError> {
        self.inner.set_edge_attr(simplex, key, value)
    }

    /// Merge attribute records into several simplices.
    pub fn set_edge_attrs(&mut self, values: BTreeMap<Id, Attrs>) -> Result<(), HyperweaveError> {
        self.inner.set_edge_attrs(values)
    }

    /// Set one attribute of the complex itself.
    pub fn set_net_attr(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Result<(), HyperweaveError> {
        self.inner.set_net_attr(key, value)
    }

    /// Disable every mutating method.
    pub fn freeze(&mut self) {
        self.inner.freeze();
    }

    /// Re-enable mutation and drop memoized results.
    pub fn unfreeze(&mut self) {
        self.inner.unfreeze();
    }

    /// Read-only view over the whole complex.
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

    /// Distinct simplex sizes, ascending. Memoized while frozen.
    pub fn unique_edge_sizes(&self) -> Vec<usize> {
        self.inner.unique_edge_sizes()
    }

    /// Dimension of the largest simplex.
    pub fn max_edge_order(&self) -> Option<i64> {
        self.inner.max_edge_order()
    }
}

// =============================================================================
// READ INTERFACE
// =============================================================================

impl HypergraphRead for SimplicialComplex {
    fn kind(&self) -> NetworkKind {
        NetworkKind::Simplicial
    }

    fn nodes(&self) -> Box<dyn Iterator<Item = &Id> + '_> {
        self.inner.nodes()
    }

    fn edges(&self) -> Box<dyn Iterator<Item = &Id> + '_> {
        self.inner.edges()
    }

    fn has_node(&self, node: &Id) -> bool {
        self.inner.has_node(node)
    }

    fn has_edge(&self, edge: &Id) -> bool {
        self.inner.has_edge(edge)
    }

    fn members(&self, edge: &Id) -> Result<&BTreeSet<Id>, HyperweaveError> {
        self.inner.members(edge)
    }

    fn memberships(&self, node: &Id) -> Result<BTreeSet<Id>, HyperweaveError> {
        self.inner.memberships(node)
    }

    fn degree(&self, node: &Id) -> Result<usize, HyperweaveError> {
        self.inner.degree(node)
    }

    fn node_attrs(&self, node: &Id) -> Result<&Attrs, HyperweaveError> {
        self.inner.node_attrs(node)
    }

    fn edge_attrs(&self, edge: &Id) -> Result<&Attrs, HyperweaveError> {
        self.inner.edge_attrs(edge)
    }

    fn net_attrs(&self) -> &Attrs {
        self.inner.net_attrs()
    }

    fn is_frozen(&self) -> bool {
        self.inner.is_frozen()
    }

    fn num_nodes(&self) -> usize {
        self.inner.num_nodes()
    }

    fn num_edges(&self) -> usize {
        self.inner.num_edges()
    }
}

// =============================================================================
// TESTS
// =============================================================================
