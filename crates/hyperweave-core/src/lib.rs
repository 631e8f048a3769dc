//! # hyperweave-core
//!
//! Hypergraphs, directed hypergraphs and simplicial complexes, with a lazy
//! statistics engine on top.
//!
//! ## Layers
//!
//! - Storage: a dual incidence store per structure (`edge -> members` and
//!   `node -> memberships`, kept mirror images), plus attribute records and
//!   identifier allocation
//! - Structures: [`Hypergraph`], [`DiHypergraph`], and [`SimplicialComplex`],
//!   which keeps every face of every stored simplex present
//! - Reading: the [`HypergraphRead`] seam, implemented by every structure and
//!   by [`View`], the borrowed read-only sub-structure handle
//! - Stats: named, parametrized, per-identifier quantities evaluated on read
//!   over node or edge bunches
//! - Conversion: edge lists, edge dicts, incidence matrices, bipartite pairs,
//!   and a JSON interchange record
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no network, no file I/O
//! - Deterministic: ordered maps and sets everywhere, so iteration order is
//!   stable across runs
//! - Single owner: one logical owner mutates a structure between reads;
//!   nothing here is synchronized

// =============================================================================
// MODULES
// =============================================================================

pub mod algorithms;
pub mod attrs;
pub mod convert;
pub mod di_incidence;
pub mod dihypergraph;
pub mod hypergraph;
pub mod id_alloc;
pub mod incidence;
pub mod interchange;
pub mod network;
pub mod primitives;
pub mod simplicial;
pub mod stats;
pub mod trie;
pub mod types;
pub mod view;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{AttrValue, Attrs, EntityKind, HyperweaveError, Id, attrs};

// =============================================================================
// RE-EXPORTS: Structures
// =============================================================================

pub use di_incidence::{DiEdge, Direction};
pub use dihypergraph::DiHypergraph;
pub use hypergraph::Hypergraph;
pub use network::{DirectedRead, HypergraphRead, NetworkKind};
pub use simplicial::SimplicialComplex;
pub use view::View;

// =============================================================================
// RE-EXPORTS: Stats Engine
// =============================================================================

pub use stats::{
    FilterArg, FilterMode, HistogramBin, IdStat, IdView, IntoStatSpec, MultiStat, StatMap,
    StatSpec, StatValue, StatsAccess,
};

// =============================================================================
// RE-EXPORTS: Algorithms
// =============================================================================

pub use algorithms::{
    SimplicialityParams, connected_components, density, edit_simpliciality,
    face_edit_simpliciality, is_connected, largest_connected_component, max_number_of_subfaces,
    maximal_edges, neighbors, simplicial_fraction, unique_edge_sizes,
};

// =============================================================================
// RE-EXPORTS: Conversion
// =============================================================================

pub use convert::{
    IncidenceMatrix, from_bipartite_pairs, from_edge_dict, from_edge_list, from_incidence_matrix,
    to_bipartite_pairs, to_edge_dict, to_edge_list, to_incidence_matrix,
};
pub use interchange::{
    InterchangeRecord, Network, from_interchange, from_json, to_interchange, to_json,
};
