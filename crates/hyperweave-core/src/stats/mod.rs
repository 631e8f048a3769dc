//! # Stats Engine
//!
//! Lazy, named, per-identifier statistics over node and edge bunches.
//!
//! ## Model
//!
//! - A stat is a registered function plus keyword parameters ([`StatSpec`])
//! - Binding it to a bunch ([`IdView`]) gives an [`IdStat`], which holds no
//!   results: every read evaluates against the structure as it is now
//! - `filterby` narrows a bunch and returns another bunch, so filters chain
//! - [`MultiStat`] reads several stats over one bunch into per-id records
//!
//! ```
//! use hyperweave_core::{FilterMode, Hypergraph, Id, StatsAccess};
//!
//! let mut hg = Hypergraph::new();
//! hg.add_edges_from(vec![vec![1, 2, 3], vec![4], vec![5, 6], vec![6, 7, 8]])?;
//!
//! let hubs = hg.node_view().filterby("degree", 2, FilterMode::Eq)?;
//! assert_eq!(hubs.ids(), vec![Id::from(6)]);
//! # Ok::<(), hyperweave_core::HyperweaveError>(())
//! ```

mod edgestats;
mod filter;
mod idview;
mod nodestats;
mod spec;
mod value;

pub use filter::{FilterArg, FilterMode};
pub use idview::{HistogramBin, IdStat, IdView, MultiStat, StatRecord};
pub use spec::{IntoStatSpec, StatEntry, StatFn, StatMap, StatSpec, lookup, registry};
pub use value::StatValue;

use crate::EntityKind;
use crate::network::HypergraphRead;

/// Bunch entry points for every readable structure.
pub trait StatsAccess: HypergraphRead {
    /// All nodes, as a bunch.
    fn node_view(&self) -> IdView<'_>;

    /// All edges, as a bunch.
    fn edge_view(&self) -> IdView<'_>;
}

impl<T: HypergraphRead> StatsAccess for T {
    fn node_view(&self) -> IdView<'_> {
        IdView::new(self, EntityKind::Node)
    }

    fn edge_view(&self) -> IdView<'_> {
        IdView::new(self, EntityKind::Edge)
    }
}
