//! # Algorithms
//!
//! Whole-structure computations that only need the read interface, so they
//! run unchanged over structures and views:
//!
//! - neighborhoods, maximal edges, density (`structure`)
//! - connected components (`structure`)
//! - simpliciality metrics over a subset trie (`simpliciality`)

pub mod simpliciality;
mod structure;

pub use simpliciality::{
    SimplicialityParams, edit_simpliciality, face_edit_simpliciality, max_number_of_subfaces,
    simplicial_fraction,
};
pub use structure::*;
