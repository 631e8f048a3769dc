//! # Hyperweave Application Library
//!
//! File loading, configuration and command dispatch for the `hyperweave`
//! binary. Exposed as a library so the commands can be driven from tests.

pub mod cli;
pub mod config;
pub mod loaders;
