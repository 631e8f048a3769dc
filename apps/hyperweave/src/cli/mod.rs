//! # Hyperweave CLI Module
//!
//! This module implements the CLI interface for Hyperweave.
//!
//! ## Available Commands
//!
//! - `info` - Summarize the loaded structure
//! - `stats` - Evaluate node or edge stats, optionally filtered
//! - `hist` - Histogram of one stat
//! - `simpliciality` - Simplicial fraction, edit and face-edit simpliciality
//! - `components` - Connected components
//! - `convert` - Write the structure in another format

mod commands;

use crate::config::Config;
use crate::loaders::{InputFormat, NodeType, OutputFormat};
use clap::{Parser, Subcommand, ValueEnum};
use hyperweave_core::{EntityKind, HyperweaveError};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Hyperweave - hypergraph and simplicial complex tools
///
/// Loads a hypergraph, directed hypergraph or simplicial complex from a file
/// and reports structure, statistics and simpliciality.
#[derive(Parser, Debug)]
#[command(name = "hyperweave")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Input file
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// Input format
    #[arg(short = 'f', long, global = true, value_enum, default_value_t = InputFormat::Json)]
    pub format: InputFormat,

    /// How edge-list and pair tokens become identifiers
    #[arg(long, global = true, value_enum, default_value_t = NodeType::Int)]
    pub node_type: NodeType,

    /// Column delimiter for text inputs (default: whitespace)
    #[arg(short, long, global = true)]
    pub delimiter: Option<char>,

    /// Configuration file (default: ./hyperweave.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Which bunch a stat command reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Target {
    #[default]
    Nodes,
    Edges,
}

impl From<Target> for EntityKind {
    fn from(target: Target) -> Self {
        match target {
            Target::Nodes => Self::Node,
            Target::Edges => Self::Edge,
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize the structure
    Info,

    /// Evaluate stats over nodes or edges
    Stats {
        /// Bunch to read
        #[arg(long, value_enum, default_value_t = Target::Nodes)]
        on: Target,

        /// Stat spec, e.g. `degree` or `degree(order=2)`; repeatable
        #[arg(short, long = "stat", required = true)]
        stats: Vec<String>,

        /// Filter applied first: "<stat> <mode> <value>[,<value>]"
        #[arg(long)]
        filter: Option<String>,
    },

    /// Histogram of one stat
    Hist {
        /// Bunch to read
        #[arg(long, value_enum, default_value_t = Target::Nodes)]
        on: Target,

        /// Stat spec
        #[arg(short, long)]
        stat: String,

        /// Number of bins (overrides the config file)
        #[arg(short, long)]
        bins: Option<usize>,

        /// Report densities instead of counts
        #[arg(long)]
        density: bool,
    },

    /// Simpliciality metrics
    Simpliciality {
        /// Smallest edge size counted (overrides the config file)
        #[arg(long)]
        min_size: Option<usize>,

        /// Also inspect edges of exactly the minimum size
        #[arg(long)]
        include_min_size: bool,
    },

    /// Connected components
    Components,

    /// Write the structure in another format
    Convert {
        /// Output format
        #[arg(short, long, value_enum)]
        to: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments. Returns the text to print.
pub fn execute(cli: &Cli, config: &Config) -> Result<String, HyperweaveError> {
    let input = cli.input.as_deref().ok_or_else(|| {
        HyperweaveError::InvalidOperation("an input file is required (--input)".to_string())
    })?;
    let network = crate::loaders::load_network(input, cli.format, cli.node_type, cli.delimiter)?;
    let net = network.as_read();
    let json_mode = cli.json_mode;

    match &cli.command {
        Some(Commands::Info) | None => cmd_info(net, json_mode),
        Some(Commands::Stats { on, stats, filter }) => {
            cmd_stats(net, json_mode, (*on).into(), stats, filter.as_deref())
        }
        Some(Commands::Hist {
            on,
            stat,
            bins,
            density,
        }) => {
            let bins = bins.or(config.histogram.bins);
            let density = *density || config.histogram.density;
            cmd_hist(net, json_mode, (*on).into(), stat, bins, density)
        }
        Some(Commands::Simpliciality {
            min_size,
            include_min_size,
        }) => {
            let params = hyperweave_core::SimplicialityParams {
                min_size: min_size.unwrap_or(config.simpliciality.min_size),
                exclude_min_size: !include_min_size && config.simpliciality.exclude_min_size,
            };
            cmd_simpliciality(net, json_mode, params)
        }
        Some(Commands::Components) => cmd_components(net, json_mode),
        Some(Commands::Convert { to, output }) => cmd_convert(net, *to, output.as_deref()),
    }
}
