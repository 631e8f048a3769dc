//! # Hyperweave
//!
//! Command-line front end for hyperweave-core.
//!
//! ## Usage
//!
//! ```bash
//! # Summarize an edge list
//! hyperweave -i edges.txt -f edgelist info
//!
//! # Degree of every node of degree at least 2
//! hyperweave -i net.json stats -s degree --filter "degree geq 2"
//!
//! # Simpliciality metrics
//! hyperweave -i edges.txt -f edgelist simpliciality --min-size 2
//!
//! # Write an incidence matrix
//! hyperweave -i net.json convert --to incidence -o matrix.txt
//! ```

use clap::Parser;
use hyperweave::cli;
use hyperweave::config::{Config, LogFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    let config_result = Config::load(cli.config.as_deref());
    let config_format = config_result
        .as_ref()
        .map(|c| c.log_format)
        .unwrap_or_default();

    // HYPERWEAVE_LOG_FORMAT=json overrides the config file.
    let log_format = match std::env::var("HYPERWEAVE_LOG_FORMAT").as_deref() {
        Ok("json") => LogFormat::Json,
        Ok("text") => LogFormat::Text,
        _ => config_format,
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hyperweave=info".into());

    match log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let config = match config_result {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    match cli::execute(&cli, &config) {
        Ok(output) => {
            print!("{output}");
            if !output.is_empty() && !output.ends_with('\n') {
                println!();
            }
        }
        Err(e) => {
            tracing::error!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print the startup banner to stderr so stdout stays machine-readable.
fn print_banner() {
    eprintln!("hyperweave v{}\n", env!("CARGO_PKG_VERSION"));
}
