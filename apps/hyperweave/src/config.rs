//! # Configuration
//!
//! Optional TOML file with defaults for logging, simpliciality and
//! histograms. Command-line flags override anything set here.
//!
//! ```toml
//! log_format = "json"
//!
//! [simpliciality]
//! min_size = 2
//! exclude_min_size = true
//!
//! [histogram]
//! bins = 20
//! density = false
//! ```

use hyperweave_core::HyperweaveError;
use hyperweave_core::primitives::DEFAULT_MIN_SIZE;
use serde::Deserialize;
use std::path::Path;

/// File read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "hyperweave.toml";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Defaults for the simpliciality metrics.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimplicialityConfig {
    pub min_size: usize,
    pub exclude_min_size: bool,
}

impl Default for SimplicialityConfig {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            exclude_min_size: true,
        }
    }
}

/// Defaults for `hist`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    /// `None` picks unit bins for integer data.
    pub bins: Option<usize>,
    pub density: bool,
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_format: LogFormat,
    pub simpliciality: SimplicialityConfig,
    pub histogram: HistogramConfig,
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, HyperweaveError> {
        toml::from_str(text).map_err(|e| HyperweaveError::MalformedInput(format!("config: {e}")))
    }

    /// Load `path`, or [`DEFAULT_CONFIG_FILE`] if present, or the defaults.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file is not.
    pub fn load(path: Option<&Path>) -> Result<Self, HyperweaveError> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Path::new(DEFAULT_CONFIG_FILE),
            None => return Ok(Self::default()),
        };
        let text = std::fs::read_to_string(path).map_err(|e| {
            HyperweaveError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").expect("parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.simpliciality.min_size, DEFAULT_MIN_SIZE);
        assert!(config.simpliciality.exclude_min_size);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            log_format = "json"

            [histogram]
            bins = 5
            "#,
        )
        .expect("parse");

        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.histogram.bins, Some(5));
        assert!(!config.histogram.density);
        assert_eq!(config.simpliciality, SimplicialityConfig::default());
    }

    #[test]
    fn bad_values_are_malformed_input() {
        assert!(matches!(
            Config::from_toml("log_format = \"xml\""),
            Err(HyperweaveError::MalformedInput(_))
        ));
    }
}
