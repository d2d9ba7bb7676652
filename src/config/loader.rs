//! Configuration loading.
//!
//! An explicit config file replaces the built-in experiment entirely;
//! without one, the embedded defaults are used.

use crate::config::schema::ExperimentConfig;
use crate::error::{CompatError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// The built-in experiment definition.
const DEFAULT_CONFIG: &str = include_str!("default.yml");

/// Load the configuration from `path`, or the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<ExperimentConfig> {
    match path {
        Some(path) => load_config_file(path),
        None => default_config(),
    }
}

/// Parse the embedded default experiment.
pub fn default_config() -> Result<ExperimentConfig> {
    parse_config(DEFAULT_CONFIG, Path::new("<built-in>"))
}

/// Load and parse a single YAML config file.
pub fn load_config_file(path: &Path) -> Result<ExperimentConfig> {
    if !path.exists() {
        return Err(CompatError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    tracing::debug!("Loaded config from {}", path.display());
    parse_config(&content, path)
}

fn parse_config(content: &str, path: &Path) -> Result<ExperimentConfig> {
    serde_yaml::from_str(content).map_err(|e| CompatError::ConfigParseError {
        path: PathBuf::from(path),
        message: e.to_string(),
    })
}
