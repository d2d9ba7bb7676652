//! Experiment configuration.
//!
//! # Modules
//!
//! - [`schema`] - YAML structure and validation
//! - [`loader`] - Loading from a file or the built-in defaults

pub mod loader;
pub mod schema;

pub use loader::{default_config, load_config, load_config_file};
pub use schema::ExperimentConfig;
