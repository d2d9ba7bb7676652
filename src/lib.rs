//! gocompat - find which Go toolchains a dependency builds with.
//!
//! For each dependency, gocompat resolves its version once with the newest
//! toolchain, then builds a tiny program importing it in a throwaway
//! sandbox under different toolchain versions, searching for the oldest
//! and latest versions that succeed. A dependency-free control program
//! is probed the same way as a baseline.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Experiment configuration loading and validation
//! - [`dependency`] - Dependency specifications and pinned dependencies
//! - [`error`] - Error types and result aliases
//! - [`experiment`] - Orchestration across dependencies and the control case
//! - [`report`] - Result records, JSON output and terminal summary
//! - [`sandbox`] - Throwaway build directories
//! - [`search`] - Oldest/latest compatible toolchain search
//! - [`shell`] - Toolchain command execution
//! - [`toolchain`] - Toolchain versions, wrapper lookup and provisioning
//! - [`trial`] - Single build attempts and their outcomes
//!
//! # Example
//!
//! ```
//! use gocompat::dependency::DependencySpec;
//!
//! let dep = DependencySpec::new("github.com/stretchr/testify", "v1")
//!     .with_import("github.com/stretchr/testify/assert");
//! assert_eq!(dep.query(), "github.com/stretchr/testify@v1");
//! assert_eq!(dep.import_path(), "github.com/stretchr/testify/assert");
//! ```
//!
//! For searches against stub trials, see the integration tests.

pub mod cli;
pub mod config;
pub mod dependency;
pub mod error;
pub mod experiment;
pub mod report;
pub mod sandbox;
pub mod search;
pub mod shell;
pub mod toolchain;
pub mod trial;

pub use error::{CompatError, Result};
