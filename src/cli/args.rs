//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use crate::search::{LatestPolicy, SearchStrategy};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default output file for a full run.
pub const DEFAULT_RESULTS_FILE: &str = "results.json";

/// gocompat - find the Go toolchains a dependency builds with.
#[derive(Debug, Parser)]
#[command(name = "gocompat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to an experiment config file (defaults to the built-in experiment)
    #[arg(short, long, global = true, env = "GOCOMPAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Probe every configured dependency plus the control case (default)
    Run(RunArgs),

    /// Probe a single module
    Package(PackageArgs),

    /// Show the configured toolchains and dependencies
    List(ListArgs),
}

/// Search options shared by `run` and `package`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SearchArgs {
    /// Oldest-compatible search strategy (overrides config)
    #[arg(long, value_enum)]
    pub search: Option<SearchStrategy>,

    /// Latest-compatible policy (overrides config)
    #[arg(long, value_enum)]
    pub latest: Option<LatestPolicy>,

    /// Kill any toolchain command running longer than this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Where to write the JSON results
    #[arg(short, long, default_value = DEFAULT_RESULTS_FILE)]
    pub output: PathBuf,

    /// Probe only these configured modules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Skip the dependency-free control case
    #[arg(long)]
    pub no_control: bool,

    #[command(flatten)]
    pub search: SearchArgs,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_RESULTS_FILE),
            only: Vec::new(),
            no_control: false,
            search: SearchArgs::default(),
        }
    }
}

/// Arguments for the `package` command.
#[derive(Debug, Clone, clap::Args)]
pub struct PackageArgs {
    /// Module path, e.g. github.com/gorilla/mux
    pub module: String,

    /// Version constraint (defaults to the configured one, else "latest")
    #[arg(long)]
    pub constraint: Option<String>,

    /// Package to import if not the module root
    #[arg(long)]
    pub import: Option<String>,

    /// Where to write the JSON result (defaults to result-<name>.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub search: SearchArgs,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ListArgs {
    /// Print the effective configuration as JSON
    #[arg(long)]
    pub json: bool,
}
