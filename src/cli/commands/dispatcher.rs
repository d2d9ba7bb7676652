//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::PathBuf;

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::error::Result;

use super::list::ListCommand;
use super::package::PackageCommand;
use super::run::RunCommand;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
#[derive(Debug, Default)]
pub struct CommandDispatcher {
    config: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a dispatcher reading the experiment from `config`, or the
    /// built-in experiment.
    pub fn new(config: Option<PathBuf>) -> Self {
        Self { config }
    }

    /// Dispatch and execute a command.
    ///
    /// Running without a subcommand is the same as `run` with defaults.
    pub fn dispatch(&self, cli: &Cli) -> Result<CommandResult> {
        let config = self.config.clone();
        match &cli.command {
            Some(Commands::Run(args)) => RunCommand::new(config, args.clone()).execute(),
            Some(Commands::Package(args)) => PackageCommand::new(config, args.clone()).execute(),
            Some(Commands::List(args)) => ListCommand::new(config, args.clone()).execute(),
            None => RunCommand::new(config, RunArgs::default()).execute(),
        }
    }
}
