//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. `run` and `package` share the
//! setup in this module: loading the experiment, applying flag overrides
//! and wiring a [`TrialRunner`] to the real toolchains.

pub mod dispatcher;
pub mod list;
pub mod package;
pub mod run;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

use std::path::Path;

use crate::cli::args::SearchArgs;
use crate::config::{load_config, ExperimentConfig};
use crate::error::{CompatError, Result};
use crate::experiment::Experiment;
use crate::sandbox::SandboxBuilder;
use crate::shell::SystemRunner;
use crate::toolchain::{Provisioner, ToolchainList, ToolchainLocator};
use crate::trial::TrialRunner;

/// Load the experiment and apply command-line overrides.
pub(crate) fn load_with_overrides(
    path: Option<&Path>,
    overrides: &SearchArgs,
) -> Result<(ExperimentConfig, ToolchainList)> {
    let mut config = load_config(path)?;
    if let Some(search) = overrides.search {
        config.search = search;
    }
    if let Some(latest) = overrides.latest {
        config.latest = latest;
    }
    if overrides.timeout.is_some() {
        config.command_timeout_secs = overrides.timeout;
    }
    let toolchains = config.validate()?;
    Ok((config, toolchains))
}

/// Wire an experiment to the real toolchains described by `config`.
pub(crate) fn build_experiment(
    config: &ExperimentConfig,
    toolchains: ToolchainList,
) -> Result<Experiment<TrialRunner<SystemRunner>>> {
    let locator = match &config.install_root {
        Some(root) => ToolchainLocator::new(root, &config.bootstrap_tool),
        None => ToolchainLocator::discover(&config.bootstrap_tool).ok_or_else(|| {
            CompatError::ConfigValidationError {
                message: "cannot find an install root (set GOBIN, GOPATH or install_root)"
                    .to_string(),
            }
        })?,
    };
    tracing::debug!("Toolchain wrappers live in {}", locator.install_root().display());

    let provisioner = Provisioner::new(locator, &config.bootstrap_tool, &config.installer_prefix);
    let sandboxes = match &config.sandbox_root {
        Some(root) => SandboxBuilder::in_dir(root),
        None => SandboxBuilder::new(),
    };
    let runner = SystemRunner::with_timeout(config.command_timeout());
    let trial = TrialRunner::new(runner, provisioner, sandboxes, toolchains.newest().clone());

    Ok(Experiment::new(trial, toolchains, config.search, config.latest))
}
