//! Run command implementation.
//!
//! The `gocompat run` command probes every configured dependency, then the
//! control case, and writes all results to one JSON file.

use std::path::{Path, PathBuf};

use crate::cli::args::RunArgs;
use crate::config::ExperimentConfig;
use crate::dependency::DependencySpec;
use crate::error::{CompatError, Result};
use crate::report::{render_summary, write_json};

use super::dispatcher::{Command, CommandResult};
use super::{build_experiment, load_with_overrides};

/// The run command implementation.
pub struct RunCommand {
    config_path: Option<PathBuf>,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(config_path: Option<PathBuf>, args: RunArgs) -> Self {
        Self { config_path, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// The dependencies to probe, honoring `--only`.
    fn selected(&self, config: &ExperimentConfig) -> Result<Vec<DependencySpec>> {
        if self.args.only.is_empty() {
            return Ok(config.dependencies.clone());
        }

        self.args
            .only
            .iter()
            .map(|module| {
                config
                    .dependency(module)
                    .cloned()
                    .ok_or_else(|| CompatError::ConfigValidationError {
                        message: format!("'{}' is not a configured dependency", module),
                    })
            })
            .collect()
    }

    fn output_path(&self) -> &Path {
        &self.args.output
    }
}

impl Command for RunCommand {
    fn execute(&self) -> Result<CommandResult> {
        let (config, toolchains) =
            load_with_overrides(self.config_path.as_deref(), &self.args.search)?;
        let dependencies = self.selected(&config)?;

        let mut experiment = build_experiment(&config, toolchains)?;
        let results = experiment.run(&dependencies, !self.args.no_control);

        write_json(self.output_path(), &results)?;
        print!("{}", render_summary(&results));
        println!("Results written to {}", self.output_path().display());

        Ok(CommandResult::success())
    }
}
