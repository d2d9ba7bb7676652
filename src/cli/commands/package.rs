//! Package command implementation.
//!
//! The `gocompat package <module>` command probes a single module and
//! writes its result to `result-<name>.json`.

use std::path::PathBuf;

use crate::cli::args::PackageArgs;
use crate::config::ExperimentConfig;
use crate::dependency::{DependencySpec, LATEST};
use crate::error::Result;
use crate::report::{single_result_file_name, summary_line, write_json};

use super::dispatcher::{Command, CommandResult};
use super::{build_experiment, load_with_overrides};

/// The package command implementation.
pub struct PackageCommand {
    config_path: Option<PathBuf>,
    args: PackageArgs,
}

impl PackageCommand {
    /// Create a new package command.
    pub fn new(config_path: Option<PathBuf>, args: PackageArgs) -> Self {
        Self { config_path, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &PackageArgs {
        &self.args
    }

    /// The configured entry for the module, with flag overrides applied.
    fn dependency(&self, config: &ExperimentConfig) -> DependencySpec {
        let mut dependency = config
            .dependency(&self.args.module)
            .cloned()
            .unwrap_or_else(|| DependencySpec::new(&self.args.module, LATEST));
        if let Some(constraint) = &self.args.constraint {
            dependency.constraint = constraint.clone();
        }
        if let Some(import) = &self.args.import {
            dependency = dependency.with_import(import);
        }
        dependency
    }

    fn output_path(&self) -> PathBuf {
        self.args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(single_result_file_name(&self.args.module)))
    }
}

impl Command for PackageCommand {
    fn execute(&self) -> Result<CommandResult> {
        let (config, toolchains) =
            load_with_overrides(self.config_path.as_deref(), &self.args.search)?;
        let dependency = self.dependency(&config);
        dependency.validate()?;

        let mut experiment = build_experiment(&config, toolchains)?;
        let result = experiment.probe_dependency(&dependency);

        let output = self.output_path();
        write_json(&output, &result)?;
        println!("{}", summary_line(&result));
        for note in &result.notes {
            println!("  note: {}", note);
        }
        println!("Result written to {}", output.display());

        if result.error.is_some() {
            return Ok(CommandResult::failure(1));
        }
        Ok(CommandResult::success())
    }
}
