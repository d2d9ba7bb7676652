//! List command implementation.
//!
//! The `gocompat list` command shows the toolchains and dependencies an
//! experiment would probe, without running anything.

use std::path::PathBuf;

use console::style;

use crate::cli::args::ListArgs;
use crate::config::{load_config, ExperimentConfig};
use crate::error::Result;
use crate::toolchain::ToolchainList;

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    config_path: Option<PathBuf>,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(config_path: Option<PathBuf>, args: ListArgs) -> Self {
        Self { config_path, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ListArgs {
        &self.args
    }
}

impl Command for ListCommand {
    fn execute(&self) -> Result<CommandResult> {
        let config = load_config(self.config_path.as_deref())?;
        let toolchains = config.validate()?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&config).map_err(anyhow::Error::from)?;
            println!("{}", json);
        } else {
            print!("{}", render_listing(&config, &toolchains));
        }

        Ok(CommandResult::success())
    }
}

fn render_listing(config: &ExperimentConfig, toolchains: &ToolchainList) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", style("Toolchains:").bold()));
    let versions: Vec<&str> = toolchains.iter().map(|v| v.as_str()).collect();
    out.push_str(&format!("  {}\n", versions.join(", ")));
    out.push_str(&format!(
        "  {}\n",
        style(format!(
            "search: {}, latest: {}",
            config.search, config.latest
        ))
        .dim()
    ));

    out.push_str(&format!(
        "{} ({})\n",
        style("Dependencies:").bold(),
        config.dependencies.len()
    ));
    for dep in &config.dependencies {
        let import = match &dep.import {
            Some(import) => format!(" {}", style(format!("(imports {})", import)).dim()),
            None => String::new(),
        };
        out.push_str(&format!("  {}{}\n", dep.query(), import));
    }
    out
}
