//! Configuration schema definitions for gocompat.
//!
//! This module contains the struct definitions that map to the YAML
//! experiment file format.

use crate::dependency::DependencySpec;
use crate::error::{CompatError, Result};
use crate::search::{LatestPolicy, SearchStrategy};
use crate::toolchain::{ToolchainList, ToolchainVersion};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Installed tool used to install version wrappers.
    pub bootstrap_tool: String,

    /// Installer package prefix; the version is appended.
    pub installer_prefix: String,

    /// Toolchain versions to search, oldest first.
    pub toolchains: Vec<ToolchainVersion>,

    /// Oldest-compatible search strategy.
    pub search: SearchStrategy,

    /// Latest-compatible policy.
    pub latest: LatestPolicy,

    /// Directory holding `go<version>` wrappers (defaults to `GOBIN`,
    /// `GOPATH/bin` or `~/go/bin`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_root: Option<PathBuf>,

    /// Parent directory for sandboxes (defaults to the system temp dir).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sandbox_root: Option<PathBuf>,

    /// Kill any single toolchain command after this many seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_timeout_secs: Option<u64>,

    /// Dependencies to probe.
    pub dependencies: Vec<DependencySpec>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            bootstrap_tool: default_bootstrap_tool(),
            installer_prefix: default_installer_prefix(),
            toolchains: Vec::new(),
            search: SearchStrategy::default(),
            latest: LatestPolicy::default(),
            install_root: None,
            sandbox_root: None,
            command_timeout_secs: None,
            dependencies: Vec::new(),
        }
    }
}

fn default_bootstrap_tool() -> String {
    "go".to_string()
}

fn default_installer_prefix() -> String {
    "golang.org/dl/go".to_string()
}

impl ExperimentConfig {
    /// Check the configuration and return the validated toolchain list.
    pub fn validate(&self) -> Result<ToolchainList> {
        let toolchains = ToolchainList::new(self.toolchains.clone())?;

        if self.bootstrap_tool.trim().is_empty() {
            return Err(CompatError::ConfigValidationError {
                message: "bootstrap_tool must not be empty".to_string(),
            });
        }

        if self.command_timeout_secs == Some(0) {
            return Err(CompatError::ConfigValidationError {
                message: "command_timeout_secs must be greater than zero".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for dep in &self.dependencies {
            dep.validate()?;
            if !seen.insert(dep.module.as_str()) {
                return Err(CompatError::ConfigValidationError {
                    message: format!("dependency '{}' is listed twice", dep.module),
                });
            }
        }

        Ok(toolchains)
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    /// Look up a configured dependency by module path.
    pub fn dependency(&self, module: &str) -> Option<&DependencySpec> {
        self.dependencies.iter().find(|d| d.module == module)
    }
}
