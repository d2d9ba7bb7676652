//! Toolchain provisioning.
//!
//! The `Provisioner` makes sure a toolchain wrapper is installed and its SDK
//! downloaded before a trial uses it, remembering which versions are ready
//! so the network-bound steps run at most once per version and process.

use crate::error::{CompatError, Result};
use crate::shell::{CommandOutput, CommandRunner, ToolCommand};
use crate::toolchain::locator::ToolchainLocator;
use crate::toolchain::version::ToolchainVersion;
use std::collections::HashSet;
use std::path::PathBuf;

/// Installs and downloads toolchains on demand.
///
/// Failures are not remembered: a later `ensure` for the same version tries
/// again, in case the network came back.
pub struct Provisioner {
    locator: ToolchainLocator,
    bootstrap: PathBuf,
    installer_prefix: String,
    ready: HashSet<ToolchainVersion>,
}

impl Provisioner {
    /// Create a provisioner.
    ///
    /// `bootstrap` is the already-installed tool used to install wrappers;
    /// `installer_prefix` is joined with the version to form the installer
    /// package (e.g. `golang.org/dl/go` + `1.21.0`).
    pub fn new(
        locator: ToolchainLocator,
        bootstrap: impl Into<PathBuf>,
        installer_prefix: impl Into<String>,
    ) -> Self {
        Self {
            locator,
            bootstrap: bootstrap.into(),
            installer_prefix: installer_prefix.into(),
            ready: HashSet::new(),
        }
    }

    pub fn locator(&self) -> &ToolchainLocator {
        &self.locator
    }

    /// Whether `version` has been provisioned during this run.
    pub fn is_ready(&self, version: &ToolchainVersion) -> bool {
        self.ready.contains(version)
    }

    /// Ensure `version` is installed and its SDK downloaded.
    ///
    /// Returns `Err(CompatError::Provisioning)` if either step fails.
    pub fn ensure(&mut self, runner: &dyn CommandRunner, version: &ToolchainVersion) -> Result<()> {
        if self.ready.contains(version) {
            tracing::debug!("Toolchain {} already provisioned", version);
            return Ok(());
        }

        if self.locator.is_installed(version) {
            tracing::debug!(
                "Found {} wrapper at {}",
                version,
                self.locator.binary_path(version).display()
            );
        } else {
            tracing::info!("Installing {} wrapper", self.locator.binary_name(version));
            let install = self.install_command(version);
            check_step(runner, &install, version, "install wrapper")?;
        }

        let download = ToolCommand::new(self.locator.binary_path(version))
            .arg("download")
            .env("GOTOOLCHAIN", "local");
        check_step(runner, &download, version, "download SDK")?;

        self.ready.insert(version.clone());
        Ok(())
    }

    fn install_command(&self, version: &ToolchainVersion) -> ToolCommand {
        ToolCommand::new(&self.bootstrap)
            .arg("install")
            .arg(format!("{}{}@latest", self.installer_prefix, version))
            .env("GOBIN", self.locator.install_root().display().to_string())
    }
}

fn check_step(
    runner: &dyn CommandRunner,
    command: &ToolCommand,
    version: &ToolchainVersion,
    step: &str,
) -> Result<CommandOutput> {
    let provisioning_error = |message: String| CompatError::Provisioning {
        version: version.to_string(),
        message: format!("{}: {}", step, message),
    };

    let output = runner
        .run(command)
        .map_err(|e| provisioning_error(e.to_string()))?;

    if output.success() {
        Ok(output)
    } else {
        Err(provisioning_error(output.failure_summary()))
    }
}
