//! Toolchain-backed trial execution.

use crate::dependency::{DependencySpec, PinnedDependency};
use crate::error::{CompatError, Result};
use crate::sandbox::{Sandbox, SandboxBuilder};
use crate::shell::{CommandOutput, CommandRunner, ToolCommand};
use crate::toolchain::{Provisioner, ToolchainVersion};
use crate::trial::outcome::{FailureStage, TrialOutcome};
use crate::trial::Trial;

/// Runs trials against real `go<version>` wrappers.
///
/// Every trial gets its own sandbox, which is torn down before the trial
/// returns regardless of outcome.
pub struct TrialRunner<R: CommandRunner> {
    runner: R,
    provisioner: Provisioner,
    sandboxes: SandboxBuilder,
    newest: ToolchainVersion,
}

impl<R: CommandRunner> TrialRunner<R> {
    /// Create a trial runner. `newest` is the toolchain used for resolution.
    pub fn new(
        runner: R,
        provisioner: Provisioner,
        sandboxes: SandboxBuilder,
        newest: ToolchainVersion,
    ) -> Self {
        Self {
            runner,
            provisioner,
            sandboxes,
            newest,
        }
    }

    pub fn provisioner(&self) -> &Provisioner {
        &self.provisioner
    }

    pub fn command_runner(&self) -> &R {
        &self.runner
    }

    fn toolchain_command(&self, toolchain: &ToolchainVersion, sandbox: &Sandbox) -> ToolCommand {
        ToolCommand::new(self.provisioner.locator().binary_path(toolchain))
            .current_dir(sandbox.path())
            .env("GOTOOLCHAIN", "local")
    }

    fn resolve_in(&self, sandbox: &Sandbox, dependency: &DependencySpec) -> Result<String> {
        let newest = &self.newest;
        let resolution_error = |message: String| CompatError::Resolution {
            module: dependency.module.clone(),
            message,
        };
        let run_step = |command: ToolCommand| -> Result<CommandOutput> {
            let output = self.runner.run(&command).map_err(|e| match e {
                // The wrapper was provisioned but cannot be launched.
                CompatError::CommandSpawn { .. } => CompatError::Provisioning {
                    version: newest.to_string(),
                    message: e.to_string(),
                },
                e => resolution_error(e.to_string()),
            })?;
            if output.success() {
                Ok(output)
            } else {
                Err(resolution_error(format!(
                    "{} {}",
                    command,
                    output.failure_summary()
                )))
            }
        };

        run_step(
            self.toolchain_command(newest, sandbox)
                .arg("get")
                .arg(dependency.query()),
        )?;
        run_step(self.toolchain_command(newest, sandbox).args(["mod", "download"]))?;
        let listed = run_step(
            self.toolchain_command(newest, sandbox)
                .args(["list", "-m"])
                .arg(&dependency.module),
        )?;

        parse_module_version(&listed.stdout, &dependency.module).ok_or_else(|| {
            resolution_error(format!(
                "no version for the module in list output: {}",
                listed.stdout.trim()
            ))
        })
    }

    fn run_in(&self, sandbox: &Sandbox, toolchain: &ToolchainVersion) -> Result<TrialOutcome> {
        sandbox.clear_lock()?;

        let steps = [
            (FailureStage::Resolve, vec!["mod", "tidy"]),
            (FailureStage::Build, vec!["build", "."]),
        ];

        for (stage, args) in steps {
            let command = self.toolchain_command(toolchain, sandbox).args(args);
            let output = match self.runner.run(&command) {
                Ok(output) => output,
                Err(e) => {
                    // The wrapper was provisioned but cannot be launched.
                    return Ok(TrialOutcome::ProvisioningError {
                        message: e.to_string(),
                    });
                }
            };
            if !output.success() {
                tracing::debug!("{} failed: {}", command, output.failure_summary());
                return Ok(TrialOutcome::failure(stage, output.combined()));
            }
        }

        Ok(TrialOutcome::Success)
    }
}

impl<R: CommandRunner> Trial for TrialRunner<R> {
    fn resolve_version(&mut self, dependency: &DependencySpec) -> Result<String> {
        let newest = self.newest.clone();
        self.provisioner.ensure(&self.runner, &newest)?;

        let sandbox = self.sandboxes.build(&newest, Some(&dependency.pin(None)))?;
        let resolved = self.resolve_in(&sandbox, dependency);
        sandbox.teardown();

        let resolved = resolved?;
        tracing::info!(
            "Resolved {} to {} with toolchain {}",
            dependency.query(),
            resolved,
            newest
        );
        Ok(resolved)
    }

    fn probe(
        &mut self,
        toolchain: &ToolchainVersion,
        dependency: Option<&PinnedDependency>,
    ) -> Result<TrialOutcome> {
        if let Err(e) = self.provisioner.ensure(&self.runner, toolchain) {
            tracing::warn!("{}", e);
            return Ok(TrialOutcome::ProvisioningError {
                message: e.to_string(),
            });
        }

        let sandbox = self.sandboxes.build(toolchain, dependency)?;
        let outcome = self.run_in(&sandbox, toolchain);
        sandbox.teardown();
        outcome
    }
}

/// Find `module`'s version in `<module> <version>` listing output.
pub fn parse_module_version(output: &str, module: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some(name), Some(version)) if name == module => Some(version.to_string()),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::ToolchainLocator;
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    type Script = Box<dyn Fn(&ToolCommand) -> Result<CommandOutput>>;

    /// Answers commands from a script and records what ran where.
    struct ScriptedRunner {
        script: Script,
        calls: RefCell<Vec<ToolCommand>>,
    }

    impl ScriptedRunner {
        fn new(script: impl Fn(&ToolCommand) -> Result<CommandOutput> + 'static) -> Self {
            Self {
                script: Box::new(script),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn sandbox_dirs(&self) -> Vec<PathBuf> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|c| c.get_cwd().map(Path::to_path_buf))
                .collect()
        }

        fn ran(&self, args: &[&str]) -> bool {
            self.calls.borrow().iter().any(|c| c.get_args() == args)
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, command: &ToolCommand) -> Result<CommandOutput> {
            self.calls.borrow_mut().push(command.clone());
            (self.script)(command)
        }
    }

    fn v(raw: &str) -> ToolchainVersion {
        ToolchainVersion::parse(raw).unwrap()
    }

    fn first_arg(command: &ToolCommand) -> &str {
        command.get_args().first().map(String::as_str).unwrap_or("")
    }

    fn trial_runner(
        install_root: &Path,
        sandbox_root: &Path,
        runner: ScriptedRunner,
    ) -> TrialRunner<ScriptedRunner> {
        let provisioner = Provisioner::new(
            ToolchainLocator::new(install_root, "go"),
            "go",
            "golang.org/dl/go",
        );
        TrialRunner::new(
            runner,
            provisioner,
            SandboxBuilder::in_dir(sandbox_root),
            v("1.24.0"),
        )
    }

    fn mux() -> PinnedDependency {
        DependencySpec::new("github.com/gorilla/mux", "v1").pin(Some("v1.8.1".into()))
    }

    fn assert_empty(dir: &Path) {
        assert_eq!(std::fs::read_dir(dir).unwrap().count(), 0, "sandbox leaked");
    }

    #[test]
    fn parse_module_version_finds_exact_module() {
        let out = "github.com/gorilla/mux v1.8.1\n";
        assert_eq!(
            parse_module_version(out, "github.com/gorilla/mux").as_deref(),
            Some("v1.8.1")
        );
        assert_eq!(parse_module_version(out, "github.com/gorilla"), None);
        assert_eq!(parse_module_version("sandbox\n", "sandbox"), None);
    }

    #[test]
    fn probe_success_runs_tidy_then_build_with_local_toolchain() {
        let (install, sandboxes) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let runner = ScriptedRunner::new(|_| Ok(CommandOutput::with_code(0)));
        let mut trial = trial_runner(install.path(), sandboxes.path(), runner);

        let outcome = trial.probe(&v("1.21.0"), Some(&mux())).unwrap();

        assert_eq!(outcome, TrialOutcome::Success);
        let runner = trial.command_runner();
        assert!(runner.ran(&["mod", "tidy"]));
        assert!(runner.ran(&["build", "."]));
        let calls = runner.calls.borrow();
        let build = calls.iter().find(|c| first_arg(c) == "build").unwrap();
        assert_eq!(build.program_name(), "go1.21.0");
        assert_eq!(build.get_env("GOTOOLCHAIN"), Some("local"));
        drop(calls);
        assert_empty(sandboxes.path());
    }

    #[test]
    fn tidy_failure_is_a_resolve_failure() {
        let (install, sandboxes) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let runner = ScriptedRunner::new(|c| {
            if first_arg(c) == "mod" {
                Ok(CommandOutput {
                    exit_code: Some(1),
                    stderr: "requires go >= 1.20".into(),
                    ..Default::default()
                })
            } else {
                Ok(CommandOutput::with_code(0))
            }
        });
        let mut trial = trial_runner(install.path(), sandboxes.path(), runner);

        let outcome = trial.probe(&v("1.13"), Some(&mux())).unwrap();

        assert_eq!(
            outcome,
            TrialOutcome::failure(FailureStage::Resolve, "requires go >= 1.20")
        );
        assert!(!trial.command_runner().ran(&["build", "."]));
        assert_empty(sandboxes.path());
    }

    #[test]
    fn build_failure_is_a_build_failure() {
        let (install, sandboxes) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let runner = ScriptedRunner::new(|c| {
            Ok(CommandOutput::with_code(if first_arg(c) == "build" { 2 } else { 0 }))
        });
        let mut trial = trial_runner(install.path(), sandboxes.path(), runner);

        let outcome = trial.probe(&v("1.16"), Some(&mux())).unwrap();

        assert!(matches!(
            outcome,
            TrialOutcome::Failure {
                stage: FailureStage::Build,
                ..
            }
        ));
        assert_empty(sandboxes.path());
    }

    #[test]
    fn provisioning_failure_is_inconclusive_and_builds_no_sandbox() {
        let (install, sandboxes) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let runner = ScriptedRunner::new(|c| {
            Ok(CommandOutput::with_code(if first_arg(c) == "install" { 1 } else { 0 }))
        });
        let mut trial = trial_runner(install.path(), sandboxes.path(), runner);

        let outcome = trial.probe(&v("1.14"), None).unwrap();

        assert!(outcome.is_inconclusive());
        assert!(trial.command_runner().sandbox_dirs().is_empty());
        assert_empty(sandboxes.path());
    }

    #[test]
    fn unlaunchable_wrapper_is_inconclusive() {
        let (install, sandboxes) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let runner = ScriptedRunner::new(|c| {
            if first_arg(c) == "mod" {
                Err(CompatError::CommandSpawn {
                    command: c.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
                })
            } else {
                Ok(CommandOutput::with_code(0))
            }
        });
        let mut trial = trial_runner(install.path(), sandboxes.path(), runner);

        let outcome = trial.probe(&v("1.15"), Some(&mux())).unwrap();

        assert!(outcome.is_inconclusive());
        assert_empty(sandboxes.path());
    }

    #[test]
    fn sandbox_setup_failure_is_fatal() {
        let install = TempDir::new().unwrap();
        let sandboxes = TempDir::new().unwrap();
        let missing = sandboxes.path().join("gone");
        let runner = ScriptedRunner::new(|_| Ok(CommandOutput::with_code(0)));
        let mut trial = trial_runner(install.path(), &missing, runner);

        let err = trial.probe(&v("1.20"), Some(&mux())).unwrap_err();

        assert!(err.is_fatal_setup());
        assert_empty(sandboxes.path());
    }

    #[test]
    fn repeated_probes_provision_once() {
        let (install, sandboxes) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let runner = ScriptedRunner::new(|_| Ok(CommandOutput::with_code(0)));
        let mut trial = trial_runner(install.path(), sandboxes.path(), runner);

        trial.probe(&v("1.22.0"), None).unwrap();
        trial.probe(&v("1.22.0"), Some(&mux())).unwrap();

        let calls = trial.command_runner().calls.borrow();
        let installs = calls.iter().filter(|c| first_arg(c) == "install").count();
        let downloads = calls.iter().filter(|c| first_arg(c) == "download").count();
        assert_eq!((installs, downloads), (1, 1));
    }

    #[test]
    fn each_probe_uses_a_fresh_sandbox() {
        let (install, sandboxes) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let runner = ScriptedRunner::new(|_| Ok(CommandOutput::with_code(0)));
        let mut trial = trial_runner(install.path(), sandboxes.path(), runner);

        trial.probe(&v("1.19"), Some(&mux())).unwrap();
        trial.probe(&v("1.20"), Some(&mux())).unwrap();

        let mut dirs = trial.command_runner().sandbox_dirs();
        dirs.dedup();
        assert_eq!(dirs.len(), 2);
    }

    #[test]
    fn resolve_version_uses_newest_toolchain_and_reads_listing() {
        let (install, sandboxes) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let runner = ScriptedRunner::new(|c| {
            if first_arg(c) == "list" {
                Ok(CommandOutput {
                    exit_code: Some(0),
                    stdout: "github.com/gorilla/mux v1.8.1\n".into(),
                    ..Default::default()
                })
            } else {
                Ok(CommandOutput::with_code(0))
            }
        });
        let mut trial = trial_runner(install.path(), sandboxes.path(), runner);
        let dep = DependencySpec::new("github.com/gorilla/mux", "v1");

        let resolved = trial.resolve_version(&dep).unwrap();

        assert_eq!(resolved, "v1.8.1");
        let runner = trial.command_runner();
        assert!(runner.ran(&["get", "github.com/gorilla/mux@v1"]));
        assert!(runner.ran(&["mod", "download"]));
        assert!(runner
            .calls
            .borrow()
            .iter()
            .filter(|c| c.get_cwd().is_some())
            .all(|c| c.program_name() == "go1.24.0"));
        assert_empty(sandboxes.path());
    }

    #[test]
    fn resolve_version_failure_is_a_resolution_error() {
        let (install, sandboxes) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let runner = ScriptedRunner::new(|c| {
            Ok(CommandOutput::with_code(if first_arg(c) == "get" { 1 } else { 0 }))
        });
        let mut trial = trial_runner(install.path(), sandboxes.path(), runner);

        let err = trial
            .resolve_version(&DependencySpec::new("example.com/nope", "v9"))
            .unwrap_err();

        assert!(matches!(err, CompatError::Resolution { .. }));
        assert!(!err.is_fatal_setup());
        assert_empty(sandboxes.path());
    }

    #[test]
    fn unlaunchable_newest_wrapper_is_a_provisioning_error() {
        let (install, sandboxes) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let runner = ScriptedRunner::new(|c| {
            if first_arg(c) == "get" {
                Err(CompatError::CommandSpawn {
                    command: c.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
                })
            } else {
                Ok(CommandOutput::with_code(0))
            }
        });
        let mut trial = trial_runner(install.path(), sandboxes.path(), runner);

        let err = trial
            .resolve_version(&DependencySpec::new("github.com/gorilla/mux", "v1"))
            .unwrap_err();

        assert!(
            matches!(&err, CompatError::Provisioning { version, .. } if version == "1.24.0"),
            "{err:?}"
        );
        assert!(!err.is_fatal_setup());
        assert_empty(sandboxes.path());
    }
}
