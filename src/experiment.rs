//! Experiment orchestration.
//!
//! Runs the compatibility search for every configured dependency and for the
//! dependency-free control case, turning per-dependency failures into result
//! records so one broken probe never stops the run.

use crate::dependency::{DependencySpec, PinnedDependency};
use crate::error::Result;
use crate::report::CompatibilityResult;
use crate::search::{self, LatestPolicy, SearchStrategy};
use crate::toolchain::ToolchainList;
use crate::trial::Trial;

/// Drives searches over a [`Trial`] implementation.
pub struct Experiment<T: Trial> {
    trial: T,
    toolchains: ToolchainList,
    search: SearchStrategy,
    latest: LatestPolicy,
}

impl<T: Trial> Experiment<T> {
    pub fn new(
        trial: T,
        toolchains: ToolchainList,
        search: SearchStrategy,
        latest: LatestPolicy,
    ) -> Self {
        Self {
            trial,
            toolchains,
            search,
            latest,
        }
    }

    pub fn trial(&self) -> &T {
        &self.trial
    }

    pub fn toolchains(&self) -> &ToolchainList {
        &self.toolchains
    }

    /// Probe every dependency in order, then the control case.
    pub fn run(&mut self, dependencies: &[DependencySpec], control: bool) -> Vec<CompatibilityResult> {
        tracing::info!(
            "Probing {} dependencies against {} toolchains ({} to {})",
            dependencies.len(),
            self.toolchains.len(),
            self.toolchains.oldest(),
            self.toolchains.newest()
        );

        let mut results = Vec::with_capacity(dependencies.len() + 1);
        for dependency in dependencies {
            results.push(self.probe_dependency(dependency));
        }
        if control {
            results.push(self.probe_control());
        }
        results
    }

    /// Probe one dependency. Errors end up in the result's `error` field.
    pub fn probe_dependency(&mut self, dependency: &DependencySpec) -> CompatibilityResult {
        tracing::info!("=== {} ({}) ===", dependency.module, dependency.constraint);
        let mut result = CompatibilityResult::for_dependency(dependency, self.search, self.latest);

        match self.try_probe_dependency(dependency, &mut result) {
            Ok(()) => result,
            Err(e) => {
                tracing::error!("{} failed: {}", dependency.module, e);
                result.with_error(e.to_string())
            }
        }
    }

    /// Probe the import-free control program.
    pub fn probe_control(&mut self) -> CompatibilityResult {
        tracing::info!("=== control (no dependencies) ===");
        let mut result = CompatibilityResult::control(self.search, self.latest);

        match self.search_into(None, &mut result) {
            Ok(()) => result,
            Err(e) => {
                tracing::error!("Control case failed: {}", e);
                result.with_error(e.to_string())
            }
        }
    }

    fn try_probe_dependency(
        &mut self,
        dependency: &DependencySpec,
        result: &mut CompatibilityResult,
    ) -> Result<()> {
        let resolved = match self.trial.resolve_version(dependency) {
            Ok(version) => Some(version),
            Err(e) if e.is_fatal_setup() => return Err(e),
            Err(e) => {
                tracing::warn!("{}", e);
                result.notes.push(format!("resolution failed: {}", e));
                None
            }
        };
        result.resolved_version = resolved.clone();

        let pinned = dependency.pin(resolved);
        self.search_into(Some(&pinned), result)
    }

    fn search_into(
        &mut self,
        dependency: Option<&PinnedDependency>,
        result: &mut CompatibilityResult,
    ) -> Result<()> {
        let oldest =
            search::oldest_compatible(&mut self.trial, &self.toolchains, dependency, self.search)?;
        let latest =
            search::latest_compatible(&mut self.trial, &self.toolchains, dependency, self.latest)?;

        result.oldest_compatible = oldest.found.as_ref().map(ToString::to_string);
        result.latest_compatible = latest.found.as_ref().map(ToString::to_string);
        result.probes = oldest.probes.len() + latest.probes.len();

        let mut skipped = oldest.skipped_versions();
        for version in latest.skipped_versions() {
            if !skipped.contains(&version) {
                skipped.push(version);
            }
        }
        result.inconclusive = !skipped.is_empty();
        result.skipped_versions = skipped.iter().map(ToString::to_string).collect();

        if result.oldest_compatible.is_none() {
            if result.inconclusive {
                result
                    .notes
                    .push("no trial succeeded, but some toolchains could not be provisioned".into());
            } else {
                result
                    .notes
                    .push("no configured toolchain built it".into());
            }
            if self.latest == LatestPolicy::AssumeNewest {
                result
                    .notes
                    .push("latest_compatible is assumed, not probed".into());
            }
        }

        tracing::info!(
            "{}: oldest={}, latest={}{}",
            result.package_name,
            result.oldest_compatible.as_deref().unwrap_or("N/A"),
            result.latest_compatible.as_deref().unwrap_or("N/A"),
            if result.inconclusive { " (inconclusive)" } else { "" }
        );
        Ok(())
    }
}
