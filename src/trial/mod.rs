//! Single trials: one toolchain version, one (optional) dependency.
//!
//! The [`Trial`] trait is the seam between the search algorithms and the
//! real toolchain; [`TrialRunner`] is the implementation that provisions a
//! toolchain, builds a sandbox and runs the resolve and build steps.

pub mod outcome;
pub mod runner;

pub use outcome::{FailureStage, TrialOutcome};
pub use runner::{parse_module_version, TrialRunner};

use crate::dependency::{DependencySpec, PinnedDependency};
use crate::error::Result;
use crate::toolchain::ToolchainVersion;

/// Something that can run trials.
///
/// Build and resolution failures are `Ok(TrialOutcome::Failure)`; only
/// errors that make the whole dependency unprobeable (see
/// [`CompatError::is_fatal_setup`](crate::error::CompatError::is_fatal_setup))
/// come back as `Err` from [`Trial::probe`].
pub trait Trial {
    /// Resolve the concrete version the newest toolchain picks for
    /// `dependency`'s constraint.
    fn resolve_version(&mut self, dependency: &DependencySpec) -> Result<String>;

    /// Try to resolve and build `dependency` (or the empty control program)
    /// under `toolchain`.
    fn probe(
        &mut self,
        toolchain: &ToolchainVersion,
        dependency: Option<&PinnedDependency>,
    ) -> Result<TrialOutcome>;
}
