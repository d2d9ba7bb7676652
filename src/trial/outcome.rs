//! Trial outcome types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which step of a trial failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Dependency resolution (tidy) failed.
    Resolve,
    /// Compilation failed after resolution succeeded.
    Build,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Resolve => write!(f, "resolve"),
            FailureStage::Build => write!(f, "build"),
        }
    }
}

/// The result of one trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialOutcome {
    /// The program resolved and built.
    Success,

    /// The toolchain ran and rejected the program.
    Failure { stage: FailureStage, detail: String },

    /// The toolchain could not be installed or launched, so nothing was
    /// observed. Not evidence of incompatibility.
    ProvisioningError { message: String },
}

impl TrialOutcome {
    pub fn failure(stage: FailureStage, detail: impl Into<String>) -> Self {
        TrialOutcome::Failure {
            stage,
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TrialOutcome::Success)
    }

    /// Whether the trial observed nothing about the dependency.
    pub fn is_inconclusive(&self) -> bool {
        matches!(self, TrialOutcome::ProvisioningError { .. })
    }
}

impl fmt::Display for TrialOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialOutcome::Success => write!(f, "ok"),
            TrialOutcome::Failure { stage, .. } => write!(f, "failed ({})", stage),
            TrialOutcome::ProvisioningError { .. } => write!(f, "inconclusive"),
        }
    }
}
