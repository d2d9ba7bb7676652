//! Compatibility search over an ascending toolchain list.
//!
//! The oldest-compatible search assumes monotonicity: if a dependency builds
//! under version V it builds under every newer version. That licenses a
//! binary search costing at most `ceil(log2(N)) + 1` trials. A linear scan
//! is available for dependencies where that assumption is suspect.
//!
//! A trial that could not provision its toolchain is treated like a failure
//! for steering the search, but it is recorded so results can be flagged as
//! inconclusive rather than silently trusted.

use crate::dependency::PinnedDependency;
use crate::error::Result;
use crate::toolchain::{ToolchainList, ToolchainVersion};
use crate::trial::{Trial, TrialOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the oldest compatible toolchain is found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Binary search, relying on monotonicity.
    #[default]
    Bisect,
    /// Probe oldest to newest and stop at the first success.
    Linear,
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStrategy::Bisect => write!(f, "bisect"),
            SearchStrategy::Linear => write!(f, "linear"),
        }
    }
}

/// How the latest compatible toolchain is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LatestPolicy {
    /// Report the newest configured version without probing it.
    #[default]
    AssumeNewest,
    /// Probe from newest to oldest and report the first success.
    BackwardScan,
}

impl fmt::Display for LatestPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatestPolicy::AssumeNewest => write!(f, "assume_newest"),
            LatestPolicy::BackwardScan => write!(f, "backward_scan"),
        }
    }
}

/// One trial performed during a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRecord {
    pub toolchain: ToolchainVersion,
    pub outcome: TrialOutcome,
}

/// The result of one search plus every trial it ran, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub found: Option<ToolchainVersion>,
    pub probes: Vec<ProbeRecord>,
}

impl SearchOutcome {
    /// Versions whose trial could not observe anything.
    pub fn skipped_versions(&self) -> Vec<ToolchainVersion> {
        self.probes
            .iter()
            .filter(|p| p.outcome.is_inconclusive())
            .map(|p| p.toolchain.clone())
            .collect()
    }

    /// Whether any trial was inconclusive, so `found` may be wrong.
    pub fn is_inconclusive(&self) -> bool {
        self.probes.iter().any(|p| p.outcome.is_inconclusive())
    }

    fn record(&mut self, toolchain: &ToolchainVersion, outcome: TrialOutcome) {
        self.probes.push(ProbeRecord {
            toolchain: toolchain.clone(),
            outcome,
        });
    }
}

/// Find the oldest toolchain under which `dependency` builds.
///
/// `found` is always a version whose trial actually succeeded.
pub fn oldest_compatible<T: Trial + ?Sized>(
    trial: &mut T,
    versions: &ToolchainList,
    dependency: Option<&PinnedDependency>,
    strategy: SearchStrategy,
) -> Result<SearchOutcome> {
    match strategy {
        SearchStrategy::Bisect => bisect_oldest(trial, versions.as_slice(), dependency),
        SearchStrategy::Linear => scan(trial, versions.iter(), dependency),
    }
}

/// Determine the latest compatible toolchain according to `policy`.
pub fn latest_compatible<T: Trial + ?Sized>(
    trial: &mut T,
    versions: &ToolchainList,
    dependency: Option<&PinnedDependency>,
    policy: LatestPolicy,
) -> Result<SearchOutcome> {
    match policy {
        LatestPolicy::AssumeNewest => Ok(SearchOutcome {
            found: Some(versions.newest().clone()),
            probes: Vec::new(),
        }),
        LatestPolicy::BackwardScan => scan(trial, versions.iter().rev(), dependency),
    }
}

fn bisect_oldest<T: Trial + ?Sized>(
    trial: &mut T,
    versions: &[ToolchainVersion],
    dependency: Option<&PinnedDependency>,
) -> Result<SearchOutcome> {
    let mut search = SearchOutcome::default();
    let mut low = 0;
    let mut high = versions.len();

    while low < high {
        let mid = low + (high - low) / 2;
        let toolchain = &versions[mid];
        let outcome = trial.probe(toolchain, dependency)?;
        log_probe(toolchain, &outcome);

        match &outcome {
            TrialOutcome::Success => {
                search.found = Some(toolchain.clone());
                high = mid;
            }
            // Inconclusive trials also move right so the search terminates;
            // the record marks the result as unverified.
            TrialOutcome::Failure { .. } | TrialOutcome::ProvisioningError { .. } => {
                low = mid + 1;
            }
        }
        search.record(toolchain, outcome);
    }

    Ok(search)
}

fn scan<'a, T, I>(
    trial: &mut T,
    order: I,
    dependency: Option<&PinnedDependency>,
) -> Result<SearchOutcome>
where
    T: Trial + ?Sized,
    I: Iterator<Item = &'a ToolchainVersion>,
{
    let mut search = SearchOutcome::default();
    for toolchain in order {
        let outcome = trial.probe(toolchain, dependency)?;
        log_probe(toolchain, &outcome);
        let success = outcome.is_success();
        search.record(toolchain, outcome);
        if success {
            search.found = Some(toolchain.clone());
            break;
        }
    }
    Ok(search)
}

fn log_probe(toolchain: &ToolchainVersion, outcome: &TrialOutcome) {
    match outcome {
        TrialOutcome::ProvisioningError { message } => {
            tracing::warn!("  toolchain {}: inconclusive ({})", toolchain, message)
        }
        _ => tracing::info!("  toolchain {}: {}", toolchain, outcome),
    }
}
