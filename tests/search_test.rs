//! Integration tests for the compatibility search against stub trials.

use gocompat::dependency::{DependencySpec, PinnedDependency};
use gocompat::search::{latest_compatible, oldest_compatible, LatestPolicy, SearchStrategy};
use gocompat::toolchain::{ToolchainList, ToolchainVersion};
use gocompat::trial::{FailureStage, Trial, TrialOutcome};
use gocompat::Result;

const VERSIONS: [&str; 12] = [
    "1.13", "1.14", "1.15", "1.16", "1.17", "1.18", "1.19", "1.20", "1.21.0", "1.22.0", "1.23.0",
    "1.24.0",
];

/// Builds from index `first_ok` upward (never, if `None`).
struct Monotonic {
    list: ToolchainList,
    first_ok: Option<usize>,
    probed: Vec<String>,
}

impl Monotonic {
    fn new(list: &ToolchainList, first_ok: Option<usize>) -> Self {
        Self {
            list: list.clone(),
            first_ok,
            probed: Vec::new(),
        }
    }

    fn index(&self, toolchain: &ToolchainVersion) -> usize {
        self.list.iter().position(|v| v == toolchain).unwrap()
    }
}

impl Trial for Monotonic {
    fn resolve_version(&mut self, _dependency: &DependencySpec) -> Result<String> {
        Ok("v1.0.0".to_string())
    }

    fn probe(
        &mut self,
        toolchain: &ToolchainVersion,
        _dependency: Option<&PinnedDependency>,
    ) -> Result<TrialOutcome> {
        self.probed.push(toolchain.to_string());
        let ok = self.first_ok.is_some_and(|t| self.index(toolchain) >= t);
        Ok(if ok {
            TrialOutcome::Success
        } else {
            TrialOutcome::failure(FailureStage::Build, "undefined: errors.Join")
        })
    }
}

fn list(n: usize) -> ToolchainList {
    ToolchainList::parse(&VERSIONS[..n]).unwrap()
}

fn probe_bound(n: usize) -> usize {
    (n as f64).log2().ceil() as usize + 1
}

fn pinned() -> PinnedDependency {
    DependencySpec::new("example.com/lib", "v1").pin(Some("v1.0.0".into()))
}

#[test]
fn bisect_finds_exact_threshold_within_log_bound() {
    for n in 1..=VERSIONS.len() {
        let versions = list(n);
        for threshold in 0..n {
            let mut trial = Monotonic::new(&versions, Some(threshold));
            let search =
                oldest_compatible(&mut trial, &versions, Some(&pinned()), SearchStrategy::Bisect)
                    .unwrap();

            assert_eq!(
                search.found.as_ref().map(|v| v.as_str()),
                Some(VERSIONS[threshold]),
                "n={} threshold={}",
                n,
                threshold
            );
            assert!(
                search.probes.len() <= probe_bound(n),
                "n={} threshold={} took {} probes",
                n,
                threshold,
                search.probes.len()
            );
        }
    }
}

#[test]
fn linear_agrees_with_bisect() {
    let versions = list(VERSIONS.len());
    for threshold in 0..VERSIONS.len() {
        let mut trial = Monotonic::new(&versions, Some(threshold));
        let linear =
            oldest_compatible(&mut trial, &versions, Some(&pinned()), SearchStrategy::Linear)
                .unwrap();
        assert_eq!(linear.found.unwrap().as_str(), VERSIONS[threshold]);
        assert_eq!(linear.probes.len(), threshold + 1);
    }
}

#[test]
fn nothing_builds_means_no_oldest() {
    let versions = list(VERSIONS.len());
    let mut trial = Monotonic::new(&versions, None);

    let search =
        oldest_compatible(&mut trial, &versions, Some(&pinned()), SearchStrategy::Bisect).unwrap();

    assert!(search.found.is_none());
    assert!(!search.probes.is_empty());
    assert!(search
        .probes
        .iter()
        .all(|p| matches!(p.outcome, TrialOutcome::Failure { .. })));
    assert!(!search.is_inconclusive());
}

#[test]
fn everything_builds_means_oldest_is_first() {
    let versions = list(VERSIONS.len());
    let mut trial = Monotonic::new(&versions, Some(0));

    let search = oldest_compatible(&mut trial, &versions, None, SearchStrategy::Bisect).unwrap();

    assert_eq!(search.found.unwrap().as_str(), "1.13");
}

#[test]
fn five_version_example() {
    let versions =
        ToolchainList::parse(&["1.19.0", "1.20.0", "1.21.0", "1.22.0", "1.23.0"]).unwrap();
    let mut trial = Monotonic::new(&versions, Some(2));

    let oldest =
        oldest_compatible(&mut trial, &versions, Some(&pinned()), SearchStrategy::Bisect).unwrap();
    let latest = latest_compatible(
        &mut trial,
        &versions,
        Some(&pinned()),
        LatestPolicy::AssumeNewest,
    )
    .unwrap();

    assert_eq!(oldest.found.unwrap().as_str(), "1.21.0");
    assert_eq!(latest.found.unwrap().as_str(), "1.23.0");
    assert!(latest.probes.is_empty());
    assert_eq!(trial.probed, ["1.21.0", "1.20.0"]);
}

#[test]
fn backward_scan_verifies_newest_first() {
    let versions = list(5);
    let mut trial = Monotonic::new(&versions, Some(1));

    let latest = latest_compatible(&mut trial, &versions, None, LatestPolicy::BackwardScan).unwrap();

    assert_eq!(latest.found.unwrap().as_str(), "1.17");
    assert_eq!(trial.probed, ["1.17"]);
}
