//! Compatibility result records, JSON output and the terminal summary.

use crate::dependency::DependencySpec;
use crate::error::Result;
use crate::search::{LatestPolicy, SearchStrategy};
use chrono::{DateTime, Utc};
use console::style;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Package name used for the dependency-free control case.
pub const CONTROL_NAME: &str = "CONTROL";

/// Constraint shown for the control case.
pub const CONTROL_SPEC: &str = "none";

/// The outcome of probing one dependency (or the control case).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub package_name: String,
    pub dependency_spec: String,
    pub resolved_version: Option<String>,
    pub oldest_compatible: Option<String>,
    pub latest_compatible: Option<String>,
    pub error: Option<String>,

    /// Oldest-compatible search strategy used.
    pub search: SearchStrategy,
    /// How `latest_compatible` was determined.
    pub latest_policy: LatestPolicy,
    /// Whether `oldest_compatible` relies on the monotonicity assumption.
    pub assumes_monotonic: bool,
    /// Whether any trial could not provision its toolchain, so the
    /// boundaries may be wrong.
    pub inconclusive: bool,
    /// Versions whose trial could not provision its toolchain.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_versions: Vec<String>,
    /// Number of trials run.
    pub probes: usize,
    /// Caveats worth reading alongside the boundaries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    pub probed_at: DateTime<Utc>,
}

impl CompatibilityResult {
    /// An empty result for `dependency` with the given policies.
    pub fn for_dependency(
        dependency: &DependencySpec,
        search: SearchStrategy,
        latest_policy: LatestPolicy,
    ) -> Self {
        Self::blank(
            dependency.module.clone(),
            dependency.constraint.clone(),
            search,
            latest_policy,
        )
    }

    /// An empty result for the control case.
    pub fn control(search: SearchStrategy, latest_policy: LatestPolicy) -> Self {
        Self::blank(
            CONTROL_NAME.to_string(),
            CONTROL_SPEC.to_string(),
            search,
            latest_policy,
        )
    }

    fn blank(
        package_name: String,
        dependency_spec: String,
        search: SearchStrategy,
        latest_policy: LatestPolicy,
    ) -> Self {
        Self {
            package_name,
            dependency_spec,
            resolved_version: None,
            oldest_compatible: None,
            latest_compatible: None,
            error: None,
            search,
            latest_policy,
            assumes_monotonic: search == SearchStrategy::Bisect,
            inconclusive: false,
            skipped_versions: Vec::new(),
            probes: 0,
            notes: Vec::new(),
            probed_at: Utc::now(),
        }
    }

    /// Mark the whole probe as failed, discarding partial boundaries.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.oldest_compatible = None;
        self.latest_compatible = None;
        self.error = Some(error.into());
        self
    }

    pub fn is_control(&self) -> bool {
        self.package_name == CONTROL_NAME && self.dependency_spec == CONTROL_SPEC
    }
}

/// Write results as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
    fs::write(path, json)?;
    Ok(())
}

/// File name for a single-package result, e.g. `result-mux.json`.
pub fn single_result_file_name(module: &str) -> String {
    let base = module
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(module);
    format!("result-{}.json", base)
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}

/// One summary line per result.
pub fn summary_line(result: &CompatibilityResult) -> String {
    let name = if result.is_control() {
        style(result.package_name.as_str()).bold().to_string()
    } else {
        result.package_name.clone()
    };

    if let Some(error) = &result.error {
        return format!("{} {} - {}", style("✗").red(), name, error);
    }

    let marker = match (&result.oldest_compatible, result.inconclusive) {
        (_, true) => style("?").yellow(),
        (Some(_), false) => style("✓").green(),
        (None, false) => style("✗").red(),
    };

    let mut line = format!(
        "{} {} (resolved {}): oldest={}, latest={}",
        marker,
        name,
        or_na(result.resolved_version.as_deref()),
        or_na(result.oldest_compatible.as_deref()),
        or_na(result.latest_compatible.as_deref()),
    );
    if result.inconclusive {
        line.push_str(&format!(
            " {}",
            style(format!("[inconclusive: {}]", result.skipped_versions.join(", "))).dim()
        ));
    }
    line
}

/// Render the summary of a whole run.
pub fn render_summary(results: &[CompatibilityResult]) -> String {
    let mut out = String::new();
    for result in results {
        out.push_str(&summary_line(result));
        out.push('\n');
    }

    let errored = results.iter().filter(|r| r.error.is_some()).count();
    let inconclusive = results.iter().filter(|r| r.inconclusive).count();
    out.push_str(&format!(
        "{} results, {} errored, {} inconclusive\n",
        results.len(),
        errored,
        inconclusive
    ));
    out
}
