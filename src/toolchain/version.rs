//! Toolchain version identifiers.
//!
//! Versions are opaque strings such as `1.13` or `1.21.0`. Their order is
//! the order of the configured list, which must already be ascending; it is
//! never re-sorted here.

use crate::error::{CompatError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Shapes accepted as a `go<version>` wrapper suffix.
static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\d+(?:\.\d+)?(?:(?:rc|beta)\d+)?$").expect("VERSION_REGEX must compile")
});

/// A single installable toolchain release.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolchainVersion(String);

impl ToolchainVersion {
    /// Validate and wrap a version string.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if VERSION_REGEX.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(CompatError::InvalidToolchainVersion {
                version: raw.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolchainVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ToolchainVersion {
    type Err = CompatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ToolchainVersion {
    type Error = CompatError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ToolchainVersion> for String {
    fn from(value: ToolchainVersion) -> Self {
        value.0
    }
}

/// The configured, ascending list of toolchain versions to search.
///
/// Guaranteed non-empty and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainList {
    versions: Vec<ToolchainVersion>,
}

impl ToolchainList {
    /// Build a list, keeping the caller's order.
    pub fn new(versions: Vec<ToolchainVersion>) -> Result<Self> {
        if versions.is_empty() {
            return Err(CompatError::ConfigValidationError {
                message: "at least one toolchain version is required".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for version in &versions {
            if !seen.insert(version) {
                return Err(CompatError::ConfigValidationError {
                    message: format!("toolchain version '{}' is listed twice", version),
                });
            }
        }

        Ok(Self { versions })
    }

    /// Parse each string and build a list.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self> {
        let versions = raw
            .iter()
            .map(|v| ToolchainVersion::parse(v.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(versions)
    }

    pub fn as_slice(&self) -> &[ToolchainVersion] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn oldest(&self) -> &ToolchainVersion {
        &self.versions[0]
    }

    pub fn newest(&self) -> &ToolchainVersion {
        &self.versions[self.versions.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ToolchainVersion> {
        self.versions.iter()
    }
}

impl<'a> IntoIterator for &'a ToolchainList {
    type Item = &'a ToolchainVersion;
    type IntoIter = std::slice::Iter<'a, ToolchainVersion>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
