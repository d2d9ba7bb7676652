//! Dependencies under test.
//!
//! A [`DependencySpec`] is what the user configured: a module path, a version
//! constraint and optionally the package to import. Once the constraint has
//! been resolved, it becomes a [`PinnedDependency`] that probes write into
//! their manifests.

use crate::error::{CompatError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Constraint value meaning "whatever the newest toolchain picks".
pub const LATEST: &str = "latest";

/// Characters allowed in module and import paths.
static PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._~+\-]*(?:/[A-Za-z0-9._~+\-]+)*$")
        .expect("PATH_REGEX must compile")
});

/// A configured dependency to probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpec {
    /// Module path, e.g. `github.com/stretchr/testify`.
    pub module: String,

    /// Version constraint: `latest`, a version prefix like `v1`, an exact
    /// version or a range query like `>=v1.2.0`.
    #[serde(default = "default_constraint")]
    pub constraint: String,

    /// Package to import when it differs from the module root,
    /// e.g. `github.com/stretchr/testify/assert`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import: Option<String>,
}

fn default_constraint() -> String {
    LATEST.to_string()
}

impl DependencySpec {
    /// Create a dependency importing the module root.
    pub fn new(module: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            constraint: constraint.into(),
            import: None,
        }
    }

    /// Import a sub-package instead of the module root.
    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.import = Some(import.into());
        self
    }

    /// The package path the probe program imports.
    pub fn import_path(&self) -> &str {
        self.import.as_deref().unwrap_or(&self.module)
    }

    /// The module query handed to the toolchain's `get`, e.g. `mod@v1`.
    pub fn query(&self) -> String {
        let constraint = self.constraint.trim();
        let constraint = if constraint.is_empty() { LATEST } else { constraint };
        format!("{}@{}", self.module, constraint)
    }

    /// Check that the module and import paths can be written into a
    /// manifest and a program file verbatim.
    pub fn validate(&self) -> Result<()> {
        for (what, path) in [("module", self.module.as_str()), ("import", self.import_path())] {
            if !PATH_REGEX.is_match(path) {
                return Err(CompatError::ConfigValidationError {
                    message: format!("invalid {} path '{}'", what, path),
                });
            }
        }

        if let Some(import) = &self.import {
            let under_module = import == &self.module
                || import.starts_with(&format!("{}/", self.module));
            if !under_module {
                return Err(CompatError::ConfigValidationError {
                    message: format!(
                        "import path '{}' is not inside module '{}'",
                        import, self.module
                    ),
                });
            }
        }

        if self.constraint.chars().any(char::is_whitespace) {
            return Err(CompatError::ConfigValidationError {
                message: format!(
                    "constraint '{}' for '{}' contains whitespace",
                    self.constraint, self.module
                ),
            });
        }

        Ok(())
    }

    /// Attach the concrete version the newest toolchain resolved, if any.
    pub fn pin(&self, resolved: Option<String>) -> PinnedDependency {
        PinnedDependency {
            module: self.module.clone(),
            import_path: self.import_path().to_string(),
            version: resolved,
        }
    }
}

/// A dependency as it is written into a sandbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedDependency {
    pub module: String,
    pub import_path: String,
    /// Concrete version to require; `None` lets the tidy step choose.
    pub version: Option<String>,
}
