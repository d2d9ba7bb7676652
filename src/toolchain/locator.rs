//! Locating installed toolchain wrappers.
//!
//! Wrappers are looked up in one explicit install root (the directory that
//! `go install golang.org/dl/goX@latest` writes into). The root is carried as
//! a value and handed to installs through `GOBIN`, so the process PATH is
//! never modified.

use crate::toolchain::version::ToolchainVersion;
use std::path::{Path, PathBuf};

/// Finds `go<version>` wrapper binaries under an install root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainLocator {
    install_root: PathBuf,
    tool: String,
}

impl ToolchainLocator {
    /// Create a locator for wrappers named `<tool><version>` in `install_root`.
    pub fn new(install_root: impl Into<PathBuf>, tool: impl Into<String>) -> Self {
        Self {
            install_root: install_root.into(),
            tool: tool.into(),
        }
    }

    /// Discover the install root from the real environment.
    pub fn discover(tool: &str) -> Option<Self> {
        Self::discover_with_env(tool, |key: &str| std::env::var(key))
    }

    /// Discover the install root with a custom env var lookup function.
    ///
    /// Checks `GOBIN`, then the first `GOPATH` entry's `bin`, then
    /// `$HOME/go/bin` (the toolchain's own default).
    pub fn discover_with_env<F>(tool: &str, env_fn: F) -> Option<Self>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let non_empty = |key: &str| env_fn(key).ok().filter(|v| !v.trim().is_empty());

        if let Some(gobin) = non_empty("GOBIN") {
            return Some(Self::new(gobin, tool));
        }

        if let Some(gopath) = non_empty("GOPATH") {
            if let Some(first) = std::env::split_paths(&gopath).next() {
                return Some(Self::new(first.join("bin"), tool));
            }
        }

        let home = non_empty("HOME").or_else(|| non_empty("USERPROFILE"))?;
        Some(Self::new(Path::new(&home).join("go").join("bin"), tool))
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    /// File name of the wrapper for `version`, e.g. `go1.21.0`.
    pub fn binary_name(&self, version: &ToolchainVersion) -> String {
        let name = format!("{}{}", self.tool, version);
        if cfg!(windows) {
            format!("{}.exe", name)
        } else {
            name
        }
    }

    /// Full path of the wrapper for `version`.
    pub fn binary_path(&self, version: &ToolchainVersion) -> PathBuf {
        self.install_root.join(self.binary_name(version))
    }

    /// Whether a launchable wrapper for `version` exists.
    pub fn is_installed(&self, version: &ToolchainVersion) -> bool {
        let path = self.binary_path(version);
        path.is_file() && is_executable(&path)
    }
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env::VarError;
    use std::fs;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, VarError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned().ok_or(VarError::NotPresent)
    }

    fn v(raw: &str) -> ToolchainVersion {
        ToolchainVersion::parse(raw).unwrap()
    }

    #[test]
    fn gobin_wins() {
        let env = env_from(&[("GOBIN", "/opt/gobin"), ("GOPATH", "/gp"), ("HOME", "/h")]);
        let locator = ToolchainLocator::discover_with_env("go", env).unwrap();
        assert_eq!(locator.install_root(), Path::new("/opt/gobin"));
    }

    #[test]
    fn gopath_bin_is_second() {
        let env = env_from(&[("GOPATH", "/gp"), ("HOME", "/h")]);
        let locator = ToolchainLocator::discover_with_env("go", env).unwrap();
        assert_eq!(locator.install_root(), Path::new("/gp/bin"));
    }

    #[test]
    fn home_go_bin_is_the_fallback() {
        let env = env_from(&[("HOME", "/h"), ("GOBIN", "  ")]);
        let locator = ToolchainLocator::discover_with_env("go", env).unwrap();
        assert_eq!(locator.install_root(), Path::new("/h/go/bin"));
    }

    #[test]
    fn nothing_set_finds_nothing() {
        let env = env_from(&[]);
        assert!(ToolchainLocator::discover_with_env("go", env).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn binary_path_joins_tool_and_version() {
        let locator = ToolchainLocator::new("/root/go/bin", "go");
        assert_eq!(
            locator.binary_path(&v("1.21.0")),
            PathBuf::from("/root/go/bin/go1.21.0")
        );
    }

    #[cfg(unix)]
    #[test]
    fn is_installed_requires_executable_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let locator = ToolchainLocator::new(temp.path(), "go");
        let version = v("1.20");
        assert!(!locator.is_installed(&version));

        let path = locator.binary_path(&version);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!locator.is_installed(&version));

        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(locator.is_installed(&version));
    }
}
