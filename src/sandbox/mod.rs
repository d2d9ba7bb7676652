//! Disposable per-trial workspaces.
//!
//! A [`Sandbox`] owns a fresh temporary directory holding a manifest and a
//! program file. The directory is removed when the sandbox is torn down or
//! dropped, so early returns never leak it.

pub mod manifest;

use crate::dependency::PinnedDependency;
use crate::error::{CompatError, Result};
use crate::toolchain::ToolchainVersion;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub use manifest::{LOCK_FILE, MANIFEST_FILE, PROGRAM_FILE};

/// Module name written into every sandbox manifest.
const SANDBOX_MODULE: &str = "sandbox";

/// Creates sandboxes.
#[derive(Debug, Clone, Default)]
pub struct SandboxBuilder {
    parent: Option<PathBuf>,
}

impl SandboxBuilder {
    /// Create sandboxes in the system temp directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create sandboxes under `parent` instead of the system temp directory.
    pub fn in_dir(parent: impl Into<PathBuf>) -> Self {
        Self {
            parent: Some(parent.into()),
        }
    }

    /// Materialize a sandbox targeting `toolchain`, importing `dependency`
    /// if given.
    pub fn build(
        &self,
        toolchain: &ToolchainVersion,
        dependency: Option<&PinnedDependency>,
    ) -> Result<Sandbox> {
        let prefix = if dependency.is_some() {
            "gocompat-"
        } else {
            "gocompat-control-"
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);
        let dir = match &self.parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(|source| CompatError::SandboxSetup {
            path: self.parent.clone().unwrap_or_else(std::env::temp_dir),
            source,
        })?;

        let sandbox = Sandbox { dir };

        let manifest = manifest::render_manifest(SANDBOX_MODULE, toolchain, dependency);
        sandbox.write(MANIFEST_FILE, &manifest)?;

        let program = manifest::render_program(dependency.map(|d| d.import_path.as_str()));
        sandbox.write(PROGRAM_FILE, &program)?;

        tracing::debug!(
            "Created sandbox {} for toolchain {}",
            sandbox.path().display(),
            toolchain
        );
        Ok(sandbox)
    }
}

/// An exclusively owned workspace for one trial.
#[derive(Debug)]
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path().join(MANIFEST_FILE)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.path().join(LOCK_FILE)
    }

    /// Delete the lock file so the next resolution starts from scratch.
    pub fn clear_lock(&self) -> Result<()> {
        let lock = self.lock_path();
        match fs::remove_file(&lock) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CompatError::SandboxSetup { path: lock, source }),
        }
    }

    /// Remove the workspace now, logging instead of failing if that is not
    /// possible.
    pub fn teardown(self) {
        let path = self.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            tracing::warn!("Failed to remove sandbox {}: {}", path.display(), e);
        }
    }

    fn write(&self, file: &str, content: &str) -> Result<()> {
        let path = self.path().join(file);
        fs::write(&path, content).map_err(|source| CompatError::SandboxSetup { path, source })
    }
}
