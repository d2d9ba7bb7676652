//! Error types for gocompat operations.
//!
//! This module defines [`CompatError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Build and resolution failures observed while probing are *not* errors;
//!   they are reported as [`TrialOutcome`](crate::trial::TrialOutcome) data
//! - `SandboxSetup` means the local environment is broken and aborts the
//!   current dependency
//! - Use `anyhow::Error` (via `CompatError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for gocompat operations.
#[derive(Debug, Error)]
pub enum CompatError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A toolchain version string is not usable as a wrapper name.
    #[error("Invalid toolchain version: '{version}'")]
    InvalidToolchainVersion { version: String },

    /// The sandbox workspace could not be created or written.
    #[error("Sandbox setup failed at {path}: {source}")]
    SandboxSetup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Toolchain install or SDK download failed.
    #[error("Could not provision toolchain {version}: {message}")]
    Provisioning { version: String, message: String },

    /// The dependency could not be resolved to a concrete version.
    #[error("Could not resolve '{module}': {message}")]
    Resolution { module: String, message: String },

    /// An external command could not be started at all.
    #[error("Failed to launch '{command}': {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CompatError {
    /// Whether this error means the local environment is broken and the
    /// current dependency's probe must be abandoned.
    pub fn is_fatal_setup(&self) -> bool {
        matches!(self, CompatError::SandboxSetup { .. })
    }
}

/// Result type alias for gocompat operations.
pub type Result<T> = std::result::Result<T, CompatError>;
