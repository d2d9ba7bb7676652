//! Toolchain versions, discovery and provisioning.
//!
//! # Modules
//!
//! - [`version`] - Validated version identifiers and the ascending search list
//! - [`locator`] - Finding installed `go<version>` wrappers under an install root
//! - [`provisioner`] - Idempotent install + SDK download

pub mod locator;
pub mod provisioner;
pub mod version;

pub use locator::ToolchainLocator;
pub use provisioner::Provisioner;
pub use version::{ToolchainList, ToolchainVersion};
