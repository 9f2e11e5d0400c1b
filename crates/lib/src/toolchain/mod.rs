//! External toolchain collaborator.
//!
//! The descriptor delegates layout, configure, build and install to a
//! [`Toolchain`]. Calls block until the toolchain reports success or failure;
//! failures are surfaced verbatim and never retried.
//!
//! # Submodules
//!
//! - [`cmake`] - Drives a `cmake` executable
//! - [`dry_run`] - Records calls without side effects

pub mod cmake;
pub mod dry_run;
mod types;

pub use cmake::CmakeToolchain;
pub use dry_run::{DryRunToolchain, ToolchainCall};
pub use types::*;
