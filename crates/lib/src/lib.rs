//! recipe-lib: Core types and logic for package build descriptors
//!
//! This crate provides the fundamental types used by the `recipe` orchestrator:
//! - `OptionTable`: per-dependency feature flag overrides
//! - `RequirementSet`: pinned runtime and build-only requirements
//! - `EnvironmentSnapshot`: host/target tuples and the cross-building probe
//! - `Descriptor`: the lifecycle state machine driving an external toolchain
//! - `BuildPlan`: the transitive graph resolved against a package catalog

pub mod consts;
pub mod descriptor;
pub mod error;
pub mod init;
pub mod lua;
pub mod options;
pub mod platform;
pub mod probe;
pub mod requirements;
pub mod resolve;
pub mod settings;
pub mod toolchain;
pub mod util;

pub use error::{
  ConfigurationError, DescriptorError, DuplicateRequirementError, InvalidStateTransitionError,
};
