//! Error kinds surfaced by a descriptor invocation.
//!
//! Every error is fatal to the current invocation. [`DescriptorError`] is the
//! umbrella returned by lifecycle operations; its variants keep the originating
//! kind so front-ends can report it precisely.

use std::path::PathBuf;

use thiserror::Error;

use crate::descriptor::Phase;
use crate::requirements::RequirementKind;
use crate::resolve::ResolveError;
use crate::toolchain::ToolchainError;

/// The environment could not be determined or the recipe is malformed.
#[derive(Debug, Error)]
pub enum ConfigurationError {
  #[error("cannot determine {which} environment: {reason}")]
  UndetectableEnvironment { which: &'static str, reason: String },

  #[error("invalid value '{value}' for setting '{axis}'")]
  InvalidSetting { axis: String, value: String },

  #[error("unknown setting '{0}'")]
  UnknownSetting(String),

  #[error("unknown project option '{0}' (only 'shared' is supported)")]
  UnknownOption(String),

  #[error("option '{flag}' targets '{dependency}', which is not a declared requirement")]
  UndeclaredDependency { dependency: String, flag: String },

  #[error("invalid value for option '{dependency}:{flag}': {reason}")]
  InvalidOptionValue {
    dependency: String,
    flag: String,
    reason: String,
  },

  #[error("requirement '{name}' must pin an exact version, got '{version}'")]
  InexactPin { name: String, version: String },

  #[error("malformed requirement reference '{0}': expected 'name/version'")]
  MalformedReference(String),

  #[error("package_info declared no linkage names")]
  EmptyBuildTarget,

  #[error("failed to load recipe {}: {message}", path.display())]
  RecipeLoad { path: PathBuf, message: String },

  #[error("recipe hook '{hook}' failed: {message}")]
  Recipe { hook: String, message: String },
}

/// The same dependency name was declared twice under one kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} requirement '{name}' already declared at version {existing}, cannot add version {attempted}")]
pub struct DuplicateRequirementError {
  pub name: String,
  pub kind: RequirementKind,
  pub existing: String,
  pub attempted: String,
}

/// A lifecycle phase was invoked out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot enter {attempted} while descriptor is {current}")]
pub struct InvalidStateTransitionError {
  pub current: Phase,
  pub attempted: Phase,
}

/// Errors returned by descriptor operations.
#[derive(Debug, Error)]
pub enum DescriptorError {
  #[error("configuration error: {0}")]
  Configuration(#[from] ConfigurationError),

  #[error("duplicate requirement: {0}")]
  DuplicateRequirement(#[from] DuplicateRequirementError),

  #[error("invalid state transition: {0}")]
  InvalidStateTransition(#[from] InvalidStateTransitionError),

  /// Payload of the toolchain failure, unmodified.
  #[error("toolchain failed during {phase}: {source}")]
  ExternalToolchain {
    phase: Phase,
    #[source]
    source: ToolchainError,
  },

  #[error("resolution failed: {0}")]
  Resolution(#[from] ResolveError),
}

impl DescriptorError {
  /// Name of the error kind, as reported to the invoking user.
  pub fn kind(&self) -> &'static str {
    match self {
      DescriptorError::Configuration(_) => "ConfigurationError",
      DescriptorError::DuplicateRequirement(_) => "DuplicateRequirementError",
      DescriptorError::InvalidStateTransition(_) => "InvalidStateTransitionError",
      DescriptorError::ExternalToolchain { .. } => "ExternalToolchainError",
      DescriptorError::Resolution(_) => "ResolutionError",
    }
  }
}
