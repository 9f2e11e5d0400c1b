use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::descriptor::ProjectInfo;
use crate::options::OptionTable;
use crate::probe::EnvironmentSnapshot;
use crate::requirements::RequirementSet;
use crate::resolve::BuildPlan;
use crate::settings::{BuildType, Settings};

/// Toolchain operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolchainStep {
  Layout,
  Configure,
  Build,
  Install,
}

impl fmt::Display for ToolchainStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ToolchainStep::Layout => "layout",
      ToolchainStep::Configure => "configure",
      ToolchainStep::Build => "build",
      ToolchainStep::Install => "install",
    };
    write!(f, "{}", name)
  }
}

/// Failure reported by a toolchain.
#[derive(Debug, Error)]
pub enum ToolchainError {
  /// The toolchain executable could not be started.
  #[error("failed to launch '{program}' for {step}: {source}")]
  Spawn {
    step: ToolchainStep,
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The toolchain ran and reported failure. `diagnostic` is its own output.
  #[error("{step} exited with status {code:?}: {diagnostic}")]
  Failed {
    step: ToolchainStep,
    code: Option<i32>,
    diagnostic: String,
  },

  /// Filesystem error while preparing toolchain inputs.
  #[error("{step} could not write {}: {source}", path.display())]
  Io {
    step: ToolchainStep,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A step ran before the toolchain knew its directories.
  #[error("{step} requested before layout")]
  NotLaidOut { step: ToolchainStep },

  /// Failure reported by an embedding toolchain adapter.
  #[error("{step} failed: {message}")]
  Other { step: ToolchainStep, message: String },
}

impl ToolchainError {
  pub fn step(&self) -> ToolchainStep {
    match self {
      ToolchainError::Spawn { step, .. }
      | ToolchainError::Failed { step, .. }
      | ToolchainError::Io { step, .. }
      | ToolchainError::NotLaidOut { step }
      | ToolchainError::Other { step, .. } => *step,
    }
  }
}

/// Directories used by one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
  pub source_dir: PathBuf,
  pub build_dir: PathBuf,
  pub generators_dir: PathBuf,
}

impl Layout {
  /// Single-configuration cmake layout: `build/<BuildType>` with a
  /// `generators` folder inside it.
  pub fn cmake(source_dir: &Path, build_type: BuildType) -> Self {
    let build_dir = source_dir.join("build").join(build_type.as_str());
    Self {
      source_dir: source_dir.to_path_buf(),
      generators_dir: build_dir.join("generators"),
      build_dir,
    }
  }
}

/// Everything a toolchain receives at configure time.
///
/// The option table and requirement set are frozen: the toolchain only
/// borrows them.
#[derive(Debug, Clone, Copy)]
pub struct ToolchainInputs<'a> {
  pub project: &'a ProjectInfo,
  pub settings: &'a Settings,
  pub shared: bool,
  pub environment: &'a EnvironmentSnapshot,
  pub options: &'a OptionTable,
  pub requirements: &'a RequirementSet,
  /// Transitive graph with effective options, when the orchestrator resolved one.
  pub plan: Option<&'a BuildPlan>,
  pub layout: &'a Layout,
}

/// Black-box build driver.
pub trait Toolchain {
  /// Establish the on-disk directory structure.
  fn layout(&mut self, layout: &Layout) -> Result<(), ToolchainError>;

  /// Generate build files from the frozen descriptor state.
  fn configure(&mut self, inputs: &ToolchainInputs<'_>) -> Result<(), ToolchainError>;

  fn build(&mut self) -> Result<(), ToolchainError>;

  /// Install the built artifacts under `destination`.
  fn install(&mut self, destination: &Path) -> Result<(), ToolchainError>;
}
