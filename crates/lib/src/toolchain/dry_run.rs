//! Toolchain that records what it would do.
//!
//! Used by `recipe create --dry-run` and by tests that drive the descriptor without a
//! real build system.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use super::types::{Layout, Toolchain, ToolchainError, ToolchainInputs, ToolchainStep};

/// One recorded toolchain call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ToolchainCall {
  Layout { build_dir: PathBuf },
  Configure {
    options: usize,
    requirements: usize,
    packages: usize,
  },
  Build,
  Install { destination: PathBuf },
}

#[derive(Debug, Clone, Default)]
pub struct DryRunToolchain {
  laid_out: bool,
  calls: Vec<ToolchainCall>,
}

impl DryRunToolchain {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn calls(&self) -> &[ToolchainCall] {
    &self.calls
  }

  fn require_layout(&self, step: ToolchainStep) -> Result<(), ToolchainError> {
    if self.laid_out {
      Ok(())
    } else {
      Err(ToolchainError::NotLaidOut { step })
    }
  }
}

impl Toolchain for DryRunToolchain {
  fn layout(&mut self, layout: &Layout) -> Result<(), ToolchainError> {
    info!(build_dir = %layout.build_dir.display(), "[dry-run] layout");
    self.laid_out = true;
    self.calls.push(ToolchainCall::Layout {
      build_dir: layout.build_dir.clone(),
    });
    Ok(())
  }

  fn configure(&mut self, inputs: &ToolchainInputs<'_>) -> Result<(), ToolchainError> {
    self.require_layout(ToolchainStep::Configure)?;
    let packages = inputs.plan.map_or(0, |plan| plan.len());
    info!(
      project = %inputs.project.name,
      options = inputs.options.len(),
      requirements = inputs.requirements.len(),
      packages = packages,
      "[dry-run] configure"
    );
    self.calls.push(ToolchainCall::Configure {
      options: inputs.options.len(),
      requirements: inputs.requirements.len(),
      packages,
    });
    Ok(())
  }

  fn build(&mut self) -> Result<(), ToolchainError> {
    self.require_layout(ToolchainStep::Build)?;
    info!("[dry-run] build");
    self.calls.push(ToolchainCall::Build);
    Ok(())
  }

  fn install(&mut self, destination: &Path) -> Result<(), ToolchainError> {
    self.require_layout(ToolchainStep::Install)?;
    info!(destination = %destination.display(), "[dry-run] install");
    self.calls.push(ToolchainCall::Install {
      destination: destination.to_path_buf(),
    });
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn build_before_layout_is_refused() {
    let mut toolchain = DryRunToolchain::new();
    let err = toolchain.build().unwrap_err();
    assert!(matches!(err, ToolchainError::NotLaidOut { step: ToolchainStep::Build }));
    assert!(toolchain.calls().is_empty());
  }
}
