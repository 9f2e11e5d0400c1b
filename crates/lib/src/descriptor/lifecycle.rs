//! Descriptor lifecycle state machine.
//!
//! Each operation checks that the descriptor is in the phase immediately
//! before the one it enters. A rejected call changes nothing. Any other error
//! moves the descriptor to [`Phase::Failed`], after which every operation is
//! rejected: an invocation that failed cannot be resumed.

use std::path::Path;

use tracing::{debug, info};

use super::recipe::{ConfigureCtx, Recipe, RequirementsCtx};
use super::types::{BuildTarget, PackageInfo, Phase};
use crate::error::{DescriptorError, InvalidStateTransitionError};
use crate::options::{OptionAssignment, OptionTable};
use crate::probe::{self, Diagnostics, EnvironmentSnapshot, EnvironmentSource};
use crate::requirements::RequirementSet;
use crate::resolve::{self, BuildPlan, Catalog};
use crate::settings::Settings;
use crate::toolchain::{Layout, Toolchain, ToolchainError, ToolchainInputs};

/// One build invocation of a recipe.
///
/// Owns the option table and requirement set exclusively; nothing is shared
/// between descriptors.
pub struct Descriptor<R> {
  recipe: R,
  settings: Settings,
  shared: bool,
  overrides: Vec<OptionAssignment>,
  phase: Phase,
  diagnostics: Diagnostics,
  environment: Option<EnvironmentSnapshot>,
  options: OptionTable,
  requirements: RequirementSet,
  plan: Option<BuildPlan>,
  layout: Option<Layout>,
  target: Option<BuildTarget>,
}

impl<R: Recipe> Descriptor<R> {
  pub fn new(recipe: R, settings: Settings) -> Self {
    let shared = recipe.default_shared();
    Self {
      recipe,
      settings,
      shared,
      overrides: Vec::new(),
      phase: Phase::Uninitialized,
      diagnostics: Diagnostics::new(),
      environment: None,
      options: OptionTable::new(),
      requirements: RequirementSet::new(),
      plan: None,
      layout: None,
      target: None,
    }
  }

  /// Consumer override of the `shared` toggle.
  pub fn with_shared(mut self, shared: bool) -> Self {
    self.shared = shared;
    self
  }

  /// Consumer option overrides, applied after the recipe's `configure` hook
  /// in the given order.
  pub fn with_option_overrides(mut self, overrides: Vec<OptionAssignment>) -> Self {
    self.overrides = overrides;
    self
  }

  pub fn recipe(&self) -> &R {
    &self.recipe
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn settings(&self) -> &Settings {
    &self.settings
  }

  pub fn shared(&self) -> bool {
    self.shared
  }

  pub fn diagnostics(&self) -> &Diagnostics {
    &self.diagnostics
  }

  pub fn environment(&self) -> Option<&EnvironmentSnapshot> {
    self.environment.as_ref()
  }

  pub fn options(&self) -> &OptionTable {
    &self.options
  }

  pub fn requirements(&self) -> &RequirementSet {
    &self.requirements
  }

  /// The resolved dependency graph, if [`Descriptor::resolve`] ran.
  pub fn build_plan(&self) -> Option<&BuildPlan> {
    self.plan.as_ref()
  }

  /// Directories established by the toolchain, once laid out.
  pub fn build_layout(&self) -> Option<&Layout> {
    self.layout.as_ref()
  }

  pub fn build_target(&self) -> Option<&BuildTarget> {
    self.target.as_ref()
  }

  fn enter(&self, attempted: Phase) -> Result<(), InvalidStateTransitionError> {
    if attempted.predecessor() == Some(self.phase) {
      Ok(())
    } else {
      Err(InvalidStateTransitionError {
        current: self.phase,
        attempted,
      })
    }
  }

  fn finish<T>(&mut self, attempted: Phase, result: Result<T, DescriptorError>) -> Result<T, DescriptorError> {
    match result {
      Ok(value) => {
        info!(project = %self.recipe.info().name, phase = %attempted, "phase complete");
        self.phase = attempted;
        Ok(value)
      }
      Err(err) => {
        debug!(phase = %attempted, error = %err, "phase failed");
        self.phase = Phase::Failed;
        Err(err)
      }
    }
  }

  /// `Uninitialized → Configured`.
  ///
  /// Runs the environment probe, the recipe's `configure` hook, consumer
  /// overrides, then the `requirements` and `build_requirements` hooks.
  /// Finally checks that every option write targets a declared requirement.
  pub fn configure(&mut self, environment: &dyn EnvironmentSource) -> Result<(), DescriptorError> {
    self.enter(Phase::Configured)?;
    let result = self.run_configure(environment);
    self.finish(Phase::Configured, result)
  }

  fn run_configure(&mut self, environment: &dyn EnvironmentSource) -> Result<(), DescriptorError> {
    let snapshot = probe::detect(environment, &mut self.diagnostics)?;

    {
      let mut ctx = ConfigureCtx::new(
        &snapshot,
        &self.settings,
        self.shared,
        &mut self.options,
        &mut self.diagnostics,
      );
      self.recipe.configure(&mut ctx)?;
    }

    for assignment in &self.overrides {
      self.options.apply(assignment.clone());
    }

    {
      let mut ctx = RequirementsCtx::new(&snapshot, &self.settings, &mut self.requirements);
      self.recipe.requirements(&mut ctx)?;
      self.recipe.build_requirements(&mut ctx)?;
    }

    self.options.validate_dependencies(&self.requirements)?;

    debug!(
      options = self.options.len(),
      requirements = self.requirements.len(),
      cross_building = snapshot.is_cross_building(),
      "descriptor configured"
    );
    self.environment = Some(snapshot);
    Ok(())
  }

  /// Resolve the frozen requirements and options against `catalog`.
  ///
  /// Only valid while `Configured`; the phase does not advance. The plan is
  /// handed to the toolchain at build time. A resolution failure is fatal.
  pub fn resolve(&mut self, catalog: &Catalog) -> Result<&BuildPlan, DescriptorError> {
    if self.phase != Phase::Configured {
      return Err(
        InvalidStateTransitionError {
          current: self.phase,
          attempted: Phase::Configured,
        }
        .into(),
      );
    }

    match resolve::resolve(catalog, &self.requirements, &self.options) {
      Ok(plan) => {
        info!(packages = plan.len(), plan = %plan.id, "dependency graph resolved");
        Ok(self.plan.insert(plan))
      }
      Err(err) => {
        debug!(error = %err, "resolution failed");
        self.phase = Phase::Failed;
        Err(err.into())
      }
    }
  }

  /// `Configured → LaidOut`. The toolchain establishes the directories.
  pub fn layout(&mut self, toolchain: &mut dyn Toolchain, source_dir: &Path) -> Result<&Layout, DescriptorError> {
    self.enter(Phase::LaidOut)?;
    let layout = Layout::cmake(source_dir, self.settings.build_type);
    let result = toolchain
      .layout(&layout)
      .map_err(|source| DescriptorError::ExternalToolchain {
        phase: Phase::LaidOut,
        source,
      });
    self.finish(Phase::LaidOut, result)?;
    Ok(self.layout.insert(layout))
  }

  /// `LaidOut → Built`. Toolchain configure then build, with the frozen
  /// option table and requirement set as inputs.
  pub fn build(&mut self, toolchain: &mut dyn Toolchain) -> Result<(), DescriptorError> {
    self.enter(Phase::Built)?;
    let result = self.run_build(toolchain);
    self.finish(Phase::Built, result)
  }

  fn run_build(&self, toolchain: &mut dyn Toolchain) -> Result<(), DescriptorError> {
    // Both are always set once the descriptor is laid out.
    let (Some(environment), Some(layout)) = (self.environment.as_ref(), self.layout.as_ref()) else {
      return Err(
        InvalidStateTransitionError {
          current: self.phase,
          attempted: Phase::Built,
        }
        .into(),
      );
    };

    let inputs = ToolchainInputs {
      project: self.recipe.info(),
      settings: &self.settings,
      shared: self.shared,
      environment,
      options: &self.options,
      requirements: &self.requirements,
      plan: self.plan.as_ref(),
      layout,
    };

    let toolchain_error = |source: ToolchainError| DescriptorError::ExternalToolchain {
      phase: Phase::Built,
      source,
    };
    toolchain.configure(&inputs).map_err(toolchain_error)?;
    toolchain.build().map_err(toolchain_error)
  }

  /// `Built → Packaged`. The toolchain installs into `destination`.
  pub fn package(&mut self, toolchain: &mut dyn Toolchain, destination: &Path) -> Result<(), DescriptorError> {
    self.enter(Phase::Packaged)?;
    let result = toolchain
      .install(destination)
      .map_err(|source| DescriptorError::ExternalToolchain {
        phase: Phase::Packaged,
        source,
      });
    self.finish(Phase::Packaged, result)
  }

  /// `Packaged → Finalized`. Collects the linkage names from the recipe.
  pub fn package_info(&mut self) -> Result<&BuildTarget, DescriptorError> {
    self.enter(Phase::Finalized)?;
    let result = self.run_package_info();
    let target = self.finish(Phase::Finalized, result)?;
    Ok(self.target.insert(target))
  }

  fn run_package_info(&self) -> Result<BuildTarget, DescriptorError> {
    let mut info = PackageInfo::new();
    self.recipe.package_info(&mut info)?;
    Ok(BuildTarget::try_from(info)?)
  }

  /// Drive every phase in order and return the build target.
  pub fn run(
    &mut self,
    environment: &dyn EnvironmentSource,
    toolchain: &mut dyn Toolchain,
    source_dir: &Path,
    destination: &Path,
  ) -> Result<&BuildTarget, DescriptorError> {
    self.configure(environment)?;
    self.layout(toolchain, source_dir)?;
    self.build(toolchain)?;
    self.package(toolchain, destination)?;
    self.package_info()
  }
}
