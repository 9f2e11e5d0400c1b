use crate::error::DescriptorError;
use crate::options::{OptionTable, OptionValue};
use crate::probe::{Advisory, Diagnostics, EnvironmentSnapshot};
use crate::requirements::{Requirement, RequirementKind, RequirementSet};
use crate::settings::{SettingAxis, Settings};

use super::types::{PackageInfo, ProjectInfo};

/// Build intent authored for one project.
///
/// Hooks are called by [`Descriptor`](super::Descriptor) in a fixed order:
/// `configure`, `requirements`, `build_requirements` during the configure
/// phase, and `package_info` once the package is installed.
pub trait Recipe {
  fn info(&self) -> &ProjectInfo;

  /// Settings axes the recipe depends on.
  fn settings(&self) -> &[SettingAxis] {
    &SettingAxis::ALL
  }

  /// Value of the `shared` toggle when the consumer does not override it.
  fn default_shared(&self) -> bool {
    false
  }

  /// Adjust dependency options. Called after the environment probe.
  fn configure(&self, _ctx: &mut ConfigureCtx<'_>) -> Result<(), DescriptorError> {
    Ok(())
  }

  fn requirements(&self, _ctx: &mut RequirementsCtx<'_>) -> Result<(), DescriptorError> {
    Ok(())
  }

  fn build_requirements(&self, _ctx: &mut RequirementsCtx<'_>) -> Result<(), DescriptorError> {
    Ok(())
  }

  /// Declare the linkage names of the produced artifact.
  fn package_info(&self, info: &mut PackageInfo) -> Result<(), DescriptorError>;
}

/// State visible to the `configure` hook.
pub struct ConfigureCtx<'a> {
  pub(crate) environment: &'a EnvironmentSnapshot,
  pub(crate) settings: &'a Settings,
  pub(crate) shared: bool,
  pub(crate) options: &'a mut OptionTable,
  pub(crate) diagnostics: &'a mut Diagnostics,
}

impl<'a> ConfigureCtx<'a> {
  pub fn new(
    environment: &'a EnvironmentSnapshot,
    settings: &'a Settings,
    shared: bool,
    options: &'a mut OptionTable,
    diagnostics: &'a mut Diagnostics,
  ) -> Self {
    Self {
      environment,
      settings,
      shared,
      options,
      diagnostics,
    }
  }

  pub fn cross_building(&self) -> bool {
    self.environment.is_cross_building()
  }

  pub fn environment(&self) -> &EnvironmentSnapshot {
    self.environment
  }

  pub fn settings(&self) -> &Settings {
    self.settings
  }

  pub fn shared(&self) -> bool {
    self.shared
  }

  /// Override a dependency flag. Later calls for the same flag win.
  pub fn set_option(&mut self, dependency: &str, flag: &str, value: impl Into<OptionValue>) {
    self.options.set(dependency, flag, value);
  }

  pub fn options(&self) -> &OptionTable {
    self.options
  }

  /// Surface a recipe-authored advisory to the invoking user.
  pub fn warn(&mut self, message: &str) {
    self.diagnostics.push(Advisory::Recipe {
      message: message.to_string(),
    });
  }
}

/// State visible to the `requirements` and `build_requirements` hooks.
pub struct RequirementsCtx<'a> {
  pub(crate) environment: &'a EnvironmentSnapshot,
  pub(crate) settings: &'a Settings,
  pub(crate) requirements: &'a mut RequirementSet,
}

impl<'a> RequirementsCtx<'a> {
  pub fn new(environment: &'a EnvironmentSnapshot, settings: &'a Settings, requirements: &'a mut RequirementSet) -> Self {
    Self {
      environment,
      settings,
      requirements,
    }
  }

  pub fn cross_building(&self) -> bool {
    self.environment.is_cross_building()
  }

  pub fn settings(&self) -> &Settings {
    self.settings
  }

  /// Declare a runtime requirement from `name/version`.
  pub fn requires(&mut self, reference: &str) -> Result<&Requirement, DescriptorError> {
    self.requirements.add_reference(reference, RequirementKind::Runtime)
  }

  /// Declare a build-only requirement from `name/version`.
  pub fn tool_requires(&mut self, reference: &str) -> Result<&Requirement, DescriptorError> {
    self.requirements.add_reference(reference, RequirementKind::BuildOnly)
  }

  pub fn add(&mut self, name: &str, version: &str, kind: RequirementKind) -> Result<&Requirement, DescriptorError> {
    self.requirements.add(name, version, kind)
  }

  pub fn requirements(&self) -> &RequirementSet {
    self.requirements
  }
}
