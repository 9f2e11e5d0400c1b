//! CMake toolchain adapter.
//!
//! Writes a generated toolchain file and a requirements manifest into the
//! generators folder, then runs `cmake` for configure, build and install.
//! Each step blocks until the process exits.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::types::{Layout, Toolchain, ToolchainError, ToolchainInputs, ToolchainStep};
use crate::consts::{APP_NAME, CMAKE_ENV, REQUIREMENTS_FILE_NAME, TOOLCHAIN_FILE_NAME};
use crate::settings::BuildType;

/// Runs a `cmake` executable.
#[derive(Debug, Clone)]
pub struct CmakeToolchain {
  program: String,
  layout: Option<Layout>,
  build_type: BuildType,
}

impl Default for CmakeToolchain {
  fn default() -> Self {
    Self::new()
  }
}

impl CmakeToolchain {
  /// Use `RECIPE_CMAKE` if set, otherwise `cmake` from `PATH`.
  pub fn new() -> Self {
    let program = std::env::var(CMAKE_ENV).unwrap_or_else(|_| "cmake".to_string());
    Self::with_program(&program)
  }

  pub fn with_program(program: &str) -> Self {
    Self {
      program: program.to_string(),
      layout: None,
      build_type: BuildType::default(),
    }
  }

  pub fn program(&self) -> &str {
    &self.program
  }

  fn layout_for(&self, step: ToolchainStep) -> Result<&Layout, ToolchainError> {
    self.layout.as_ref().ok_or(ToolchainError::NotLaidOut { step })
  }

  fn run(&self, step: ToolchainStep, args: &[String]) -> Result<(), ToolchainError> {
    info!(program = %self.program, step = %step, "running cmake");
    debug!(args = ?args, "cmake arguments");

    let output = Command::new(&self.program)
      .args(args)
      .output()
      .map_err(|source| ToolchainError::Spawn {
        step,
        program: self.program.clone(),
        source,
      })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      let diagnostic = if stderr.trim().is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
      } else {
        stderr.trim().to_string()
      };
      return Err(ToolchainError::Failed {
        step,
        code: output.status.code(),
        diagnostic,
      });
    }

    Ok(())
  }
}

fn write_file(step: ToolchainStep, path: PathBuf, content: &str) -> Result<PathBuf, ToolchainError> {
  std::fs::write(&path, content).map_err(|source| ToolchainError::Io {
    step,
    path: path.clone(),
    source,
  })?;
  Ok(path)
}

fn path_arg(path: &Path) -> String {
  path.to_string_lossy().into_owned()
}

impl Toolchain for CmakeToolchain {
  fn layout(&mut self, layout: &Layout) -> Result<(), ToolchainError> {
    std::fs::create_dir_all(&layout.generators_dir).map_err(|source| ToolchainError::Io {
      step: ToolchainStep::Layout,
      path: layout.generators_dir.clone(),
      source,
    })?;
    debug!(build_dir = %layout.build_dir.display(), "build directories created");
    self.layout = Some(layout.clone());
    Ok(())
  }

  fn configure(&mut self, inputs: &ToolchainInputs<'_>) -> Result<(), ToolchainError> {
    let step = ToolchainStep::Configure;
    let layout = self.layout_for(step)?.clone();
    self.build_type = inputs.settings.build_type;

    let toolchain_file = write_file(
      step,
      layout.generators_dir.join(TOOLCHAIN_FILE_NAME),
      &render_toolchain_file(inputs),
    )?;
    write_file(
      step,
      layout.generators_dir.join(REQUIREMENTS_FILE_NAME),
      &render_requirements(inputs)?,
    )?;

    self.run(
      step,
      &[
        "-S".to_string(),
        path_arg(&layout.source_dir),
        "-B".to_string(),
        path_arg(&layout.build_dir),
        format!("-DCMAKE_TOOLCHAIN_FILE={}", path_arg(&toolchain_file)),
        format!("-DCMAKE_BUILD_TYPE={}", self.build_type),
      ],
    )
  }

  fn build(&mut self) -> Result<(), ToolchainError> {
    let step = ToolchainStep::Build;
    let build_dir = path_arg(&self.layout_for(step)?.build_dir);
    self.run(
      step,
      &[
        "--build".to_string(),
        build_dir,
        "--config".to_string(),
        self.build_type.to_string(),
      ],
    )
  }

  fn install(&mut self, destination: &Path) -> Result<(), ToolchainError> {
    let step = ToolchainStep::Install;
    let build_dir = path_arg(&self.layout_for(step)?.build_dir);
    self.run(
      step,
      &[
        "--install".to_string(),
        build_dir,
        "--prefix".to_string(),
        path_arg(destination),
        "--config".to_string(),
        self.build_type.to_string(),
      ],
    )
  }
}

/// Cache variable name for a dependency flag, e.g. `RECIPE_OPT_ASSIMP_WITH_OBJ`.
pub fn option_variable(dependency: &str, flag: &str) -> String {
  let sanitize = |s: &str| {
    s.chars()
      .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
      .collect::<String>()
  };
  format!("RECIPE_OPT_{}_{}", sanitize(dependency), sanitize(flag))
}

/// Contents of the generated cmake toolchain file.
pub fn render_toolchain_file(inputs: &ToolchainInputs<'_>) -> String {
  let settings = inputs.settings;
  let mut lines = vec![format!(
    "# Generated by {} for {}/{}",
    APP_NAME, inputs.project.name, inputs.project.version
  )];

  if inputs.environment.is_cross_building() {
    lines.push(format!("set(CMAKE_SYSTEM_NAME {})", settings.os.cmake_system_name()));
    lines.push(format!("set(CMAKE_SYSTEM_PROCESSOR {})", settings.arch.cmake_processor()));
  }

  lines.push(format!(
    "set(CMAKE_BUILD_TYPE \"{}\" CACHE STRING \"\" FORCE)",
    settings.build_type
  ));
  lines.push(format!(
    "set(BUILD_SHARED_LIBS {} CACHE BOOL \"\" FORCE)",
    if inputs.shared { "ON" } else { "OFF" }
  ));

  lines.extend(inputs.options.iter().map(|(flag, value)| {
    format!(
      "set({} \"{}\" CACHE STRING \"\" FORCE)",
      option_variable(&flag.dependency, &flag.flag),
      value.cmake_value()
    )
  }));

  lines.push(String::new());
  lines.join("\n")
}

/// Contents of the generated requirements manifest.
///
/// `packages` is the resolved graph in build order, or `null` when no
/// catalog was consulted.
pub fn render_requirements(inputs: &ToolchainInputs<'_>) -> Result<String, ToolchainError> {
  let document = serde_json::json!({
    "project": inputs.project,
    "settings": inputs.settings,
    "shared": inputs.shared,
    "requirements": inputs.requirements,
    "options": inputs.options,
    "plan": inputs.plan.map(|plan| &plan.id),
    "packages": inputs.plan.map(|plan| &plan.packages),
  });
  serde_json::to_string_pretty(&document).map_err(|err| ToolchainError::Other {
    step: ToolchainStep::Configure,
    message: format!("cannot serialize {}: {}", REQUIREMENTS_FILE_NAME, err),
  })
}
