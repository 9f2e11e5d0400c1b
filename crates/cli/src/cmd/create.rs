//! Implementation of the `recipe create` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use recipe_lib::descriptor::{BuildTarget, Descriptor, Recipe};
use recipe_lib::lua::LuaRecipe;
use recipe_lib::probe::HostEnvironment;
use recipe_lib::toolchain::{CmakeToolchain, DryRunToolchain, Toolchain};

use crate::cmd::{ProfileArgs, load_catalog, load_descriptor, recipe_path};
use crate::output::{OutputFormat, print_heading, print_item, print_json, print_stat, print_success, truncate_hash};

/// Flags of `recipe create` beyond the shared profile.
#[derive(Debug, Default)]
pub struct CreateOptions {
  pub catalog: Option<PathBuf>,
  pub dry_run: bool,
  pub prefix: Option<PathBuf>,
  pub source: Option<PathBuf>,
}

/// Drive the full lifecycle: configure, layout, build, package, package_info.
pub fn cmd_create(recipe: &Path, options: &CreateOptions, profile: &ProfileArgs, format: OutputFormat) -> Result<()> {
  let source_dir = match &options.source {
    Some(dir) => dir.clone(),
    None => recipe_path(recipe)
      .parent()
      .map(Path::to_path_buf)
      .filter(|dir| !dir.as_os_str().is_empty())
      .unwrap_or_else(|| PathBuf::from(".")),
  };
  let source_dir = source_dir
    .canonicalize()
    .with_context(|| format!("Source directory not found: {}", source_dir.display()))?;
  let destination = options.prefix.clone().unwrap_or_else(|| source_dir.join("package"));

  let catalog = load_catalog(options.catalog.clone())?;
  let mut descriptor = load_descriptor(recipe, profile)?;
  let environment = HostEnvironment::new(descriptor.settings());

  // Resolve before touching the build tree so a bad graph fails fast.
  if let Some(catalog) = catalog {
    descriptor.configure(&environment)?;
    descriptor.resolve(&catalog)?;
  }

  if options.dry_run {
    let mut toolchain = DryRunToolchain::new();
    let target = finish(&mut descriptor, &environment, &mut toolchain, &source_dir, &destination)?;
    report(&descriptor, &target, &destination, Some(&toolchain), format)
  } else {
    let mut toolchain = CmakeToolchain::new();
    info!(program = toolchain.program(), "using cmake toolchain");
    let target = finish(&mut descriptor, &environment, &mut toolchain, &source_dir, &destination)?;
    report(&descriptor, &target, &destination, None, format)
  }
}

/// Run the remaining phases, skipping configure when resolution already did it.
fn finish(
  descriptor: &mut Descriptor<LuaRecipe>,
  environment: &HostEnvironment,
  toolchain: &mut dyn Toolchain,
  source_dir: &Path,
  destination: &Path,
) -> Result<BuildTarget> {
  if descriptor.environment().is_none() {
    descriptor.configure(environment)?;
  }
  descriptor.layout(toolchain, source_dir)?;
  descriptor.build(toolchain)?;
  descriptor.package(toolchain, destination)?;
  Ok(descriptor.package_info()?.clone())
}

fn report(
  descriptor: &Descriptor<LuaRecipe>,
  target: &BuildTarget,
  destination: &Path,
  dry_run: Option<&DryRunToolchain>,
  format: OutputFormat,
) -> Result<()> {
  let info = descriptor.recipe().info();
  let plan = descriptor.build_plan();

  if format.is_json() {
    let json_output = serde_json::json!({
      "project": info,
      "phase": descriptor.phase(),
      "shared": descriptor.shared(),
      "layout": descriptor.build_layout(),
      "destination": destination,
      "linkage_names": target.linkage_names(),
      "plan": plan.map(|plan| &plan.id),
      "advisories": descriptor.diagnostics().advisories(),
      "calls": dry_run.map(|toolchain| toolchain.calls()),
    });
    return print_json(&json_output);
  }

  let verb = if dry_run.is_some() { "Planned" } else { "Packaged" };
  print_success(&format!("{} {}/{}", verb, info.name, info.version));
  if let Some(plan) = plan {
    print_stat("Plan", truncate_hash(&plan.id.0));
  }
  if let Some(layout) = descriptor.build_layout() {
    print_stat("Build dir", &layout.build_dir.display().to_string());
  }
  print_stat("Destination", &destination.display().to_string());

  print_heading("Linkage names");
  for name in target.linkage_names() {
    print_item(name);
  }

  Ok(())
}
