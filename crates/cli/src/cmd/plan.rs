//! Implementation of the `recipe plan` command.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

use recipe_lib::consts::CATALOG_ENV;
use recipe_lib::probe::HostEnvironment;
use recipe_lib::resolve::BuildContext;

use crate::cmd::{ProfileArgs, load_catalog, load_descriptor};
use crate::output::{OutputFormat, print_heading, print_item, print_json, print_stat, print_success, symbols, truncate_hash};

/// Configure the recipe and resolve its transitive requirements against a catalog.
pub fn cmd_plan(recipe: &Path, catalog: Option<PathBuf>, profile: &ProfileArgs, format: OutputFormat) -> Result<()> {
  let catalog =
    load_catalog(catalog)?.ok_or_else(|| anyhow!("No catalog given: pass --catalog or set {}", CATALOG_ENV))?;

  let mut descriptor = load_descriptor(recipe, profile)?;
  let environment = HostEnvironment::new(descriptor.settings());
  descriptor.configure(&environment)?;

  let plan = descriptor.resolve(&catalog)?;

  if format.is_json() {
    return print_json(plan);
  }

  print_success(&format!("Resolved {} packages", plan.len()));
  print_stat("Plan", truncate_hash(&plan.id.0));

  print_heading("Build order");
  for package in &plan.packages {
    let mut line = package.reference();
    if package.context == BuildContext::Build {
      line.push_str(" (build)");
    }
    if !package.options.is_empty() {
      let options: Vec<String> = package.options.iter().map(|(flag, value)| format!("{flag}={value}")).collect();
      line.push_str(&format!(" [{}]", options.join(", ")));
    }
    if !package.requires.is_empty() {
      line.push_str(&format!(" {} {}", symbols::ARROW, package.requires.join(", ")));
    }
    print_item(&line);
  }

  Ok(())
}
