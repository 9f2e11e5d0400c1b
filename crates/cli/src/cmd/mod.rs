mod create;
mod info;
mod init;
mod inspect;
mod plan;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::debug;

use recipe_lib::consts::{CATALOG_ENV, DEFAULT_RECIPE_FILE};
use recipe_lib::descriptor::Descriptor;
use recipe_lib::lua::LuaRecipe;
use recipe_lib::options::{OptionAssignment, OptionValue};
use recipe_lib::resolve::Catalog;
use recipe_lib::settings::Settings;

pub use create::{CreateOptions, cmd_create};
pub use info::cmd_info;
pub use init::cmd_init;
pub use inspect::cmd_inspect;
pub use plan::cmd_plan;

/// Consumer-side settings and option overrides.
#[derive(Debug, Clone, Default, Args)]
pub struct ProfileArgs {
  /// Override a setting, e.g. `-s build_type=Debug` or `-s os=android`
  #[arg(short = 's', long = "setting", value_name = "KEY=VALUE")]
  pub settings: Vec<String>,

  /// Override an option: `-o dep:flag=value`, or `-o shared=true` for the project itself
  #[arg(short = 'o', long = "option", value_name = "DEP:FLAG=VALUE")]
  pub options: Vec<String>,
}

/// Parsed form of [`ProfileArgs`].
#[derive(Debug)]
pub struct Profile {
  pub settings: Settings,
  pub shared: Option<bool>,
  pub overrides: Vec<OptionAssignment>,
}

impl ProfileArgs {
  pub fn resolve(&self) -> Result<Profile> {
    let mut settings = Settings::detect().context("Failed to detect host settings")?;
    for pair in &self.settings {
      settings
        .apply_override(pair)
        .with_context(|| format!("Invalid setting override '{}'", pair))?;
    }

    let mut shared = None;
    let mut overrides = Vec::new();
    for option in &self.options {
      if option.contains(':') {
        overrides.push(OptionAssignment::parse(option).with_context(|| format!("Invalid option '{}'", option))?);
        continue;
      }

      match option.split_once('=') {
        Some(("shared", value)) => match OptionValue::parse(value).as_bool() {
          Some(value) => shared = Some(value),
          None => bail!("Invalid option '{}': shared must be true or false", option),
        },
        _ => bail!("Invalid option '{}': expected 'dep:flag=value' or 'shared=<bool>'", option),
      }
    }

    Ok(Profile {
      settings,
      shared,
      overrides,
    })
  }
}

/// Accept either a recipe file or the directory containing `recipe.lua`.
pub fn recipe_path(path: &Path) -> PathBuf {
  if path.is_dir() {
    path.join(DEFAULT_RECIPE_FILE)
  } else {
    path.to_path_buf()
  }
}

/// Load a recipe and wrap it in a descriptor carrying the consumer's profile.
pub fn load_descriptor(recipe: &Path, profile: &ProfileArgs) -> Result<Descriptor<LuaRecipe>> {
  let path = recipe_path(recipe);
  let profile = profile.resolve()?;

  let recipe = LuaRecipe::load(&path).with_context(|| format!("Failed to load recipe: {}", path.display()))?;
  debug!(path = %path.display(), settings = ?profile.settings, "recipe loaded");

  let mut descriptor = Descriptor::new(recipe, profile.settings).with_option_overrides(profile.overrides);
  if let Some(shared) = profile.shared {
    descriptor = descriptor.with_shared(shared);
  }
  Ok(descriptor)
}

/// Load the catalog from `--catalog` or `RECIPE_CATALOG`.
pub fn load_catalog(catalog: Option<PathBuf>) -> Result<Option<Catalog>> {
  let dir = match catalog {
    Some(dir) => dir,
    None => match std::env::var(CATALOG_ENV) {
      Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
      _ => return Ok(None),
    },
  };

  let catalog = Catalog::load(&dir).with_context(|| format!("Failed to load catalog: {}", dir.display()))?;
  Ok(Some(catalog))
}
