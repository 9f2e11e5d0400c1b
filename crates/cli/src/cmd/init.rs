//! Implementation of the `recipe init` command.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use recipe_lib::init::{InitOptions, init};

use crate::output::symbols;

/// Scaffold `recipe.lua`, `.luarc.json` and type definitions in `dir`.
///
/// # Errors
///
/// Returns an error if the files already exist or if there are permission issues.
pub fn cmd_init(dir: &Path, name: Option<String>) -> Result<()> {
  let options = InitOptions {
    dir: dir.to_path_buf(),
    name,
  };

  let result = init(&options).context("Failed to initialize recipe")?;

  println!(
    "{} {}",
    symbols::SUCCESS.green(),
    format!("Initialized recipe for {}", result.name).green().bold()
  );
  println!();
  println!("  {} Recipe:           {}", symbols::INFO.cyan(), result.recipe.display());
  println!("  {} LuaLS config:     {}", symbols::INFO.cyan(), result.luarc_json.display());
  println!("  {} Type definitions: {}", symbols::INFO.cyan(), result.types_dir.display());
  println!();
  println!("{}", "Next steps:".bold());
  println!(
    "  1. Edit {} to declare your requirements",
    result.recipe.display().to_string().cyan()
  );
  println!(
    "  2. Run: {}",
    format!("recipe inspect {}", result.dir.display()).cyan()
  );

  Ok(())
}
