//! Scaffold a new recipe directory.
//!
//! `recipe init` writes:
//! - `recipe.lua` from the template, named after the project
//! - `.luarc.json` for LuaLS IDE integration
//! - `.recipe/types/recipe.d.lua` type definitions

mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::consts::DEFAULT_RECIPE_FILE;

pub use templates::{LUARC_JSON_TEMPLATE, RECIPE_D_LUA, RECIPE_TEMPLATE};

/// Errors that can occur during initialization.
#[derive(Debug, Error)]
pub enum InitError {
  #[error("file already exists: {}", path.display())]
  PathExists { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: std::io::Error },

  #[error("failed to canonicalize path {}: {source}", path.display())]
  Canonicalize { path: PathBuf, source: std::io::Error },

  #[error("cannot derive a project name from {}", path.display())]
  NoProjectName { path: PathBuf },
}

/// Options for scaffolding a recipe directory.
pub struct InitOptions {
  /// Directory to create the recipe in
  pub dir: PathBuf,
  /// Project name; defaults to the directory name
  pub name: Option<String>,
}

/// Result of a successful initialization.
#[derive(Debug)]
pub struct InitResult {
  /// The recipe directory (canonicalized)
  pub dir: PathBuf,
  pub name: String,
  pub recipe: PathBuf,
  pub luarc_json: PathBuf,
  pub types_dir: PathBuf,
}

/// Scaffold a recipe directory.
///
/// # Errors
///
/// Returns an error if:
/// - `recipe.lua` or `.luarc.json` already exist
/// - Directory creation fails
/// - File writing fails
pub fn init(options: &InitOptions) -> Result<InitResult, InitError> {
  fs::create_dir_all(&options.dir).map_err(|e| InitError::CreateDir {
    path: options.dir.clone(),
    source: e,
  })?;

  let dir = options.dir.canonicalize().map_err(|e| InitError::Canonicalize {
    path: options.dir.clone(),
    source: e,
  })?;

  let name = match &options.name {
    Some(name) => name.clone(),
    None => project_name(&dir)?,
  };

  let recipe = dir.join(DEFAULT_RECIPE_FILE);
  let luarc_json = dir.join(".luarc.json");

  for path in [&recipe, &luarc_json] {
    if path.exists() {
      return Err(InitError::PathExists { path: path.clone() });
    }
  }

  let types_dir = dir.join(".recipe").join("types");
  fs::create_dir_all(&types_dir).map_err(|e| InitError::CreateDir {
    path: types_dir.clone(),
    source: e,
  })?;

  write(&recipe, &RECIPE_TEMPLATE.replace("{name}", &name))?;
  write(
    &luarc_json,
    &LUARC_JSON_TEMPLATE.replace("{types_path}", &types_dir.to_string_lossy()),
  )?;
  write(&types_dir.join("recipe.d.lua"), RECIPE_D_LUA)?;

  info!(dir = %dir.display(), project = %name, "recipe scaffolded");

  Ok(InitResult {
    dir,
    name,
    recipe,
    luarc_json,
    types_dir,
  })
}

fn write(path: &Path, content: &str) -> Result<(), InitError> {
  fs::write(path, content).map_err(|e| InitError::WriteFile {
    path: path.to_path_buf(),
    source: e,
  })
}

fn project_name(dir: &Path) -> Result<String, InitError> {
  dir
    .file_name()
    .map(|name| name.to_string_lossy().to_lowercase().replace(' ', "-"))
    .filter(|name| !name.is_empty())
    .ok_or_else(|| InitError::NoProjectName { path: dir.to_path_buf() })
}
