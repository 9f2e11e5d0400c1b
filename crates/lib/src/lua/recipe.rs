//! [`LuaRecipe`]: a recipe authored as a Lua file.
//!
//! The file returns a table:
//!
//! ```lua
//! return {
//!   name = "xar-engine",
//!   version = "0.0",
//!   author = "someone@example.com",
//!   settings = { "os", "compiler", "build_type", "arch" },
//!   options = { shared = { true, false } },
//!   default_options = { shared = false },
//!
//!   configure = function(ctx) ... end,
//!   requirements = function(ctx) ... end,
//!   build_requirements = function(ctx) ... end,
//!   package_info = function(ctx) ... end,
//! }
//! ```

use std::path::{Path, PathBuf};

use mlua::prelude::*;
use tracing::debug;

use super::ctx::{self, ConfigureState, HookState};
use super::runtime;
use crate::descriptor::{ConfigureCtx, PackageInfo, ProjectInfo, Recipe, RequirementsCtx};
use crate::error::{ConfigurationError, DescriptorError};
use crate::settings::SettingAxis;

const HOOKS: [&str; 4] = ["configure", "requirements", "build_requirements", "package_info"];

pub struct LuaRecipe {
  path: PathBuf,
  lua: Lua,
  table: LuaTable,
  info: ProjectInfo,
  settings: Vec<SettingAxis>,
  default_shared: bool,
}

impl std::fmt::Debug for LuaRecipe {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LuaRecipe")
      .field("path", &self.path)
      .field("info", &self.info)
      .field("settings", &self.settings)
      .field("default_shared", &self.default_shared)
      .finish_non_exhaustive()
  }
}

impl LuaRecipe {
  /// Evaluate a recipe file.
  pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
    let lua = runtime::create_runtime(path.parent()).map_err(|e| load_error(path, e))?;
    let value = runtime::load_file(&lua, path).map_err(|e| load_error(path, e))?;
    Self::from_value(path, lua, value)
  }

  /// Evaluate recipe source that does not live on disk.
  pub fn from_source(name: &str, source: &str) -> Result<Self, ConfigurationError> {
    let path = PathBuf::from(name);
    let lua = runtime::create_runtime(None).map_err(|e| load_error(&path, e))?;
    let value = runtime::load_str(&lua, &format!("={name}"), source).map_err(|e| load_error(&path, e))?;
    Self::from_value(&path, lua, value)
  }

  fn from_value(path: &Path, lua: Lua, value: LuaValue) -> Result<Self, ConfigurationError> {
    let LuaValue::Table(table) = value else {
      return Err(load_message(path, "recipe must return a table"));
    };

    let name = match table.get::<LuaValue>("name").map_err(|e| load_error(path, e))? {
      LuaValue::String(s) if !s.to_string_lossy().trim().is_empty() => s.to_string_lossy().to_string(),
      _ => return Err(load_message(path, "'name' must be a non-empty string")),
    };
    let version = match table.get::<LuaValue>("version").map_err(|e| load_error(path, e))? {
      LuaValue::String(s) => s.to_string_lossy().to_string(),
      LuaValue::Integer(i) => i.to_string(),
      LuaValue::Number(n) => format!("{n:?}"),
      _ => return Err(load_message(path, "'version' must be a string or number")),
    };
    let author: Option<String> = table.get("author").map_err(|e| load_error(path, e))?;

    let mut info = ProjectInfo::new(&name, &version);
    if let Some(author) = author {
      info = info.with_author(&author);
    }

    let settings = match table.get::<Option<Vec<String>>>("settings").map_err(|e| load_error(path, e))? {
      Some(axes) => axes.iter().map(|axis| axis.parse()).collect::<Result<Vec<SettingAxis>, _>>()?,
      None => SettingAxis::ALL.to_vec(),
    };

    if let Some(options) = table.get::<Option<LuaTable>>("options").map_err(|e| load_error(path, e))? {
      for pair in options.pairs::<String, LuaValue>() {
        let (key, _) = pair.map_err(|e| load_error(path, e))?;
        if key != "shared" {
          return Err(ConfigurationError::UnknownOption(key));
        }
      }
    }

    let mut default_shared = false;
    if let Some(defaults) = table
      .get::<Option<LuaTable>>("default_options")
      .map_err(|e| load_error(path, e))?
    {
      for pair in defaults.pairs::<String, LuaValue>() {
        let (key, value) = pair.map_err(|e| load_error(path, e))?;
        match (key.as_str(), value) {
          ("shared", LuaValue::Boolean(shared)) => default_shared = shared,
          ("shared", other) => {
            return Err(ConfigurationError::InvalidOptionValue {
              dependency: name.clone(),
              flag: "shared".to_string(),
              reason: format!("expected boolean, got {}", other.type_name()),
            });
          }
          _ => return Err(ConfigurationError::UnknownOption(key)),
        }
      }
    }

    for hook in HOOKS {
      match table.get::<LuaValue>(hook).map_err(|e| load_error(path, e))? {
        LuaValue::Nil | LuaValue::Function(_) => {}
        other => {
          return Err(load_message(
            path,
            &format!("'{hook}' must be a function, got {}", other.type_name()),
          ));
        }
      }
    }

    debug!(path = %path.display(), project = %info.name, version = %info.version, "recipe loaded");

    Ok(Self {
      path: path.to_path_buf(),
      lua,
      table,
      info,
      settings,
      default_shared,
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn hook(&self, name: &str) -> Result<Option<LuaFunction>, DescriptorError> {
    self.table.get::<Option<LuaFunction>>(name).map_err(|e| hook_error(name, e))
  }

  fn run_requirements(&self, hook: &str, ctx: &mut RequirementsCtx<'_>) -> Result<(), DescriptorError> {
    let Some(func) = self.hook(hook)? else {
      return Ok(());
    };

    let state = HookState::shared(ctx.requirements.clone());
    let table = ctx::settings_table(&self.lua, ctx.settings, &self.settings)
      .and_then(|settings| ctx::requirements_ctx(&self.lua, &state, settings, ctx.cross_building()))
      .map_err(|e| hook_error(hook, e))?;

    *ctx.requirements = ctx::call_hook(hook, &func, table, &state)?;
    Ok(())
  }
}

impl Recipe for LuaRecipe {
  fn info(&self) -> &ProjectInfo {
    &self.info
  }

  fn settings(&self) -> &[SettingAxis] {
    &self.settings
  }

  fn default_shared(&self) -> bool {
    self.default_shared
  }

  fn configure(&self, ctx: &mut ConfigureCtx<'_>) -> Result<(), DescriptorError> {
    let Some(func) = self.hook("configure")? else {
      return Ok(());
    };

    let state = HookState::shared(ConfigureState {
      options: ctx.options.clone(),
      diagnostics: ctx.diagnostics.clone(),
    });
    let table = ctx::settings_table(&self.lua, ctx.settings, &self.settings)
      .and_then(|settings| ctx::configure_ctx(&self.lua, &state, settings, ctx.cross_building(), ctx.shared))
      .map_err(|e| hook_error("configure", e))?;

    let written = ctx::call_hook("configure", &func, table, &state)?;
    *ctx.options = written.options;
    *ctx.diagnostics = written.diagnostics;
    Ok(())
  }

  fn requirements(&self, ctx: &mut RequirementsCtx<'_>) -> Result<(), DescriptorError> {
    self.run_requirements("requirements", ctx)
  }

  fn build_requirements(&self, ctx: &mut RequirementsCtx<'_>) -> Result<(), DescriptorError> {
    self.run_requirements("build_requirements", ctx)
  }

  fn package_info(&self, info: &mut PackageInfo) -> Result<(), DescriptorError> {
    let Some(func) = self.hook("package_info")? else {
      return Ok(());
    };

    let state = HookState::shared(info.clone());
    let table = ctx::package_info_ctx(&self.lua, &state).map_err(|e| hook_error("package_info", e))?;
    *info = ctx::call_hook("package_info", &func, table, &state)?;
    Ok(())
  }
}

fn load_error(path: &Path, err: LuaError) -> ConfigurationError {
  load_message(path, &err.to_string())
}

fn load_message(path: &Path, message: &str) -> ConfigurationError {
  ConfigurationError::RecipeLoad {
    path: path.to_path_buf(),
    message: message.to_string(),
  }
}

fn hook_error(hook: &str, err: LuaError) -> DescriptorError {
  ConfigurationError::Recipe {
    hook: hook.to_string(),
    message: err.to_string(),
  }
  .into()
}
