//! The `ctx` table passed to recipe hooks.
//!
//! Each hook gets a fresh table. Its functions close over a shared
//! [`HookState`] that starts as a copy of the descriptor's state and is
//! written back once the hook returns successfully.
//!
//! ```lua
//! configure = function(ctx)
//!   ctx.set_option("assimp/*", "with_obj", true)
//!   ctx.set_options("assimp", { with_fbx = false, with_gltf = false })
//! end,
//! requirements = function(ctx)
//!   ctx.requires("assimp/5.4.2")
//! end,
//! package_info = function(ctx)
//!   ctx.set_libs({ "xar_engine" })
//! end,
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use mlua::prelude::*;
use thiserror::Error;

use crate::descriptor::PackageInfo;
use crate::error::{ConfigurationError, DescriptorError};
use crate::options::{OptionTable, OptionValue};
use crate::probe::{Advisory, Diagnostics};
use crate::requirements::{RequirementKind, RequirementSet};
use crate::settings::{SettingAxis, Settings};

/// State written by the `ctx` functions of one hook call.
#[derive(Debug, Default)]
pub struct HookState<T> {
  pub data: T,
  error: Option<DescriptorError>,
}

pub type SharedState<T> = Rc<RefCell<HookState<T>>>;

impl<T> HookState<T> {
  pub fn shared(data: T) -> SharedState<T> {
    Rc::new(RefCell::new(HookState { data, error: None }))
  }
}

/// State touched by the `configure` hook.
#[derive(Debug, Default)]
pub struct ConfigureState {
  pub options: OptionTable,
  pub diagnostics: Diagnostics,
}

/// Marks a Lua error as carrying the stashed typed error.
#[derive(Debug, Error)]
#[error("{0}")]
struct Raised(String);

/// Stash a typed error so it survives the trip through Lua.
///
/// Replaces any earlier stash: only the latest raise can be the one a Lua
/// error refers to.
fn raise<T>(state: &SharedState<T>, err: impl Into<DescriptorError>) -> LuaError {
  let err = err.into();
  let message = err.to_string();
  state.borrow_mut().error = Some(err);
  LuaError::external(Raised(message))
}

fn option_value(dependency: &str, flag: &str, value: LuaValue) -> Result<OptionValue, ConfigurationError> {
  match value {
    LuaValue::Boolean(b) => Ok(OptionValue::Bool(b)),
    LuaValue::String(s) => Ok(OptionValue::parse(&s.to_string_lossy())),
    LuaValue::Integer(i) => Ok(OptionValue::Choice(i.to_string())),
    LuaValue::Number(n) => Ok(OptionValue::Choice(n.to_string())),
    other => Err(ConfigurationError::InvalidOptionValue {
      dependency: dependency.to_string(),
      flag: flag.to_string(),
      reason: format!("expected boolean or string, got {}", other.type_name()),
    }),
  }
}

/// Settings visible to the recipe: only the axes it declared.
pub fn settings_table(lua: &Lua, settings: &Settings, axes: &[SettingAxis]) -> LuaResult<LuaTable> {
  let table = lua.create_table()?;
  for axis in axes {
    match axis {
      SettingAxis::Os => table.set("os", settings.os.as_str())?,
      SettingAxis::Arch => table.set("arch", settings.arch.as_str())?,
      SettingAxis::BuildType => table.set("build_type", settings.build_type.as_str())?,
      SettingAxis::Compiler => {
        table.set("compiler", settings.compiler.name.as_str())?;
        table.set("compiler_version", settings.compiler.version.clone())?;
      }
    }
  }
  Ok(table)
}

fn cross_building_fn(lua: &Lua, cross_building: bool) -> LuaResult<LuaFunction> {
  lua.create_function(move |_, ()| Ok(cross_building))
}

/// `ctx` for the `configure` hook.
pub fn configure_ctx(
  lua: &Lua,
  state: &SharedState<ConfigureState>,
  settings: LuaTable,
  cross_building: bool,
  shared: bool,
) -> LuaResult<LuaTable> {
  let ctx = lua.create_table()?;
  ctx.set("settings", settings)?;
  ctx.set("shared", shared)?;
  ctx.set("cross_building", cross_building_fn(lua, cross_building)?)?;

  let st = state.clone();
  let set_option = lua.create_function(move |_, (dependency, flag, value): (String, String, LuaValue)| {
    let value = option_value(&dependency, &flag, value).map_err(|e| raise(&st, e))?;
    st.borrow_mut().data.options.set(&dependency, &flag, value);
    Ok(())
  })?;
  ctx.set("set_option", set_option)?;

  let st = state.clone();
  let set_options = lua.create_function(move |_, (dependency, flags): (String, LuaTable)| {
    // Sorted so the write log does not depend on Lua table iteration order.
    let mut sorted = BTreeMap::new();
    for pair in flags.pairs::<String, LuaValue>() {
      let (flag, value) = pair?;
      let value = option_value(&dependency, &flag, value).map_err(|e| raise(&st, e))?;
      sorted.insert(flag, value);
    }
    let mut state = st.borrow_mut();
    for (flag, value) in sorted {
      state.data.options.set(&dependency, &flag, value);
    }
    Ok(())
  })?;
  ctx.set("set_options", set_options)?;

  let st = state.clone();
  let warn = lua.create_function(move |_, message: String| {
    st.borrow_mut().data.diagnostics.push(Advisory::Recipe { message });
    Ok(())
  })?;
  ctx.set("warn", warn)?;

  Ok(ctx)
}

/// `ctx` for the `requirements` and `build_requirements` hooks.
pub fn requirements_ctx(
  lua: &Lua,
  state: &SharedState<RequirementSet>,
  settings: LuaTable,
  cross_building: bool,
) -> LuaResult<LuaTable> {
  let ctx = lua.create_table()?;
  ctx.set("settings", settings)?;
  ctx.set("cross_building", cross_building_fn(lua, cross_building)?)?;

  for (name, kind) in [
    ("requires", RequirementKind::Runtime),
    ("tool_requires", RequirementKind::BuildOnly),
  ] {
    let st = state.clone();
    let declare = lua.create_function(move |_, reference: String| {
      let result = st.borrow_mut().data.add_reference(&reference, kind).map(|_| ());
      result.map_err(|e| raise(&st, e))
    })?;
    ctx.set(name, declare)?;
  }

  Ok(ctx)
}

/// `ctx` for the `package_info` hook.
pub fn package_info_ctx(lua: &Lua, state: &SharedState<PackageInfo>) -> LuaResult<LuaTable> {
  let ctx = lua.create_table()?;

  let st = state.clone();
  let set_libs = lua.create_function(move |_, libs: Vec<String>| {
    st.borrow_mut().data.set_libs(libs);
    Ok(())
  })?;
  ctx.set("set_libs", set_libs)?;

  Ok(ctx)
}

/// Call `hook` with `ctx` and hand back the state it wrote.
///
/// A typed error raised by a `ctx` function is returned as is, even when the
/// recipe caught it with `pcall` and returned normally. Any other Lua error
/// becomes [`ConfigurationError::Recipe`].
pub fn call_hook<T: Default>(
  hook: &str,
  func: &LuaFunction,
  ctx: LuaTable,
  state: &SharedState<T>,
) -> Result<T, DescriptorError> {
  let result = func.call::<()>(ctx);
  let mut state = state.borrow_mut();
  let raised = state.error.take();

  match result {
    Ok(()) => match raised {
      Some(err) => Err(err),
      None => Ok(std::mem::take(&mut state.data)),
    },
    Err(err) => match raised {
      Some(raised) if err.chain().any(|cause| cause.is::<Raised>()) => Err(raised),
      _ => Err(
        ConfigurationError::Recipe {
          hook: hook.to_string(),
          message: err.to_string(),
        }
        .into(),
      ),
    },
  }
}
