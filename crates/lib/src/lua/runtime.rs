use std::path::Path;

use mlua::prelude::*;

/// Create a Lua VM for evaluating one recipe.
///
/// `package.path` is extended with the recipe's directory so recipes can
/// `require` helper modules that sit next to them.
pub fn create_runtime(recipe_dir: Option<&Path>) -> LuaResult<Lua> {
  let lua = Lua::new();

  if let Some(dir) = recipe_dir {
    let package = lua.globals().get::<LuaTable>("package")?;
    let package_path = package.get::<String>("path")?;
    let dir = dir.to_string_lossy();
    package.set("path", format!("{dir}/?.lua;{dir}/?/init.lua;{package_path}"))?;
  }

  Ok(lua)
}

/// Load and execute a Lua file, returning whatever it returns.
pub fn load_file(lua: &Lua, path: &Path) -> LuaResult<LuaValue> {
  let content = std::fs::read_to_string(path)
    .map_err(|e| LuaError::external(format!("cannot read '{}': {}", path.display(), e)))?;

  load_str(lua, &format!("@{}", path.display()), &content)
}

/// Execute Lua source under the given chunk name.
pub fn load_str(lua: &Lua, chunk_name: &str, source: &str) -> LuaResult<LuaValue> {
  lua.load(source).set_name(chunk_name).eval::<LuaValue>()
}
