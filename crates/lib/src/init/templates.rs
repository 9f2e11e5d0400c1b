//! Template content for `recipe init`.

/// Recipe scaffold. `{name}` is replaced with the project name.
pub const RECIPE_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../lua/template.lua"));

/// LuaLS type definitions for the recipe table and hook contexts.
pub const RECIPE_D_LUA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../lua/recipe.d.lua"));

/// Template for .luarc.json (LuaLS configuration)
/// Contains {types_path} placeholder for substitution
pub const LUARC_JSON_TEMPLATE: &str = r#"{
  "$schema": "https://raw.githubusercontent.com/LuaLS/vscode-lua/master/setting/schema.json",
  "runtime": {
    "version": "Lua 5.4"
  },
  "workspace": {
    "library": [
      "{types_path}"
    ],
    "checkThirdParty": false
  },
  "completion": {
    "callSnippet": "Both",
    "keywordSnippet": "Both"
  }
}
"#;
