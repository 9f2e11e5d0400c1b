//! Shared helpers for library integration tests.

use std::path::{Path, PathBuf};

use recipe_lib::lua::LuaRecipe;
use recipe_lib::platform::arch::Arch;
use recipe_lib::platform::os::Os;
use recipe_lib::probe::{StaticEnvironment, Tuple};
use recipe_lib::settings::{BuildType, Compiler, Settings};
use tempfile::TempDir;

pub fn linux_settings() -> Settings {
  Settings::new(Os::Linux, Arch::X86_64, Compiler::new("gcc"), BuildType::Release)
}

/// Host and target both match `settings`.
pub fn native(settings: &Settings) -> StaticEnvironment {
  StaticEnvironment::native(Tuple::from(settings))
}

/// x86_64 Linux host building for `settings`.
pub fn cross_from_linux(settings: &Settings) -> StaticEnvironment {
  StaticEnvironment::new(
    Some(Tuple::new(Os::Linux, Arch::X86_64, "gcc")),
    Some(Tuple::from(settings)),
  )
}

/// A recipe written to a temporary `recipe.lua`.
pub struct RecipeFile {
  pub temp: TempDir,
  pub path: PathBuf,
}

impl RecipeFile {
  pub fn new(source: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("recipe.lua");
    std::fs::write(&path, source).unwrap();
    Self { temp, path }
  }

  pub fn load(&self) -> LuaRecipe {
    LuaRecipe::load(&self.path).unwrap()
  }

  pub fn dir(&self) -> &Path {
    self.temp.path()
  }
}

/// The engine recipe most tests start from.
pub const ENGINE_RECIPE: &str = r#"
return {
  name = "xar-engine",
  version = 0.0,
  author = "dev@example.com",
  settings = { "os", "compiler", "build_type", "arch" },
  options = { shared = { true, false } },
  default_options = { shared = false },

  configure = function(ctx)
    ctx.set_options("assimp/*", { with_obj = true, with_fbx = false })
    ctx.set_option("assimp/*", "double_precision", false)
  end,

  requirements = function(ctx)
    ctx.requires("assimp/5.4.2")
    ctx.requires("fmt/11.0.0")
  end,

  build_requirements = function(ctx)
    ctx.tool_requires("cmake/3.25.0")
  end,

  package_info = function(ctx)
    ctx.set_libs({ "xar_engine" })
  end,
}
"#;
