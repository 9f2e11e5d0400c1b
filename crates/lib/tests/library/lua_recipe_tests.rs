use recipe_lib::ConfigurationError;
use recipe_lib::DescriptorError;
use recipe_lib::descriptor::{Descriptor, Recipe};
use recipe_lib::lua::LuaRecipe;
use recipe_lib::options::OptionValue;
use recipe_lib::probe::Advisory;
use recipe_lib::settings::SettingAxis;

use super::common::{RecipeFile, linux_settings, native};

#[test]
fn recipe_can_require_sibling_modules() {
  let file = RecipeFile::new(
    r#"local importers = require("importers")
    return {
      name = "viewer", version = "2.1.0",
      configure = function(ctx) ctx.set_options("assimp", importers) end,
      requirements = function(ctx) ctx.requires("assimp/5.4.2") end,
      package_info = function(ctx) ctx.set_libs({ "viewer" }) end,
    }"#,
  );
  std::fs::write(
    file.dir().join("importers.lua"),
    "return { with_obj = true, with_gltf = true, with_fbx = false }",
  )
  .unwrap();

  let settings = linux_settings();
  let mut descriptor = Descriptor::new(file.load(), settings.clone());
  descriptor.configure(&native(&settings)).unwrap();

  let flags: Vec<&str> = descriptor.options().for_dependency("assimp").map(|(flag, _)| flag).collect();
  assert_eq!(flags, vec!["with_fbx", "with_gltf", "with_obj"]);
}

#[test]
fn undeclared_settings_are_hidden_from_hooks() {
  let file = RecipeFile::new(
    r#"return {
      name = "header-only", version = "1.0.0",
      settings = { "os" },
      configure = function(ctx)
        if ctx.settings.arch ~= nil then error("arch should be hidden") end
        if ctx.settings.os ~= "linux" then error("os should be visible") end
      end,
      package_info = function(ctx) ctx.set_libs({ "header-only" }) end,
    }"#,
  );
  let recipe = file.load();
  assert_eq!(recipe.settings(), &[SettingAxis::Os]);

  let settings = linux_settings();
  let mut descriptor = Descriptor::new(recipe, settings.clone());
  descriptor.configure(&native(&settings)).unwrap();
}

#[test]
fn recipe_warnings_become_advisories() {
  let file = RecipeFile::new(
    r#"return {
      name = "consumer", version = "1.0.0",
      configure = function(ctx)
        if not ctx.cross_building() then ctx.warn("native build, benchmarks enabled") end
      end,
      package_info = function(ctx) ctx.set_libs({ "consumer" }) end,
    }"#,
  );
  let settings = linux_settings();
  let mut descriptor = Descriptor::new(file.load(), settings.clone());
  descriptor.configure(&native(&settings)).unwrap();

  assert_eq!(
    descriptor.diagnostics().advisories(),
    &[Advisory::Recipe {
      message: "native build, benchmarks enabled".to_string()
    }]
  );
}

#[test]
fn runtime_error_in_hook_is_configuration_error() {
  let file = RecipeFile::new(
    r#"return {
      name = "consumer", version = "1.0.0",
      requirements = function(ctx) local x = nil; x.field = 1 end,
      package_info = function(ctx) ctx.set_libs({ "consumer" }) end,
    }"#,
  );
  let settings = linux_settings();
  let mut descriptor = Descriptor::new(file.load(), settings.clone());

  let err = descriptor.configure(&native(&settings)).unwrap_err();
  assert!(matches!(
    err,
    DescriptorError::Configuration(ConfigurationError::Recipe { ref hook, .. }) if hook == "requirements"
  ));
}

#[test]
fn inexact_pin_in_recipe_is_configuration_error() {
  let file = RecipeFile::new(
    r#"return {
      name = "consumer", version = "1.0.0",
      requirements = function(ctx) ctx.requires("glm/[>=1.0]") end,
      package_info = function(ctx) ctx.set_libs({ "consumer" }) end,
    }"#,
  );
  let settings = linux_settings();
  let mut descriptor = Descriptor::new(file.load(), settings.clone());

  let err = descriptor.configure(&native(&settings)).unwrap_err();
  assert_eq!(err.kind(), "ConfigurationError");
}

#[test]
fn choice_values_round_trip_through_lua() {
  let file = RecipeFile::new(
    r#"return {
      name = "consumer", version = "1.0.0",
      configure = function(ctx) ctx.set_option("glfw", "backend", "wayland") end,
      requirements = function(ctx) ctx.requires("glfw/3.4") end,
      package_info = function(ctx) ctx.set_libs({ "consumer" }) end,
    }"#,
  );
  let settings = linux_settings();
  let mut descriptor = Descriptor::new(file.load(), settings.clone());
  descriptor.configure(&native(&settings)).unwrap();

  assert_eq!(
    descriptor.options().get("glfw", "backend"),
    Some(&OptionValue::Choice("wayland".to_string()))
  );
}

#[test]
fn missing_file_is_load_error() {
  let err = LuaRecipe::load(std::path::Path::new("/nonexistent/recipe.lua")).unwrap_err();
  assert!(matches!(err, ConfigurationError::RecipeLoad { .. }));
}
