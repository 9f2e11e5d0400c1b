use std::path::Path;

use recipe_lib::descriptor::{Descriptor, Phase};
use recipe_lib::options::{OptionAssignment, OptionValue};
use recipe_lib::platform::arch::Arch;
use recipe_lib::platform::os::Os;
use recipe_lib::probe::Advisory;
use recipe_lib::settings::Compiler;
use recipe_lib::toolchain::{DryRunToolchain, ToolchainCall};
use recipe_lib::{ConfigurationError, DescriptorError};

use super::common::{ENGINE_RECIPE, RecipeFile, cross_from_linux, linux_settings, native};

#[test]
fn engine_recipe_runs_to_finalized() {
  let file = RecipeFile::new(ENGINE_RECIPE);
  let settings = linux_settings();
  let mut descriptor = Descriptor::new(file.load(), settings.clone());
  let mut toolchain = DryRunToolchain::new();

  let target = descriptor
    .run(&native(&settings), &mut toolchain, file.dir(), &file.dir().join("package"))
    .unwrap()
    .clone();

  assert_eq!(target.linkage_names(), ["xar_engine"]);
  assert_eq!(descriptor.phase(), Phase::Finalized);

  let runtime: Vec<&str> = descriptor.requirements().runtime().iter().map(|r| r.name.as_str()).collect();
  let build_only: Vec<&str> = descriptor.requirements().build_only().iter().map(|r| r.name.as_str()).collect();
  assert_eq!(runtime, vec!["assimp", "fmt"]);
  assert_eq!(build_only, vec!["cmake"]);

  assert_eq!(
    descriptor.options().get("assimp", "with_obj"),
    Some(&OptionValue::Bool(true))
  );
  assert_eq!(descriptor.options().len(), 3);
  assert!(descriptor.diagnostics().is_empty());
  assert_eq!(toolchain.calls().len(), 4);
  assert!(matches!(toolchain.calls()[1], ToolchainCall::Configure { options: 3, requirements: 3, .. }));
}

#[test]
fn cross_build_yields_one_advisory_and_no_option_changes() {
  let file = RecipeFile::new(ENGINE_RECIPE);
  let mut target_settings = linux_settings();
  target_settings.os = Os::Android;
  target_settings.arch = Arch::Armv8;
  target_settings.compiler = Compiler::new("clang");

  let mut cross = Descriptor::new(file.load(), target_settings.clone());
  cross.configure(&cross_from_linux(&target_settings)).unwrap();

  let mut local = Descriptor::new(file.load(), linux_settings());
  local.configure(&native(&linux_settings())).unwrap();

  assert_eq!(cross.diagnostics().len(), 1);
  assert!(matches!(cross.diagnostics().advisories()[0], Advisory::CrossBuilding { .. }));
  assert!(cross.environment().unwrap().is_cross_building());
  assert_eq!(cross.options(), local.options());
}

#[test]
fn duplicate_requirement_never_reaches_configured() {
  let file = RecipeFile::new(
    r#"return {
      name = "consumer", version = "1.0.0",
      requirements = function(ctx)
        ctx.requires("libX/5.4.2")
        ctx.requires("libX/5.4.3")
      end,
      package_info = function(ctx) ctx.set_libs({ "consumer" }) end,
    }"#,
  );
  let settings = linux_settings();
  let mut descriptor = Descriptor::new(file.load(), settings.clone());

  let err = descriptor.configure(&native(&settings)).unwrap_err();
  match err {
    DescriptorError::DuplicateRequirement(dup) => {
      assert_eq!(dup.name, "libX");
      assert_eq!(dup.existing, "5.4.2");
      assert_eq!(dup.attempted, "5.4.3");
    }
    other => panic!("unexpected error: {other}"),
  }
  assert_eq!(descriptor.phase(), Phase::Failed);
}

#[test]
fn duplicate_swallowed_by_pcall_still_fails_configure() {
  let file = RecipeFile::new(
    r#"return {
      name = "consumer", version = "1.0.0",
      requirements = function(ctx)
        ctx.requires("libX/5.4.2")
        pcall(ctx.requires, "libX/5.4.3")
      end,
      package_info = function(ctx) ctx.set_libs({ "consumer" }) end,
    }"#,
  );
  let settings = linux_settings();
  let mut descriptor = Descriptor::new(file.load(), settings.clone());

  let err = descriptor.configure(&native(&settings)).unwrap_err();
  assert!(matches!(err, DescriptorError::DuplicateRequirement(_)));
  assert_eq!(descriptor.phase(), Phase::Failed);
}

#[test]
fn option_for_undeclared_dependency_is_rejected() {
  let file = RecipeFile::new(
    r#"return {
      name = "consumer", version = "1.0.0",
      configure = function(ctx) ctx.set_option("gperftools/*", "tcmalloc", true) end,
      requirements = function(ctx) ctx.requires("fmt/11.0.0") end,
      package_info = function(ctx) ctx.set_libs({ "consumer" }) end,
    }"#,
  );
  let settings = linux_settings();
  let mut descriptor = Descriptor::new(file.load(), settings.clone());

  let err = descriptor.configure(&native(&settings)).unwrap_err();
  assert!(matches!(
    err,
    DescriptorError::Configuration(ConfigurationError::UndeclaredDependency { ref dependency, .. })
      if dependency == "gperftools"
  ));
}

#[test]
fn consumer_shared_override_reaches_configure_hook() {
  let file = RecipeFile::new(
    r#"return {
      name = "consumer", version = "1.0.0",
      default_options = { shared = false },
      configure = function(ctx)
        if ctx.shared then ctx.set_option("fmt", "shared", true) end
      end,
      requirements = function(ctx) ctx.requires("fmt/11.0.0") end,
      package_info = function(ctx) ctx.set_libs({ "consumer" }) end,
    }"#,
  );
  let settings = linux_settings();
  let mut descriptor = Descriptor::new(file.load(), settings.clone()).with_shared(true);
  descriptor.configure(&native(&settings)).unwrap();

  assert!(descriptor.shared());
  assert_eq!(descriptor.options().get("fmt", "shared"), Some(&OptionValue::Bool(true)));
}

#[test]
fn overrides_apply_after_recipe_in_order() {
  let file = RecipeFile::new(ENGINE_RECIPE);
  let settings = linux_settings();
  let overrides = vec![
    OptionAssignment::parse("assimp:with_fbx=true").unwrap(),
    OptionAssignment::parse("assimp:with_obj=false").unwrap(),
    OptionAssignment::parse("assimp:with_fbx=false").unwrap(),
  ];
  let mut descriptor = Descriptor::new(file.load(), settings.clone()).with_option_overrides(overrides);
  descriptor.configure(&native(&settings)).unwrap();

  assert_eq!(descriptor.options().get("assimp", "with_obj"), Some(&OptionValue::Bool(false)));
  assert_eq!(descriptor.options().get("assimp", "with_fbx"), Some(&OptionValue::Bool(false)));
}

#[test]
fn package_before_build_is_rejected_without_side_effects() {
  let file = RecipeFile::new(ENGINE_RECIPE);
  let settings = linux_settings();
  let mut descriptor = Descriptor::new(file.load(), settings.clone());
  let mut toolchain = DryRunToolchain::new();

  descriptor.configure(&native(&settings)).unwrap();
  descriptor.layout(&mut toolchain, file.dir()).unwrap();

  let err = descriptor.package(&mut toolchain, Path::new("/pkg")).unwrap_err();
  assert_eq!(err.kind(), "InvalidStateTransitionError");
  assert_eq!(descriptor.phase(), Phase::LaidOut);
  assert_eq!(toolchain.calls().len(), 1);
}
