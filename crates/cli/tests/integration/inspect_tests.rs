//! Inspect command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn inspect_lists_requirements_and_options() {
  let env = TestEnv::from_fixture("engine.lua");

  env
    .recipe_cmd()
    .arg("inspect")
    .arg(&env.recipe_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("Configured xar-engine/0.0"))
    .stdout(predicate::str::contains("assimp/5.4.2 [runtime]"))
    .stdout(predicate::str::contains("cmake/3.25.0 [build-only]"))
    .stdout(predicate::str::contains("assimp:with_fbx=false"));
}

#[test]
fn inspect_defaults_to_recipe_in_current_dir() {
  let env = TestEnv::from_fixture("engine.lua");

  env
    .recipe_cmd()
    .arg("inspect")
    .assert()
    .success()
    .stdout(predicate::str::contains("xar-engine"));
}

#[test]
fn inspect_json_reports_native_build() {
  let env = TestEnv::from_fixture("engine.lua");

  let json = env.json(
    env
      .recipe_cmd()
      .args(["inspect", "--format", "json"])
      .arg(&env.recipe_path),
  );

  assert_eq!(json["phase"], "configured");
  assert_eq!(json["cross_building"], false);
  assert_eq!(json["shared"], false);
  assert_eq!(json["options"]["assimp"]["with_obj"], true);
  assert_eq!(json["requirements"]["runtime"].as_array().unwrap().len(), 2);
  assert!(json["advisories"].as_array().unwrap().is_empty());
}

#[test]
fn cross_build_emits_one_advisory() {
  let env = TestEnv::from_fixture("engine.lua");

  env
    .recipe_cmd()
    .arg("inspect")
    .arg(&env.recipe_path)
    .args(["-s", "os=android", "-s", "arch=armv8"])
    .assert()
    .success()
    .stderr(predicate::str::contains("Cross-building detected").count(1));
}

#[test]
fn cross_build_advisories_appear_in_json() {
  let env = TestEnv::from_fixture("engine.lua");

  let json = env.json(
    env
      .recipe_cmd()
      .args(["inspect", "--format", "json", "-s", "os=android", "-s", "arch=armv8"])
      .arg(&env.recipe_path),
  );

  assert_eq!(json["cross_building"], true);
  let advisories = json["advisories"].as_array().unwrap();
  assert_eq!(advisories.len(), 2);
  assert_eq!(advisories[0]["kind"], "cross_building");
  assert_eq!(advisories[1]["kind"], "recipe");
}

#[test]
fn consumer_options_override_recipe() {
  let env = TestEnv::from_fixture("engine.lua");

  let json = env.json(
    env
      .recipe_cmd()
      .args(["inspect", "--format", "json"])
      .args(["-o", "assimp:with_fbx=true", "-o", "shared=true"])
      .arg(&env.recipe_path),
  );

  assert_eq!(json["options"]["assimp"]["with_fbx"], true);
  assert_eq!(json["shared"], true);
}

#[test]
fn unknown_project_option_fails() {
  let env = TestEnv::from_fixture("engine.lua");

  env
    .recipe_cmd()
    .arg("inspect")
    .arg(&env.recipe_path)
    .args(["-o", "fPIC=true"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("fPIC"));
}

#[test]
fn duplicate_requirement_is_reported_by_kind() {
  let env = TestEnv::from_fixture("duplicate_requirement.lua");

  env
    .recipe_cmd()
    .arg("inspect")
    .arg(&env.recipe_path)
    .assert()
    .failure()
    .stderr(predicate::str::contains("DuplicateRequirementError"))
    .stderr(predicate::str::contains("10.2.1"));
}

#[test]
fn option_for_undeclared_dependency_fails() {
  let env = TestEnv::from_fixture("undeclared_option.lua");

  env
    .recipe_cmd()
    .arg("inspect")
    .arg(&env.recipe_path)
    .assert()
    .failure()
    .stderr(predicate::str::contains("ConfigurationError"))
    .stderr(predicate::str::contains("glfw"));
}
