//! Create command integration tests.
//!
//! Tests use `--dry-run` or a stub `RECIPE_CMAKE` script so no cmake
//! installation is required.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn dry_run_drives_every_phase() {
  let env = TestEnv::from_fixture("engine.lua");

  let json = env.json(
    env
      .recipe_cmd()
      .args(["create", "--dry-run", "--format", "json"])
      .arg(&env.recipe_path),
  );

  assert_eq!(json["phase"], "finalized");
  assert_eq!(json["linkage_names"], serde_json::json!(["xar_engine"]));

  let steps: Vec<&str> = json["calls"]
    .as_array()
    .unwrap()
    .iter()
    .map(|call| call["step"].as_str().unwrap())
    .collect();
  assert_eq!(steps, ["layout", "configure", "build", "install"]);
}

#[test]
fn dry_run_uses_prefix_as_destination() {
  let env = TestEnv::from_fixture("engine.lua");
  let prefix = env.temp.path().join("dist");

  let json = env.json(
    env
      .recipe_cmd()
      .args(["create", "--dry-run", "--format", "json", "--prefix"])
      .arg(&prefix)
      .arg(&env.recipe_path),
  );

  let install = &json["calls"][3];
  assert_eq!(install["destination"], prefix.to_string_lossy().as_ref());
}

#[test]
fn build_type_setting_selects_build_dir() {
  let env = TestEnv::from_fixture("engine.lua");

  env
    .recipe_cmd()
    .args(["create", "--dry-run", "-s", "build_type=Debug"])
    .arg(&env.recipe_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("Planned xar-engine/0.0"))
    .stdout(predicate::str::contains("Debug"))
    .stdout(predicate::str::contains("xar_engine"));
}

#[test]
fn create_with_catalog_records_plan() {
  let env = TestEnv::from_fixture("engine.lua");

  let json = env.json(
    env
      .recipe_cmd()
      .args(["create", "--dry-run", "--format", "json", "--catalog"])
      .arg(env.catalog_path())
      .arg(&env.recipe_path),
  );

  assert!(json["plan"].is_string());
  assert_eq!(json["phase"], "finalized");
}

#[test]
fn empty_package_info_fails() {
  let env = TestEnv::from_fixture("no_libs.lua");

  env
    .recipe_cmd()
    .args(["create", "--dry-run"])
    .arg(&env.recipe_path)
    .assert()
    .failure()
    .stderr(predicate::str::contains("ConfigurationError"))
    .stderr(predicate::str::contains("linkage names"));
}

#[cfg(unix)]
#[test]
fn catalog_packages_reach_requirements_manifest() {
  use std::os::unix::fs::PermissionsExt;

  let env = TestEnv::from_fixture("engine.lua");
  let cmake = env.temp.path().join("fake-cmake");
  std::fs::write(&cmake, "#!/bin/sh\nexit 0\n").unwrap();
  std::fs::set_permissions(&cmake, std::fs::Permissions::from_mode(0o755)).unwrap();

  env
    .recipe_cmd()
    .env("RECIPE_CMAKE", &cmake)
    .args(["create", "-s", "build_type=Release", "-o", "assimp:with_draco=true", "--catalog"])
    .arg(env.catalog_path())
    .arg(&env.recipe_path)
    .assert()
    .success();

  let manifest = env
    .temp
    .path()
    .join("build")
    .join("Release")
    .join("generators")
    .join("recipe_requirements.json");
  let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(manifest).unwrap()).unwrap();

  let names: Vec<&str> = json["packages"]
    .as_array()
    .unwrap()
    .iter()
    .map(|package| package["name"].as_str().unwrap())
    .collect();
  assert!(names.contains(&"zlib"));
  assert!(names.contains(&"draco"));
  assert!(json["plan"].is_string());

  let assimp = json["packages"]
    .as_array()
    .unwrap()
    .iter()
    .find(|package| package["name"] == "assimp")
    .unwrap();
  assert_eq!(assimp["options"]["with_draco"], true);
  assert_eq!(assimp["options"]["with_fbx"], false);
}
