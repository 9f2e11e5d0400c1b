//! Plan command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn plan_orders_dependencies_first() {
  let env = TestEnv::from_fixture("engine.lua");

  let json = env.json(
    env
      .recipe_cmd()
      .args(["plan", "--format", "json", "--catalog"])
      .arg(env.catalog_path())
      .arg(&env.recipe_path),
  );

  let packages = json["packages"].as_array().unwrap();
  let names: Vec<&str> = packages.iter().map(|p| p["name"].as_str().unwrap()).collect();
  assert_eq!(packages.len(), 4);

  let zlib = names.iter().position(|n| *n == "zlib").unwrap();
  let assimp = names.iter().position(|n| *n == "assimp").unwrap();
  assert!(zlib < assimp);

  let cmake = packages.iter().find(|p| p["name"] == "cmake").unwrap();
  assert_eq!(cmake["context"], "build");
  assert_eq!(json["id"].as_str().unwrap().len(), 20);
}

#[test]
fn plan_reads_catalog_from_env() {
  let env = TestEnv::from_fixture("engine.lua");

  env
    .recipe_cmd()
    .env("RECIPE_CATALOG", env.catalog_path())
    .arg("plan")
    .arg(&env.recipe_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("Resolved 4 packages"))
    .stdout(predicate::str::contains("cmake/3.25.0 (build)"));
}

#[test]
fn plan_id_is_stable() {
  let env = TestEnv::from_fixture("engine.lua");
  let plan = || {
    env.json(
      env
        .recipe_cmd()
        .args(["plan", "--format", "json", "--catalog"])
        .arg(env.catalog_path())
        .arg(&env.recipe_path),
    )
  };

  assert_eq!(plan()["id"], plan()["id"]);
}

#[test]
fn enabling_conditional_flag_pulls_dependency() {
  let env = TestEnv::from_fixture("engine.lua");

  env
    .recipe_cmd()
    .args(["plan", "-o", "assimp:with_draco=true", "--catalog"])
    .arg(env.catalog_path())
    .arg(&env.recipe_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("draco/1.5.6"));
}

#[test]
fn invalid_flag_value_fails_resolution() {
  let env = TestEnv::from_fixture("engine.lua");

  env
    .recipe_cmd()
    .args(["plan", "-o", "assimp:with_obj=maybe", "--catalog"])
    .arg(env.catalog_path())
    .arg(&env.recipe_path)
    .assert()
    .failure()
    .stderr(predicate::str::contains("ResolutionError"))
    .stderr(predicate::str::contains("maybe"));
}
