//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated test environment.
///
/// Each test gets its own temporary source directory holding `recipe.lua`.
pub struct TestEnv {
  pub temp: TempDir,
  pub recipe_path: PathBuf,
}

impl TestEnv {
  /// Create from a fixture file.
  ///
  /// Copies the fixture content to a temporary `recipe.lua` file.
  pub fn from_fixture(name: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let recipe_path = temp.path().join("recipe.lua");
    std::fs::write(&recipe_path, fixture_content(name)).unwrap();
    Self { temp, recipe_path }
  }

  /// The bundled package catalog.
  pub fn catalog_path(&self) -> PathBuf {
    fixture_path("catalog")
  }

  /// Get a pre-configured Command for the recipe binary.
  ///
  /// Clears `RECIPE_CATALOG` and `RUST_LOG` so the host environment does
  /// not leak into assertions.
  pub fn recipe_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("recipe");
    cmd.env_remove("RECIPE_CATALOG");
    cmd.env_remove("RUST_LOG");
    cmd.current_dir(self.temp.path());
    cmd
  }

  /// Run a command and parse its stdout as JSON.
  pub fn json(&self, cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
      output.status.success(),
      "command failed: {}",
      String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
  }
}
