use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::types::{PackageManifest, ResolveError};

/// Dependency manifests indexed by name and version.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  packages: BTreeMap<(String, String), PackageManifest>,
}

impl Catalog {
  pub fn new() -> Self {
    Self::default()
  }

  /// Load every `*.json` file in `dir`, one manifest per file.
  pub fn load(dir: &Path) -> Result<Self, ResolveError> {
    let catalog_error = |path: &Path, message: String| ResolveError::Catalog {
      path: path.to_path_buf(),
      message,
    };

    let entries = fs::read_dir(dir).map_err(|e| catalog_error(dir, e.to_string()))?;
    let mut paths = Vec::new();
    for entry in entries {
      let path = entry.map_err(|e| catalog_error(dir, e.to_string()))?.path();
      if path.extension().is_some_and(|ext| ext == "json") {
        paths.push(path);
      }
    }
    paths.sort();

    let mut catalog = Self::new();
    for path in paths {
      let content = fs::read_to_string(&path).map_err(|e| catalog_error(&path, e.to_string()))?;
      let manifest: PackageManifest =
        serde_json::from_str(&content).map_err(|e| catalog_error(&path, e.to_string()))?;

      if let Some(previous) = catalog.insert(manifest) {
        warn!(
          package = %format!("{}/{}", previous.name, previous.version),
          path = %path.display(),
          "duplicate catalog entry replaced"
        );
      }
    }

    debug!(dir = %dir.display(), packages = catalog.len(), "catalog loaded");
    Ok(catalog)
  }

  pub fn from_manifests(manifests: impl IntoIterator<Item = PackageManifest>) -> Self {
    let mut catalog = Self::new();
    for manifest in manifests {
      catalog.insert(manifest);
    }
    catalog
  }

  /// Add a manifest, returning the one it replaced.
  pub fn insert(&mut self, manifest: PackageManifest) -> Option<PackageManifest> {
    self
      .packages
      .insert((manifest.name.clone(), manifest.version.clone()), manifest)
  }

  pub fn get(&self, name: &str, version: &str) -> Option<&PackageManifest> {
    self.packages.get(&(name.to_string(), version.to_string()))
  }

  /// Published versions of `name`, in lexical order.
  pub fn versions(&self, name: &str) -> Vec<&str> {
    self
      .packages
      .keys()
      .filter(|(n, _)| n == name)
      .map(|(_, v)| v.as_str())
      .collect()
  }

  pub fn len(&self) -> usize {
    self.packages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.packages.is_empty()
  }
}
