use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ConfigurationError;
use crate::options::OptionValue;
use crate::util::hash::{Hashable, ObjectHash};

/// Declared domain and default of one dependency flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
  pub values: Vec<OptionValue>,
  pub default: OptionValue,
}

impl OptionSpec {
  pub fn allows(&self, value: &OptionValue) -> bool {
    self.values.contains(value)
  }
}

/// What a dependency publishes about itself.
///
/// ```json
/// {
///   "name": "assimp",
///   "version": "5.4.2",
///   "options": { "with_obj": { "values": [true, false], "default": true } },
///   "requires": ["zlib/1.3.1"],
///   "conditional_requires": { "with_draco": ["draco/1.5.6"] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
  pub name: String,
  pub version: String,
  #[serde(default)]
  pub options: BTreeMap<String, OptionSpec>,
  #[serde(default)]
  pub requires: Vec<String>,
  #[serde(default)]
  pub tool_requires: Vec<String>,
  /// Requirements pulled in when the named boolean flag is enabled.
  #[serde(default)]
  pub conditional_requires: BTreeMap<String, Vec<String>>,
}

/// Which side of a cross-build a package is needed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildContext {
  /// Built for the target and linked into the artifact.
  Host,
  /// Runs on the build machine; never linked.
  Build,
}

impl fmt::Display for BuildContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildContext::Host => write!(f, "host"),
      BuildContext::Build => write!(f, "build"),
    }
  }
}

/// One node of the build plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPackage {
  pub name: String,
  pub version: String,
  pub context: BuildContext,
  /// Manifest defaults overlaid with the consumer's overrides.
  pub options: BTreeMap<String, OptionValue>,
  /// Direct dependencies, as `name/version`.
  pub requires: Vec<String>,
}

impl ResolvedPackage {
  pub fn reference(&self) -> String {
    format!("{}/{}", self.name, self.version)
  }
}

#[derive(Serialize)]
pub(crate) struct PlanContent<'a> {
  pub packages: &'a [ResolvedPackage],
}

impl Hashable for PlanContent<'_> {}

/// Every package to build, dependencies first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
  pub id: ObjectHash,
  pub packages: Vec<ResolvedPackage>,
}

impl BuildPlan {
  pub fn get(&self, name: &str, context: BuildContext) -> Option<&ResolvedPackage> {
    self.packages.iter().find(|p| p.name == name && p.context == context)
  }

  pub fn position(&self, name: &str, context: BuildContext) -> Option<usize> {
    self.packages.iter().position(|p| p.name == name && p.context == context)
  }

  pub fn len(&self) -> usize {
    self.packages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.packages.is_empty()
  }
}

#[derive(Debug, Error)]
pub enum ResolveError {
  #[error("failed to read catalog entry {}: {message}", path.display())]
  Catalog { path: PathBuf, message: String },

  #[error("package {name}/{version} not found in catalog (required by {required_by})")]
  MissingPackage {
    name: String,
    version: String,
    required_by: String,
  },

  #[error("version conflict for {name} in {context} context: {existing} vs {requested} (required by {required_by})")]
  VersionConflict {
    name: String,
    context: BuildContext,
    existing: String,
    requested: String,
    required_by: String,
  },

  #[error("{dependency} has no option '{flag}'")]
  UnknownFlag { dependency: String, flag: String },

  #[error("invalid value '{value}' for {dependency}:{flag} (allowed: {allowed})")]
  InvalidValue {
    dependency: String,
    flag: String,
    value: String,
    allowed: String,
  },

  #[error("options set for '{dependency}', which is not part of the dependency graph")]
  UnresolvedOverride { dependency: String },

  #[error("dependency cycle involving {package}")]
  Cycle { package: String },

  #[error(transparent)]
  Reference(#[from] ConfigurationError),

  #[error("failed to hash build plan: {0}")]
  Hash(#[from] serde_json::Error),
}
