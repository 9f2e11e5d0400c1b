use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Opaque project identity. Not used by resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
  pub name: String,
  pub version: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub author: Option<String>,
}

impl ProjectInfo {
  pub fn new(name: &str, version: &str) -> Self {
    Self {
      name: name.to_string(),
      version: version.to_string(),
      author: None,
    }
  }

  pub fn with_author(mut self, author: &str) -> Self {
    self.author = Some(author.to_string());
    self
  }
}

/// Lifecycle phase of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
  Uninitialized,
  Configured,
  LaidOut,
  Built,
  Packaged,
  /// Package info emitted; terminal.
  Finalized,
  /// A phase failed; terminal.
  Failed,
}

impl Phase {
  /// The phase a descriptor must be in to enter `self`.
  ///
  /// `None` for phases that cannot be entered by a transition.
  pub fn predecessor(self) -> Option<Phase> {
    match self {
      Phase::Uninitialized | Phase::Failed => None,
      Phase::Configured => Some(Phase::Uninitialized),
      Phase::LaidOut => Some(Phase::Configured),
      Phase::Built => Some(Phase::LaidOut),
      Phase::Packaged => Some(Phase::Built),
      Phase::Finalized => Some(Phase::Packaged),
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Phase::Uninitialized => "uninitialized",
      Phase::Configured => "configured",
      Phase::LaidOut => "laid-out",
      Phase::Built => "built",
      Phase::Packaged => "packaged",
      Phase::Finalized => "finalized",
      Phase::Failed => "failed",
    }
  }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Linkage names collected by the `package_info` hook.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PackageInfo {
  libs: Vec<String>,
}

impl PackageInfo {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replace the linkage names.
  pub fn set_libs<I, S>(&mut self, libs: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.libs = libs.into_iter().map(Into::into).collect();
  }

  pub fn add_lib(&mut self, lib: &str) {
    self.libs.push(lib.to_string());
  }

  pub fn libs(&self) -> &[String] {
    &self.libs
  }
}

/// The produced artifact, identified by its linkage names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTarget {
  linkage_names: Vec<String>,
}

impl BuildTarget {
  /// Requires at least one name; blank names are rejected.
  pub fn new(linkage_names: Vec<String>) -> Result<Self, ConfigurationError> {
    if linkage_names.is_empty() || linkage_names.iter().any(|name| name.trim().is_empty()) {
      return Err(ConfigurationError::EmptyBuildTarget);
    }
    Ok(Self { linkage_names })
  }

  pub fn linkage_names(&self) -> &[String] {
    &self.linkage_names
  }
}

impl TryFrom<PackageInfo> for BuildTarget {
  type Error = ConfigurationError;

  fn try_from(info: PackageInfo) -> Result<Self, Self::Error> {
    BuildTarget::new(info.libs)
  }
}
