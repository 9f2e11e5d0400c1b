use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigurationError, DescriptorError, DuplicateRequirementError};

/// Characters that only appear in version ranges, never in exact pins.
const RANGE_CHARS: &[char] = &['^', '~', '<', '>', '=', '*', ',', '|', '[', ']', '(', ')'];

/// How a requirement participates in the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
  /// Linked into the final artifact.
  Runtime,
  /// Needed only while building; never linked.
  BuildOnly,
}

impl RequirementKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      RequirementKind::Runtime => "runtime",
      RequirementKind::BuildOnly => "build-only",
    }
  }
}

impl fmt::Display for RequirementKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// A `name/version` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Reference {
  pub name: String,
  pub version: String,
}

impl Reference {
  pub fn new(name: &str, version: &str) -> Result<Self, ConfigurationError> {
    validate_name(name)?;
    validate_pin(name, version)?;
    Ok(Self {
      name: name.to_string(),
      version: version.to_string(),
    })
  }

  /// Parse `name/version`.
  pub fn parse(s: &str) -> Result<Self, ConfigurationError> {
    match s.trim().split_once('/') {
      Some((name, version)) if !version.contains('/') => Self::new(name, version),
      _ => Err(ConfigurationError::MalformedReference(s.to_string())),
    }
  }
}

impl fmt::Display for Reference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.name, self.version)
  }
}

fn validate_name(name: &str) -> Result<(), ConfigurationError> {
  if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c == '/' || c == ':') {
    return Err(ConfigurationError::MalformedReference(name.to_string()));
  }
  Ok(())
}

/// Check that `version` is an exact pin rather than a range.
pub fn validate_pin(name: &str, version: &str) -> Result<(), ConfigurationError> {
  let inexact = version.is_empty()
    || version.chars().any(|c| c.is_whitespace() || RANGE_CHARS.contains(&c))
    || version.split('.').any(|part| part.is_empty() || part.eq_ignore_ascii_case("x"));

  if inexact {
    return Err(ConfigurationError::InexactPin {
      name: name.to_string(),
      version: version.to_string(),
    });
  }
  Ok(())
}

/// A pinned dependency of the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
  pub name: String,
  pub version: String,
  pub kind: RequirementKind,
}

impl Requirement {
  pub fn new(name: &str, version: &str, kind: RequirementKind) -> Result<Self, ConfigurationError> {
    let reference = Reference::new(name, version)?;
    Ok(Self {
      name: reference.name,
      version: reference.version,
      kind,
    })
  }

  pub fn reference(&self) -> Reference {
    Reference {
      name: self.name.clone(),
      version: self.version.clone(),
    }
  }
}

impl fmt::Display for Requirement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{} ({})", self.name, self.version, self.kind)
  }
}

/// Runtime and build-only requirements, each in declaration order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementSet {
  runtime: Vec<Requirement>,
  build_only: Vec<Requirement>,
}

impl RequirementSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Declare a requirement.
  ///
  /// # Errors
  ///
  /// - [`DescriptorError::Configuration`] if the name is malformed or the
  ///   version is not an exact pin
  /// - [`DescriptorError::DuplicateRequirement`] if the name is already
  ///   declared under the same kind, whatever its version
  pub fn add(&mut self, name: &str, version: &str, kind: RequirementKind) -> Result<&Requirement, DescriptorError> {
    let requirement = Requirement::new(name, version, kind)?;

    if let Some(existing) = self.get(name, kind) {
      return Err(
        DuplicateRequirementError {
          name: name.to_string(),
          kind,
          existing: existing.version.clone(),
          attempted: version.to_string(),
        }
        .into(),
      );
    }

    debug!(requirement = %requirement, "requirement declared");

    let list = self.list_mut(kind);
    list.push(requirement);
    Ok(&list[list.len() - 1])
  }

  /// Declare a requirement from a `name/version` reference.
  pub fn add_reference(&mut self, reference: &str, kind: RequirementKind) -> Result<&Requirement, DescriptorError> {
    let reference = Reference::parse(reference)?;
    self.add(&reference.name, &reference.version, kind)
  }

  pub fn get(&self, name: &str, kind: RequirementKind) -> Option<&Requirement> {
    self.list(kind).iter().find(|r| r.name == name)
  }

  /// Whether `name` is declared under any kind.
  pub fn contains(&self, name: &str) -> bool {
    self.iter().any(|r| r.name == name)
  }

  pub fn runtime(&self) -> &[Requirement] {
    &self.runtime
  }

  pub fn build_only(&self) -> &[Requirement] {
    &self.build_only
  }

  /// All requirements: runtime first, then build-only.
  pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
    self.runtime.iter().chain(self.build_only.iter())
  }

  pub fn len(&self) -> usize {
    self.runtime.len() + self.build_only.len()
  }

  pub fn is_empty(&self) -> bool {
    self.runtime.is_empty() && self.build_only.is_empty()
  }

  fn list(&self, kind: RequirementKind) -> &Vec<Requirement> {
    match kind {
      RequirementKind::Runtime => &self.runtime,
      RequirementKind::BuildOnly => &self.build_only,
    }
  }

  fn list_mut(&mut self, kind: RequirementKind) -> &mut Vec<Requirement> {
    match kind {
      RequirementKind::Runtime => &mut self.runtime,
      RequirementKind::BuildOnly => &mut self.build_only,
    }
  }
}
