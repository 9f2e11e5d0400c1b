use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Identity of a feature flag: the owning dependency and the flag name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlagRef {
  pub dependency: String,
  pub flag: String,
}

impl FlagRef {
  /// Create a flag reference.
  ///
  /// A dependency written as a pattern over all versions (`"assimp/*"`) is
  /// normalized to its bare name.
  pub fn new(dependency: &str, flag: &str) -> Self {
    Self {
      dependency: normalize_dependency(dependency).to_string(),
      flag: flag.trim().to_string(),
    }
  }

  /// Parse `dependency:flag`.
  pub fn parse(s: &str) -> Result<Self, ConfigurationError> {
    match s.split_once(':') {
      Some((dependency, flag)) if !normalize_dependency(dependency).is_empty() && !flag.trim().is_empty() => {
        Ok(Self::new(dependency, flag))
      }
      _ => Err(ConfigurationError::InvalidOptionValue {
        dependency: String::new(),
        flag: s.to_string(),
        reason: "expected 'dependency:flag'".to_string(),
      }),
    }
  }
}

impl fmt::Display for FlagRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.dependency, self.flag)
  }
}

fn normalize_dependency(dependency: &str) -> &str {
  let dependency = dependency.trim();
  dependency.strip_suffix("/*").unwrap_or(dependency)
}

/// Value of a feature flag: a boolean or one member of a closed enumeration.
///
/// The descriptor does not know the enumeration; the dependency owns it and
/// the resolver checks membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
  Bool(bool),
  Choice(String),
}

impl OptionValue {
  /// Parse a command-line value. `true`/`false` in any case are booleans.
  pub fn parse(s: &str) -> Self {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
      OptionValue::Bool(true)
    } else if s.eq_ignore_ascii_case("false") {
      OptionValue::Bool(false)
    } else {
      OptionValue::Choice(s.to_string())
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      OptionValue::Bool(b) => Some(*b),
      OptionValue::Choice(_) => None,
    }
  }

  /// Representation used in generated cmake files.
  pub fn cmake_value(&self) -> String {
    match self {
      OptionValue::Bool(true) => "ON".to_string(),
      OptionValue::Bool(false) => "OFF".to_string(),
      OptionValue::Choice(choice) => choice.clone(),
    }
  }
}

impl fmt::Display for OptionValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OptionValue::Bool(b) => write!(f, "{}", b),
      OptionValue::Choice(choice) => write!(f, "{}", choice),
    }
  }
}

impl From<bool> for OptionValue {
  fn from(value: bool) -> Self {
    OptionValue::Bool(value)
  }
}

impl From<&str> for OptionValue {
  fn from(value: &str) -> Self {
    OptionValue::Choice(value.to_string())
  }
}

impl From<String> for OptionValue {
  fn from(value: String) -> Self {
    OptionValue::Choice(value)
  }
}
