use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize, Serializer};
use tracing::trace;

use super::{FlagRef, OptionValue};
use crate::error::ConfigurationError;
use crate::requirements::RequirementSet;

/// One `set` call, as authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionAssignment {
  pub flag: FlagRef,
  pub value: OptionValue,
}

impl OptionAssignment {
  pub fn new(dependency: &str, flag: &str, value: impl Into<OptionValue>) -> Self {
    Self {
      flag: FlagRef::new(dependency, flag),
      value: value.into(),
    }
  }

  /// Parse `dependency:flag=value`.
  pub fn parse(s: &str) -> Result<Self, ConfigurationError> {
    let (key, value) = s.split_once('=').ok_or_else(|| ConfigurationError::InvalidOptionValue {
      dependency: String::new(),
      flag: s.to_string(),
      reason: "expected 'dependency:flag=value'".to_string(),
    })?;

    Ok(Self {
      flag: FlagRef::parse(key)?,
      value: OptionValue::parse(value),
    })
  }
}

/// Feature flag overrides owned by one descriptor invocation.
///
/// Keeps the final value per flag plus the ordered log of writes that
/// produced it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OptionTable {
  values: BTreeMap<FlagRef, OptionValue>,
  writes: Vec<OptionAssignment>,
}

impl OptionTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Set a flag, replacing any earlier value. Returns the replaced value.
  pub fn set(&mut self, dependency: &str, flag: &str, value: impl Into<OptionValue>) -> Option<OptionValue> {
    self.apply(OptionAssignment::new(dependency, flag, value))
  }

  /// Record an assignment, replacing any earlier value for the same flag.
  pub fn apply(&mut self, assignment: OptionAssignment) -> Option<OptionValue> {
    trace!(flag = %assignment.flag, value = %assignment.value, "option set");
    let previous = self.values.insert(assignment.flag.clone(), assignment.value.clone());
    self.writes.push(assignment);
    previous
  }

  pub fn get(&self, dependency: &str, flag: &str) -> Option<&OptionValue> {
    self.values.get(&FlagRef::new(dependency, flag))
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Final values, ordered by dependency then flag.
  pub fn iter(&self) -> impl Iterator<Item = (&FlagRef, &OptionValue)> {
    self.values.iter()
  }

  /// Final values for one dependency, ordered by flag.
  pub fn for_dependency<'a>(&'a self, dependency: &'a str) -> impl Iterator<Item = (&'a str, &'a OptionValue)> {
    self
      .values
      .iter()
      .filter(move |(key, _)| key.dependency == dependency)
      .map(|(key, value)| (key.flag.as_str(), value))
  }

  /// Dependencies that have at least one override.
  pub fn dependencies(&self) -> BTreeSet<&str> {
    self.values.keys().map(|key| key.dependency.as_str()).collect()
  }

  /// Every write in call order, including overwritten ones.
  pub fn writes(&self) -> &[OptionAssignment] {
    &self.writes
  }

  /// Nested `dependency -> flag -> value` view.
  pub fn by_dependency(&self) -> BTreeMap<&str, BTreeMap<&str, &OptionValue>> {
    let mut nested: BTreeMap<&str, BTreeMap<&str, &OptionValue>> = BTreeMap::new();
    for (key, value) in &self.values {
      nested
        .entry(key.dependency.as_str())
        .or_default()
        .insert(key.flag.as_str(), value);
    }
    nested
  }

  /// Check that every write targets a declared requirement.
  ///
  /// Reports the first offending write in call order.
  pub fn validate_dependencies(&self, requirements: &RequirementSet) -> Result<(), ConfigurationError> {
    match self
      .writes
      .iter()
      .find(|write| !requirements.contains(&write.flag.dependency))
    {
      Some(write) => Err(ConfigurationError::UndeclaredDependency {
        dependency: write.flag.dependency.clone(),
        flag: write.flag.flag.clone(),
      }),
      None => Ok(()),
    }
  }
}

impl Serialize for OptionTable {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.by_dependency().serialize(serializer)
  }
}
