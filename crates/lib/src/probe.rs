//! Environment probe.
//!
//! The probe captures the host and target tuples once per invocation and
//! derives whether the build is a cross-build. A cross-build produces exactly
//! one advisory; the probe never changes option values on its own, recipes
//! react to [`EnvironmentSnapshot::is_cross_building`] explicitly.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigurationError;
use crate::platform::arch::Arch;
use crate::platform::os::Os;
use crate::settings::Settings;

/// Platform, architecture and compiler family of one side of a build.
///
/// The compiler version is not part of the tuple: two machines running
/// different releases of the same compiler family are not cross-building.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tuple {
  pub os: Os,
  pub arch: Arch,
  pub compiler: String,
}

impl Tuple {
  pub fn new(os: Os, arch: Arch, compiler: &str) -> Self {
    Self {
      os,
      arch,
      compiler: compiler.to_string(),
    }
  }
}

impl From<&Settings> for Tuple {
  fn from(settings: &Settings) -> Self {
    Tuple::new(settings.os, settings.arch, &settings.compiler.name)
  }
}

impl fmt::Display for Tuple {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}-{}", self.arch, self.os, self.compiler)
  }
}

/// Host and target tuples for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
  pub host: Tuple,
  pub target: Tuple,
}

impl EnvironmentSnapshot {
  pub fn is_cross_building(&self) -> bool {
    self.host != self.target
  }
}

/// Read-only view of the ambient build environment.
pub trait EnvironmentSource {
  fn host(&self) -> Result<Tuple, ConfigurationError>;
  fn target(&self) -> Result<Tuple, ConfigurationError>;
}

/// The machine running the invocation, building for the given settings.
#[derive(Debug, Clone)]
pub struct HostEnvironment {
  target: Settings,
}

impl HostEnvironment {
  pub fn new(target: &Settings) -> Self {
    Self { target: target.clone() }
  }
}

impl EnvironmentSource for HostEnvironment {
  fn host(&self) -> Result<Tuple, ConfigurationError> {
    Settings::detect().map(|settings| Tuple::from(&settings))
  }

  fn target(&self) -> Result<Tuple, ConfigurationError> {
    Ok(Tuple::from(&self.target))
  }
}

/// Fixed tuples, for embedding systems that detect the environment themselves.
///
/// A missing side reports the environment as undetectable.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
  host: Option<Tuple>,
  target: Option<Tuple>,
}

impl StaticEnvironment {
  pub fn new(host: Option<Tuple>, target: Option<Tuple>) -> Self {
    Self { host, target }
  }

  /// Host and target are the same tuple.
  pub fn native(tuple: Tuple) -> Self {
    Self::new(Some(tuple.clone()), Some(tuple))
  }
}

impl EnvironmentSource for StaticEnvironment {
  fn host(&self) -> Result<Tuple, ConfigurationError> {
    self.host.clone().ok_or(ConfigurationError::UndetectableEnvironment {
      which: "host",
      reason: "no host tuple provided".to_string(),
    })
  }

  fn target(&self) -> Result<Tuple, ConfigurationError> {
    self.target.clone().ok_or(ConfigurationError::UndetectableEnvironment {
      which: "target",
      reason: "no target tuple provided".to_string(),
    })
  }
}

/// Non-fatal message surfaced to the invoking user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
  CrossBuilding { host: Tuple, target: Tuple },
  Recipe { message: String },
}

impl fmt::Display for Advisory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Advisory::CrossBuilding { host, target } => {
        write!(f, "Cross-building detected (host {}, target {})", host, target)
      }
      Advisory::Recipe { message } => write!(f, "{}", message),
    }
  }
}

/// Advisories collected during one invocation, in emission order.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
  advisories: Vec<Advisory>,
}

impl Diagnostics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, advisory: Advisory) {
    warn!("{}", advisory);
    self.advisories.push(advisory);
  }

  pub fn advisories(&self) -> &[Advisory] {
    &self.advisories
  }

  pub fn len(&self) -> usize {
    self.advisories.len()
  }

  pub fn is_empty(&self) -> bool {
    self.advisories.is_empty()
  }
}

/// Capture the environment snapshot for this invocation.
///
/// Emits one [`Advisory::CrossBuilding`] when host and target differ.
pub fn detect(source: &dyn EnvironmentSource, diagnostics: &mut Diagnostics) -> Result<EnvironmentSnapshot, ConfigurationError> {
  let snapshot = EnvironmentSnapshot {
    host: source.host()?,
    target: source.target()?,
  };

  debug!(host = %snapshot.host, target = %snapshot.target, "environment detected");

  if snapshot.is_cross_building() {
    diagnostics.push(Advisory::CrossBuilding {
      host: snapshot.host.clone(),
      target: snapshot.target.clone(),
    });
  }

  Ok(snapshot)
}
