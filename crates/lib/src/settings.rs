//! Settings axes a recipe is configured against.
//!
//! The four axes (`os`, `compiler`, `build_type`, `arch`) describe the target
//! the artifact is compiled for. Defaults come from the host; consumers
//! override individual axes with `key=value` pairs.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::COMPILER_ENV;
use crate::error::ConfigurationError;
use crate::platform::Platform;
use crate::platform::arch::Arch;
use crate::platform::os::Os;

/// CMake-style build configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildType {
  Debug,
  #[default]
  Release,
  RelWithDebInfo,
  MinSizeRel,
}

impl BuildType {
  pub fn as_str(&self) -> &'static str {
    match self {
      BuildType::Debug => "Debug",
      BuildType::Release => "Release",
      BuildType::RelWithDebInfo => "RelWithDebInfo",
      BuildType::MinSizeRel => "MinSizeRel",
    }
  }
}

impl fmt::Display for BuildType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for BuildType {
  type Err = ConfigurationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "debug" => Ok(BuildType::Debug),
      "release" => Ok(BuildType::Release),
      "relwithdebinfo" => Ok(BuildType::RelWithDebInfo),
      "minsizerel" => Ok(BuildType::MinSizeRel),
      _ => Err(ConfigurationError::InvalidSetting {
        axis: "build_type".to_string(),
        value: s.to_string(),
      }),
    }
  }
}

/// Compiler family and optional version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Compiler {
  pub name: String,
  pub version: Option<String>,
}

impl Compiler {
  pub fn new(name: &str) -> Self {
    Self {
      name: name.to_string(),
      version: None,
    }
  }

  pub fn with_version(mut self, version: &str) -> Self {
    self.version = Some(version.to_string());
    self
  }

  /// Detect the host compiler from `CC`, falling back to the platform default.
  pub fn detect(os: Os) -> Self {
    match std::env::var(COMPILER_ENV) {
      Ok(cc) if !cc.trim().is_empty() => {
        let compiler = Self::new(&compiler_family(&cc));
        debug!(cc = %cc, compiler = %compiler, "compiler detected from environment");
        compiler
      }
      _ => Self::new(default_compiler(os)),
    }
  }
}

impl fmt::Display for Compiler {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.version {
      Some(version) => write!(f, "{} {}", self.name, version),
      None => write!(f, "{}", self.name),
    }
  }
}

fn default_compiler(os: Os) -> &'static str {
  match os {
    Os::Linux | Os::Android => "gcc",
    Os::MacOs => "apple-clang",
    Os::Windows => "msvc",
  }
}

/// Map a `CC` value (bare name or path) to a compiler family name.
fn compiler_family(cc: &str) -> String {
  let stem = Path::new(cc.trim())
    .file_stem()
    .map(|s| s.to_string_lossy().to_lowercase())
    .unwrap_or_default();

  if stem.contains("clang") {
    "clang".to_string()
  } else if stem == "cl" {
    "msvc".to_string()
  } else if stem == "cc" || stem.contains("gcc") || stem.ends_with("g++") {
    "gcc".to_string()
  } else {
    stem
  }
}

/// One of the settings axes a recipe may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingAxis {
  Os,
  Compiler,
  BuildType,
  Arch,
}

impl SettingAxis {
  pub const ALL: [SettingAxis; 4] = [
    SettingAxis::Os,
    SettingAxis::Compiler,
    SettingAxis::BuildType,
    SettingAxis::Arch,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      SettingAxis::Os => "os",
      SettingAxis::Compiler => "compiler",
      SettingAxis::BuildType => "build_type",
      SettingAxis::Arch => "arch",
    }
  }
}

impl fmt::Display for SettingAxis {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for SettingAxis {
  type Err = ConfigurationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    SettingAxis::ALL
      .into_iter()
      .find(|axis| axis.as_str() == s)
      .ok_or_else(|| ConfigurationError::UnknownSetting(s.to_string()))
  }
}

/// Values for every settings axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
  pub os: Os,
  pub arch: Arch,
  pub compiler: Compiler,
  pub build_type: BuildType,
}

impl Settings {
  pub fn new(os: Os, arch: Arch, compiler: Compiler, build_type: BuildType) -> Self {
    Self {
      os,
      arch,
      compiler,
      build_type,
    }
  }

  /// Settings describing the machine running the build.
  pub fn detect() -> Result<Self, ConfigurationError> {
    let platform = Platform::detect()?;

    Ok(Self::new(
      platform.os,
      platform.arch,
      Compiler::detect(platform.os),
      BuildType::default(),
    ))
  }

  /// Override a single axis from a `key=value` pair.
  ///
  /// Accepted keys: `os`, `arch`, `compiler`, `compiler.version`, `build_type`.
  pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigurationError> {
    match key {
      "os" => self.os = value.parse()?,
      "arch" => self.arch = value.parse()?,
      "compiler" => self.compiler = Compiler::new(value),
      "compiler.version" => self.compiler.version = Some(value.to_string()),
      "build_type" => self.build_type = value.parse()?,
      _ => return Err(ConfigurationError::UnknownSetting(key.to_string())),
    }
    Ok(())
  }

  /// Parse and apply a `key=value` override.
  pub fn apply_override(&mut self, pair: &str) -> Result<(), ConfigurationError> {
    let (key, value) = pair.split_once('=').ok_or_else(|| ConfigurationError::InvalidSetting {
      axis: pair.to_string(),
      value: String::new(),
    })?;
    self.set(key.trim(), value.trim())
  }

  pub fn platform(&self) -> Platform {
    Platform::new(self.arch, self.os)
  }

  /// Display value of a single axis.
  pub fn value(&self, axis: SettingAxis) -> String {
    match axis {
      SettingAxis::Os => self.os.to_string(),
      SettingAxis::Compiler => self.compiler.to_string(),
      SettingAxis::BuildType => self.build_type.to_string(),
      SettingAxis::Arch => self.arch.to_string(),
    }
  }
}
