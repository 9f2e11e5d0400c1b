use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// CPU architectures a recipe can be configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
  X86_64,
  Armv8,
  X86,
  Armv7,
}

impl Arch {
  /// Detect the current CPU architecture at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86_64" => Some(Self::X86_64),
      "aarch64" => Some(Self::Armv8),
      "x86" => Some(Self::X86),
      "arm" => Some(Self::Armv7),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::Armv8 => "armv8",
      Self::X86 => "x86",
      Self::Armv7 => "armv7",
    }
  }

  /// Value of `CMAKE_SYSTEM_PROCESSOR` for this architecture
  pub fn cmake_processor(&self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::Armv8 => "aarch64",
      Self::X86 => "i686",
      Self::Armv7 => "armv7-a",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Arch {
  type Err = ConfigurationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "x86_64" | "amd64" => Ok(Self::X86_64),
      "armv8" | "aarch64" | "arm64" => Ok(Self::Armv8),
      "x86" | "i686" => Ok(Self::X86),
      "armv7" | "arm" => Ok(Self::Armv7),
      _ => Err(ConfigurationError::InvalidSetting {
        axis: "arch".to_string(),
        value: s.to_string(),
      }),
    }
  }
}

/// Returns the current CPU architecture
///
/// Returns `None` if the architecture is not supported
pub fn arch() -> Option<Arch> {
  Arch::current()
}
