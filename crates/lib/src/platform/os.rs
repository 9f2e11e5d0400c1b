use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Operating systems a recipe can be configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
  Linux,
  MacOs,
  Windows,
  Android,
}

impl Os {
  /// Detect the current operating system at runtime
  ///
  /// Android is only ever a target, never a detected host.
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "macos",
      Self::Windows => "windows",
      Self::Android => "android",
    }
  }

  /// Value of `CMAKE_SYSTEM_NAME` for this OS
  pub fn cmake_system_name(&self) -> &'static str {
    match self {
      Self::Linux => "Linux",
      Self::MacOs => "Darwin",
      Self::Windows => "Windows",
      Self::Android => "Android",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Os {
  type Err = ConfigurationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "linux" => Ok(Self::Linux),
      "macos" | "darwin" => Ok(Self::MacOs),
      "windows" => Ok(Self::Windows),
      "android" => Ok(Self::Android),
      _ => Err(ConfigurationError::InvalidSetting {
        axis: "os".to_string(),
        value: s.to_string(),
      }),
    }
  }
}

/// Returns the current operating system
///
/// Returns `None` if the OS is not supported
pub fn os() -> Option<Os> {
  Os::current()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn current_returns_supported_os() {
    assert!(Os::current().is_some(), "Current OS should be supported");
  }

  #[test]
  fn parse_accepts_darwin_alias() {
    assert_eq!("Darwin".parse::<Os>().unwrap(), Os::MacOs);
    assert_eq!("Linux".parse::<Os>().unwrap(), Os::Linux);
  }

  #[test]
  fn parse_rejects_unknown_os() {
    let err = "beos".parse::<Os>().unwrap_err();
    assert!(err.to_string().contains("beos"));
  }
}
