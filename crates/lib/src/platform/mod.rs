//! Operating systems and CPU architectures a recipe can target.
//!
//! A [`Platform`] is the `arch-os` pair. Host detection reads
//! `std::env::consts`; targets come from settings and may differ.

pub mod arch;
pub mod os;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use arch::Arch;
use os::Os;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
  pub arch: Arch,
  pub os: Os,
}

impl Platform {
  pub fn new(arch: Arch, os: Os) -> Self {
    Self { arch, os }
  }

  /// The machine running this process, if it is one we can build on.
  pub fn current() -> Option<Self> {
    Some(Self::new(Arch::current()?, Os::current()?))
  }

  /// Like [`Platform::current`], failing with the raw OS/arch names.
  pub fn detect() -> Result<Self, ConfigurationError> {
    Self::current().ok_or_else(|| ConfigurationError::UndetectableEnvironment {
      which: "host",
      reason: format!(
        "unsupported platform {}-{}",
        std::env::consts::ARCH,
        std::env::consts::OS
      ),
    })
  }

  /// `arch-os`, e.g. `armv8-android`.
  pub fn triple(&self) -> String {
    format!("{}-{}", self.arch, self.os)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.triple())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn triple_is_arch_then_os() {
    assert_eq!(Platform::new(Arch::Armv8, Os::Android).triple(), "armv8-android");
    assert_eq!(Platform::new(Arch::X86_64, Os::Linux).to_string(), "x86_64-linux");
  }

  #[test]
  #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
  fn detects_linux_host() {
    assert_eq!(Platform::detect().unwrap(), Platform::new(Arch::X86_64, Os::Linux));
  }
}
