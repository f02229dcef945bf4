use std::fmt;

use serde::{Deserialize, Serialize};

/// CPU architectures flex is packaged for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
  X86_64,
  Aarch64,
  I686,
  S390x,
  Ppc64le,
}

impl Arch {
  /// Detect the current CPU architecture at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86" => Some(Self::I686),
      "powerpc64" if cfg!(target_endian = "little") => Some(Self::Ppc64le),
      "powerpc64" => None,
      other => Self::from_machine(other),
    }
  }

  /// Parse a `uname -m` style machine name.
  ///
  /// Case-insensitive; dashes are treated as underscores so `x86-64` matches.
  pub fn from_machine(machine: &str) -> Option<Self> {
    let normalized = machine.trim().to_lowercase().replace('-', "_");
    match normalized.as_str() {
      "x86_64" | "amd64" => Some(Self::X86_64),
      "aarch64" | "arm64" => Some(Self::Aarch64),
      "i386" | "i486" | "i586" | "i686" | "x86" => Some(Self::I686),
      "s390x" => Some(Self::S390x),
      "ppc64le" => Some(Self::Ppc64le),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::Aarch64 => "aarch64",
      Self::I686 => "i686",
      Self::S390x => "s390x",
      Self::Ppc64le => "ppc64le",
    }
  }

  /// Zig target for a static musl build on this architecture.
  pub fn musl_target(&self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64-linux-musl",
      Self::Aarch64 => "aarch64-linux-musl",
      Self::I686 => "x86-linux-musl",
      Self::S390x => "s390x-linux-musl",
      Self::Ppc64le => "powerpc64le-linux-musl",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
