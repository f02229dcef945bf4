//! Wheel compatibility tags.
//!
//! The staged binary is native code, so the wheel it ends up in must be tagged
//! with the platforms it runs on while staying independent of the Python
//! interpreter (`py3-none-<platform>`).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Platform;
use super::arch::Arch;
use super::os::Os;

pub const PYTHON_TAG: &str = "py3";
pub const ABI_TAG: &str = "none";

/// A `python-abi-platform` wheel tag, with a compressed platform tag set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelTag {
  pub python: String,
  pub abi: String,
  pub platforms: Vec<String>,
}

impl WheelTag {
  /// Build the tag for a platform.
  pub fn for_platform(platform: Platform) -> Self {
    Self {
      python: PYTHON_TAG.to_string(),
      abi: ABI_TAG.to_string(),
      platforms: platform_tags(platform),
    }
  }

  /// Platform part of the tag, e.g. `manylinux_2_17_aarch64.manylinux2014_aarch64`.
  pub fn platform_part(&self) -> String {
    self.platforms.join(".")
  }
}

impl fmt::Display for WheelTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}-{}", self.python, self.abi, self.platform_part())
  }
}

/// Platform tags an installer accepts for a binary built on `platform`.
///
/// Linux tags mirror the glibc baselines the upstream build links against:
/// 32/64-bit x86 can claim the oldest manylinux baseline, other architectures
/// start at manylinux2014.
pub fn platform_tags(platform: Platform) -> Vec<String> {
  let arch = platform.arch;
  match platform.os {
    Os::Linux => {
      let templates: &[&str] = match arch {
        Arch::X86_64 | Arch::I686 => &["manylinux_2_5", "manylinux1", "musllinux_1_1"],
        Arch::Aarch64 | Arch::S390x | Arch::Ppc64le => &["manylinux_2_17", "manylinux2014", "musllinux_1_1"],
      };
      templates.iter().map(|base| format!("{base}_{arch}")).collect()
    }
    Os::MacOs => {
      let tag = match arch {
        Arch::Aarch64 => "macosx_11_0_arm64",
        _ => "macosx_10_9_x86_64",
      };
      vec![tag.to_string()]
    }
    Os::Windows => {
      let tag = match arch {
        Arch::Aarch64 => "win_arm64",
        Arch::I686 => "win32",
        _ => "win_amd64",
      };
      vec![tag.to_string()]
    }
  }
}
