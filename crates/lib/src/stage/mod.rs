//! Staging the built executable as package data.
//!
//! The packaging tool picks up everything under `<package_root>/gnu_flex/`.
//! The binary goes to `bin/` and a `build-info.json` next to it records the
//! platform it was built for.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::consts::{BUILD_INFO_FILE, PACKAGE_BIN_DIR, PACKAGE_NAME, TOOL_NAME};
use crate::platform::{Os, Platform};
use crate::source::SourceRef;
use crate::util::hash::{ContentHash, hash_file};
use crate::util::remove_dir_if_exists;

/// Errors that can occur while staging the artifact.
#[derive(Debug, Error)]
pub enum StageError {
  #[error("built executable not found at '{0}'")]
  ArtifactMissing(PathBuf),

  #[error("unsupported host platform {os}/{arch}")]
  UnsupportedPlatform { os: String, arch: String },

  #[error("cannot write to '{path}': {source}")]
  NotWritable {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to read built executable '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to serialize build info: {0}")]
  Serialize(#[from] serde_json::Error),
}

impl StageError {
  /// Error for a host whose OS or architecture has no platform tag.
  pub fn unsupported_host() -> Self {
    StageError::UnsupportedPlatform {
      os: std::env::consts::OS.to_string(),
      arch: std::env::consts::ARCH.to_string(),
    }
  }
}

/// Paths inside the package-data tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
  root: PathBuf,
}

impl PackageLayout {
  pub fn new(package_root: impl Into<PathBuf>) -> Self {
    Self {
      root: package_root.into(),
    }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn package_dir(&self) -> PathBuf {
    self.root.join(PACKAGE_NAME)
  }

  pub fn bin_dir(&self) -> PathBuf {
    self.package_dir().join(PACKAGE_BIN_DIR)
  }

  pub fn binary_path(&self, os: Os) -> PathBuf {
    self.bin_dir().join(os.exe_name(TOOL_NAME))
  }

  pub fn build_info_path(&self) -> PathBuf {
    self.package_dir().join(BUILD_INFO_FILE)
  }
}

/// Metadata recorded next to the staged binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
  pub tool: String,
  pub version: String,
  pub platform: Platform,
  pub triple: String,
  pub wheel_tag: String,
  pub sha256: ContentHash,
  pub source: SourceRef,
}

impl BuildInfo {
  /// Read a previously written `build-info.json`.
  pub fn load(path: &Path) -> Result<Self, StageError> {
    let content = fs::read_to_string(path).map_err(|source| StageError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Ok(serde_json::from_str(&content)?)
  }
}

/// Where staging put things.
#[derive(Debug, Clone)]
pub struct StagedArtifact {
  pub binary: PathBuf,
  pub build_info_path: PathBuf,
  pub info: BuildInfo,
}

/// Remove a previously staged package so a failed run leaves nothing to ship.
pub fn clear_package(package_root: &Path) -> Result<(), StageError> {
  let package_dir = PackageLayout::new(package_root).package_dir();
  let removed = remove_dir_if_exists(&package_dir).map_err(|source| StageError::NotWritable {
    path: package_dir.clone(),
    source,
  })?;
  if removed {
    info!(path = %package_dir.display(), "removed previously staged package");
  }
  Ok(())
}

/// Copy the built executable into the package-data tree and tag it.
pub fn stage(
  artifact: &Path,
  package_root: &Path,
  platform: Platform,
  version: &str,
  source: &SourceRef,
) -> Result<StagedArtifact, StageError> {
  if !artifact.is_file() {
    return Err(StageError::ArtifactMissing(artifact.to_path_buf()));
  }

  let layout = PackageLayout::new(package_root);
  let bin_dir = layout.bin_dir();
  fs::create_dir_all(&bin_dir).map_err(|source| StageError::NotWritable {
    path: bin_dir.clone(),
    source,
  })?;

  let binary = layout.binary_path(platform.os);
  fs::copy(artifact, &binary).map_err(|source| StageError::NotWritable {
    path: binary.clone(),
    source,
  })?;
  make_executable(&binary)?;

  let sha256 = hash_file(&binary).map_err(|source| StageError::Read {
    path: binary.clone(),
    source,
  })?;

  let info = BuildInfo {
    tool: TOOL_NAME.to_string(),
    version: version.to_string(),
    platform,
    triple: platform.triple(),
    wheel_tag: platform.wheel_tag().to_string(),
    sha256,
    source: source.clone(),
  };

  let build_info_path = layout.build_info_path();
  let json = serde_json::to_string_pretty(&info)?;
  fs::write(&build_info_path, json).map_err(|source| StageError::NotWritable {
    path: build_info_path.clone(),
    source,
  })?;

  info!(binary = %binary.display(), platform = %platform, "staged flex binary");

  Ok(StagedArtifact {
    binary,
    build_info_path,
    info,
  })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), StageError> {
  use std::os::unix::fs::PermissionsExt;

  fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|source| StageError::NotWritable {
    path: path.to_path_buf(),
    source,
  })
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), StageError> {
  Ok(())
}
