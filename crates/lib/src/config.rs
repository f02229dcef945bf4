//! Build configuration.
//!
//! Values come from, in increasing priority: built-in defaults, the
//! `FLEX_VERSION` / `FLEX_SOURCE` environment variables, and whatever the
//! caller (usually the CLI) sets on the struct afterwards.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::build::compile::default_jobs;
use crate::consts::{DEFAULT_FLEX_VERSION, DEFAULT_SOURCE_PATH, ENV_FLEX_SOURCE, ENV_FLEX_VERSION, known_tarball_sha256};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfig {
  /// Upstream version, passed through to the toolchain unmodified.
  pub version: String,
  /// Source tree that replaces the pinned checkout.
  pub source_override: Option<PathBuf>,
  /// Directory the pinned checkout path is relative to.
  pub project_root: PathBuf,
  /// Root of the package-data tree the binary is staged into.
  pub package_root: PathBuf,
  /// Scratch space for the install root, downloads and extracted tarballs.
  pub work_dir: PathBuf,
  pub jobs: usize,
  /// Use the upstream release tarball instead of the pinned checkout.
  pub from_release: bool,
  /// Checksum for the release tarball; defaults to the built-in one for known versions.
  pub tarball_sha256: Option<String>,
  /// Compile with `zig cc` for a static musl binary (Linux only).
  pub zig: bool,
}

impl BuildConfig {
  /// Defaults for a project rooted at `project_root`, without reading the environment.
  pub fn new(project_root: impl Into<PathBuf>) -> Self {
    let project_root = project_root.into();
    Self {
      version: DEFAULT_FLEX_VERSION.to_string(),
      source_override: None,
      package_root: project_root.join("build").join("lib"),
      work_dir: project_root.join("build").join("flexpack"),
      project_root,
      jobs: default_jobs(),
      from_release: false,
      tarball_sha256: None,
      zig: false,
    }
  }

  /// Defaults overlaid with `FLEX_VERSION` and `FLEX_SOURCE`.
  ///
  /// Empty variables are treated as unset.
  pub fn from_env(project_root: impl Into<PathBuf>) -> Self {
    let mut config = Self::new(project_root);
    if let Some(version) = non_empty_var(ENV_FLEX_VERSION) {
      config.version = version;
    }
    if let Some(source) = non_empty_var(ENV_FLEX_SOURCE) {
      config.source_override = Some(PathBuf::from(source));
    }
    config
  }

  /// Location of the pinned checkout.
  pub fn default_source(&self) -> PathBuf {
    self.project_root.join(DEFAULT_SOURCE_PATH)
  }

  /// `DESTDIR` for `make install`.
  pub fn stage_dir(&self) -> PathBuf {
    self.work_dir.join("flex-stage")
  }

  pub fn cache_dir(&self) -> PathBuf {
    self.work_dir.join("downloads")
  }

  pub fn source_override(&self) -> Option<&Path> {
    self.source_override.as_deref()
  }

  /// Checksum the release tarball must match, if one is known.
  pub fn expected_sha256(&self) -> Option<String> {
    self
      .tarball_sha256
      .clone()
      .or_else(|| known_tarball_sha256(&self.version).map(str::to_string))
  }
}

fn non_empty_var(key: &str) -> Option<String> {
  std::env::var(key).ok().filter(|v| !v.is_empty())
}
