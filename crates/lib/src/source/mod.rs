//! Locating the flex source tree.
//!
//! A build uses exactly one source tree. An explicit override (`FLEX_SOURCE`)
//! always wins; without one the pinned checkout is used, or the upstream
//! release tarball when the caller asked for it.

pub mod release;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub use release::fetch_release;

/// Files whose presence marks a directory as an autotools source tree.
pub const BUILD_MARKERS: &[&str] = &["configure", "configure.ac", "configure.in", "autogen.sh"];

/// Errors that can occur while locating or fetching sources.
#[derive(Debug, Error)]
pub enum SourceError {
  /// None of the candidate directories holds a recognizable source tree.
  #[error(
    "flex source not found in {}; initialize the pinned checkout or set FLEX_SOURCE",
    display_paths(.searched)
  )]
  NotFound { searched: Vec<PathBuf> },

  #[error("failed to resolve source path '{path}': {source}")]
  Canonicalize {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("download failed for {url}: {message}")]
  Fetch { url: String, message: String },

  #[error("hash mismatch for {url}: expected {expected}, got {actual}")]
  HashMismatch {
    url: String,
    expected: String,
    actual: String,
  },

  #[error("failed to extract '{path}': {source}")]
  Extract {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
  paths
    .iter()
    .map(|p| format!("'{}'", p.display()))
    .collect::<Vec<_>>()
    .join(", ")
}

/// Where a source tree came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
  /// The checkout pinned in the repository.
  Pinned { version: String },
  /// A path supplied through `FLEX_SOURCE` or `--source`.
  Override,
  /// An upstream release tarball extracted into the work directory.
  Release { version: String },
}

impl fmt::Display for Provenance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Provenance::Pinned { version } => write!(f, "pinned checkout ({version})"),
      Provenance::Override => write!(f, "override"),
      Provenance::Release { version } => write!(f, "release tarball ({version})"),
    }
  }
}

/// A validated source tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
  pub path: PathBuf,
  pub provenance: Provenance,
}

/// Returns true if `dir` contains any of [`BUILD_MARKERS`].
pub fn has_build_markers(dir: &Path) -> bool {
  dir.is_dir() && BUILD_MARKERS.iter().any(|marker| dir.join(marker).is_file())
}

/// Pick the source tree for this build.
///
/// When `override_path` is given it is the only candidate; a missing or
/// unrecognizable override is an error rather than a silent fallback to the
/// pinned checkout.
pub fn resolve_source(
  override_path: Option<&Path>,
  default_path: &Path,
  version: &str,
) -> Result<SourceRef, SourceError> {
  let (candidate, provenance) = match override_path {
    Some(path) => (path, Provenance::Override),
    None => (
      default_path,
      Provenance::Pinned {
        version: version.to_string(),
      },
    ),
  };

  debug!(path = %candidate.display(), %provenance, "checking source candidate");

  if !has_build_markers(candidate) {
    return Err(SourceError::NotFound {
      searched: vec![candidate.to_path_buf()],
    });
  }

  let path = dunce::canonicalize(candidate).map_err(|source| SourceError::Canonicalize {
    path: candidate.to_path_buf(),
    source,
  })?;

  info!(path = %path.display(), %provenance, "resolved flex source");
  Ok(SourceRef { path, provenance })
}
