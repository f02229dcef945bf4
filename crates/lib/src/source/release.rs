//! Upstream release tarballs.
//!
//! Downloads `flex-<version>.tar.gz` from the upstream GitHub releases into a
//! cache directory and extracts it into the work directory.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::{debug, info, warn};

use super::{Provenance, SourceError, SourceRef, has_build_markers};
use crate::consts::{TOOL_NAME, tarball_name, tarball_url};
use crate::util::hash::{hash_bytes, hash_file};
use crate::util::remove_dir_if_exists;

/// Fetch and extract a release, returning the extracted source tree.
///
/// A cached tarball is reused when it matches `expected_sha256` (or when no
/// checksum is known). The extracted tree replaces any previous extraction of
/// the same version.
pub fn fetch_release(
  version: &str,
  expected_sha256: Option<&str>,
  cache_dir: &Path,
  work_dir: &Path,
) -> Result<SourceRef, SourceError> {
  let tarball = ensure_tarball(version, expected_sha256, cache_dir)?;

  let extract_dir = work_dir.join("src");
  let src_dir = extract_dir.join(format!("{TOOL_NAME}-{version}"));
  if remove_dir_if_exists(&src_dir)? {
    debug!(path = %src_dir.display(), "removed previous extraction");
  }

  extract_tarball(&tarball, &extract_dir)?;

  if !has_build_markers(&src_dir) {
    return Err(SourceError::NotFound { searched: vec![src_dir] });
  }

  let path = dunce::canonicalize(&src_dir).map_err(|source| SourceError::Canonicalize {
    path: src_dir.clone(),
    source,
  })?;

  info!(path = %path.display(), version, "extracted release tarball");
  Ok(SourceRef {
    path,
    provenance: Provenance::Release {
      version: version.to_string(),
    },
  })
}

/// Make sure the tarball for `version` is in `cache_dir`, downloading it if needed.
pub fn ensure_tarball(version: &str, expected_sha256: Option<&str>, cache_dir: &Path) -> Result<PathBuf, SourceError> {
  fs::create_dir_all(cache_dir)?;
  let dest = cache_dir.join(tarball_name(version));
  let url = tarball_url(version);

  if dest.is_file() {
    match expected_sha256 {
      None => {
        info!(path = %dest.display(), "using cached tarball");
        return Ok(dest);
      }
      Some(expected) => {
        let actual = hash_file(&dest)?;
        if actual.matches(expected) {
          info!(path = %dest.display(), "using cached tarball");
          return Ok(dest);
        }
        debug!(expected, actual = %actual, "cached tarball hash mismatch, re-downloading");
      }
    }
  }

  let bytes = download(&url)?;
  verify_sha256(&url, &bytes, expected_sha256)?;

  fs::write(&dest, &bytes)?;
  info!(path = %dest.display(), size = bytes.len(), "download complete");
  Ok(dest)
}

fn download(url: &str) -> Result<Vec<u8>, SourceError> {
  info!(url, "downloading release tarball");

  let fetch_failed = |message: String| SourceError::Fetch {
    url: url.to_string(),
    message,
  };

  let response = reqwest::blocking::get(url).map_err(|e| fetch_failed(e.to_string()))?;
  if !response.status().is_success() {
    return Err(fetch_failed(format!("HTTP {}", response.status())));
  }

  let bytes = response.bytes().map_err(|e| fetch_failed(e.to_string()))?;
  Ok(bytes.to_vec())
}

/// Check downloaded bytes against the expected digest, if there is one.
pub fn verify_sha256(url: &str, bytes: &[u8], expected_sha256: Option<&str>) -> Result<(), SourceError> {
  let Some(expected) = expected_sha256 else {
    warn!(url, "no checksum known, skipping verification");
    return Ok(());
  };

  let actual = hash_bytes(bytes);
  if !actual.matches(expected) {
    return Err(SourceError::HashMismatch {
      url: url.to_string(),
      expected: expected.to_string(),
      actual: actual.0,
    });
  }
  debug!(url, sha256 = %actual, "hash verified");
  Ok(())
}

/// Unpack a `.tar.gz` into `dest`, keeping the archive's top-level directory.
pub fn extract_tarball(tarball: &Path, dest: &Path) -> Result<(), SourceError> {
  let extract_err = |source| SourceError::Extract {
    path: tarball.to_path_buf(),
    source,
  };

  fs::create_dir_all(dest)?;
  let file = File::open(tarball).map_err(extract_err)?;
  let mut archive = Archive::new(GzDecoder::new(BufReader::new(file)));
  archive.set_preserve_permissions(true);
  archive.unpack(dest).map_err(extract_err)?;

  debug!(tarball = %tarball.display(), dest = %dest.display(), "unpacked");
  Ok(())
}
