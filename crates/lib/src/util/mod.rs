//! Shared utilities.
//!
//! Hashing for downloads and staged artifacts, directory cleanup, plus test
//! helpers.

pub mod hash;

#[cfg(test)]
pub mod testutil;

use std::io;
use std::path::Path;

/// Remove `dir` and everything below it. A missing directory is not an error.
///
/// Returns whether anything was removed.
pub fn remove_dir_if_exists(dir: &Path) -> io::Result<bool> {
  match std::fs::remove_dir_all(dir) {
    Ok(()) => Ok(true),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
    Err(e) => Err(e),
  }
}
