//! Implementation of the `flexpack fetch` command.

use std::path::Path;

use anyhow::{Context, Result};

use flexpack_lib::consts::{TOOL_NAME, known_tarball_sha256};
use flexpack_lib::source::fetch_release;

use crate::output::{print_stat, print_success};

/// Download the release tarball for `version` into `dest/downloads` and
/// extract it under `dest/src`.
pub fn cmd_fetch(version: &str, sha256: Option<&str>, dest: &Path) -> Result<()> {
  let expected = sha256.or_else(|| known_tarball_sha256(version));

  let source = fetch_release(version, expected, &dest.join("downloads"), dest)
    .with_context(|| format!("Failed to fetch {TOOL_NAME} {version}"))?;

  print_success(&format!("Fetched {TOOL_NAME} {version}"));
  print_stat("Source", &source.path.display().to_string());
  Ok(())
}
