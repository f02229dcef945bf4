//! Generating `configure` for source trees that lack it.
//!
//! Release tarballs ship a generated `configure`; git checkouts only have
//! `configure.ac` and need `autogen.sh` (autoreconf + libtoolize) first.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::execute::env::LIBTOOLIZE_CANDIDATES;
use crate::execute::{BuildEnv, CommandRunner, Invocation, exit_status};

pub const CONFIGURE_SCRIPT: &str = "configure";
pub const BOOTSTRAP_SCRIPT: &str = "autogen.sh";

/// Errors that can occur while generating the configure script.
#[derive(Debug, Error)]
pub enum BootstrapError {
  #[error(
    "configure script missing and autogen.sh not found in '{0}'; use a release tarball or set FLEX_SOURCE to a tree with generated build files"
  )]
  NoBootstrapScript(PathBuf),

  #[error("autogen.sh requires libtoolize or glibtoolize; install libtool to generate configure")]
  LibtoolMissing,

  #[error("failed to run `{cmd}`: {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: std::io::Error,
  },

  #[error("`{cmd}` failed with {}:\n{stderr}", exit_status(.code))]
  Failed {
    cmd: String,
    code: Option<i32>,
    stderr: String,
  },

  #[error("configure script still missing after running autogen.sh in '{0}'")]
  StillUnconfigured(PathBuf),
}

/// What [`ensure_configured`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigureState {
  /// `configure` was already present; nothing ran.
  AlreadyConfigured,
  /// `autogen.sh` ran and produced `configure`.
  Bootstrapped,
}

/// Make sure `source_dir` has a `configure` script, running `autogen.sh` once if not.
pub fn ensure_configured(
  source_dir: &Path,
  env: &BuildEnv,
  runner: &impl CommandRunner,
) -> Result<ConfigureState, BootstrapError> {
  let configure = source_dir.join(CONFIGURE_SCRIPT);
  if configure.is_file() {
    debug!(path = %configure.display(), "configure script present");
    return Ok(ConfigureState::AlreadyConfigured);
  }

  let autogen = source_dir.join(BOOTSTRAP_SCRIPT);
  if !autogen.is_file() {
    return Err(BootstrapError::NoBootstrapScript(source_dir.to_path_buf()));
  }

  if env.libtoolize().is_none() && env.find_program(LIBTOOLIZE_CANDIDATES).is_none() {
    return Err(BootstrapError::LibtoolMissing);
  }

  info!(dir = %source_dir.display(), "running autogen.sh to generate configure");

  let invocation = Invocation::new("sh", source_dir).arg(autogen.to_string_lossy());
  let output = runner.run(&invocation, env).map_err(|source| BootstrapError::Spawn {
    cmd: invocation.to_string(),
    source,
  })?;

  if !output.success() {
    return Err(BootstrapError::Failed {
      cmd: invocation.to_string(),
      code: output.code,
      stderr: output.diagnostics(),
    });
  }

  if !configure.is_file() {
    return Err(BootstrapError::StillUnconfigured(source_dir.to_path_buf()));
  }

  Ok(ConfigureState::Bootstrapped)
}
