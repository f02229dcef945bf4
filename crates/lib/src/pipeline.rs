//! The build pipeline.
//!
//! One forward pass: resolve source, generate `configure` if missing, compile,
//! stage. The first failing step aborts the run and nothing is retried.
//!
//! A previously staged package is removed before anything else runs, and the
//! install root is emptied before compiling, so a run yields either the
//! artifact it built or none. The work directory of a failed run is left in
//! place for inspection.

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use crate::build::{
  BootstrapError, CompileError, CompileOptions, ConfigureState, build as compile, ensure_configured,
};
use crate::config::BuildConfig;
use crate::execute::{BuildEnv, CommandRunner};
use crate::platform::{Os, Platform};
use crate::source::{SourceError, SourceRef, fetch_release, resolve_source};
use crate::stage::{StageError, StagedArtifact, clear_package, stage};

/// Errors that abort a build, one per pipeline step.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error("no usable flex source")]
  SourceNotFound(#[from] SourceError),

  #[error("generating configure failed")]
  Bootstrap(#[from] BootstrapError),

  #[error("native build failed")]
  Compile(#[from] CompileError),

  #[error("staging failed")]
  Stage(#[from] StageError),
}

/// Summary of a successful build.
#[derive(Debug, Clone)]
pub struct BuildReport {
  pub source: SourceRef,
  pub configure: ConfigureState,
  pub staged: StagedArtifact,
  pub elapsed: Duration,
}

/// Pick the source tree for `config`.
///
/// The override always wins; otherwise the release tarball is used when
/// requested, and the pinned checkout when not.
pub fn resolve_configured_source(config: &BuildConfig) -> Result<SourceRef, SourceError> {
  match config.source_override() {
    None if config.from_release => fetch_release(
      &config.version,
      config.expected_sha256().as_deref(),
      &config.cache_dir(),
      &config.work_dir,
    ),
    override_path => resolve_source(override_path, &config.default_source(), &config.version),
  }
}

/// Run the whole pipeline and stage exactly one artifact.
pub fn run_build(config: &BuildConfig, env: &BuildEnv, runner: &impl CommandRunner) -> Result<BuildReport, BuildError> {
  let started = Instant::now();
  let platform = Platform::current().ok_or_else(StageError::unsupported_host)?;
  info!(version = %config.version, platform = %platform, "starting flex build");

  clear_package(&config.package_root)?;

  let source = resolve_configured_source(config)?;

  let mut env = env.clone();
  if config.zig {
    if platform.os == Os::Linux {
      env.use_zig_cc(platform.arch);
    } else {
      warn!(platform = %platform, "zig cc is only used on linux, ignoring");
    }
  }

  let configure = ensure_configured(&source.path, &env, runner)?;

  let options = CompileOptions {
    stage_dir: config.stage_dir(),
    jobs: config.jobs,
    os: platform.os,
  };
  let artifact = compile(&source.path, &config.version, &options, &env, runner)?;

  let staged = stage(&artifact, &config.package_root, platform, &config.version, &source)?;

  let elapsed = started.elapsed();
  info!(binary = %staged.binary.display(), ?elapsed, "build complete");

  Ok(BuildReport {
    source,
    configure,
    staged,
    elapsed,
  })
}
