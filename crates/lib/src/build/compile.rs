//! Configure, compile and install flex into a staging root.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use super::bootstrap::CONFIGURE_SCRIPT;
use crate::consts::{CONFIGURE_ARGS, ENV_FLEX_VERSION, INSTALL_PREFIX, TOOL_NAME};
use crate::execute::{BuildEnv, CommandRunner, Invocation, exit_status};
use crate::platform::Os;
use crate::util::remove_dir_if_exists;

/// Stand-in man page so `make install` does not need help2man.
const MAN_PAGE_STUB: &str = ".TH flex 1\n.SH NAME\nflex - the fast lexical analyser generator\n";

/// A step of the native build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStep {
  Configure,
  Make,
  Install,
}

impl fmt::Display for CompileStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CompileStep::Configure => write!(f, "configure"),
      CompileStep::Make => write!(f, "make"),
      CompileStep::Install => write!(f, "make install"),
    }
  }
}

/// Errors that can occur during the native build.
#[derive(Debug, Error)]
pub enum CompileError {
  #[error("{step} could not be started (`{cmd}`): {source}")]
  Spawn {
    step: CompileStep,
    cmd: String,
    #[source]
    source: std::io::Error,
  },

  #[error("{step} failed with {} (`{cmd}`):\n{output}", exit_status(.code))]
  Failed {
    step: CompileStep,
    cmd: String,
    code: Option<i32>,
    /// Captured tool output, kept for diagnostics.
    output: String,
  },

  #[error("failed to prepare source tree: {0}")]
  Io(#[from] std::io::Error),
}

/// Settings for a single native build.
#[derive(Debug, Clone)]
pub struct CompileOptions {
  /// `DESTDIR` for `make install`.
  pub stage_dir: PathBuf,
  /// Parallel jobs for `make`.
  pub jobs: usize,
  /// Host OS, which decides the executable's file name.
  pub os: Os,
}

impl CompileOptions {
  pub fn new(stage_dir: impl Into<PathBuf>, os: Os) -> Self {
    Self {
      stage_dir: stage_dir.into(),
      jobs: default_jobs(),
      os,
    }
  }
}

/// Number of CPUs, or 1 if that cannot be determined.
pub fn default_jobs() -> usize {
  std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Where `make install` puts the executable under `stage_dir`.
pub fn installed_binary_path(stage_dir: &Path, os: Os) -> PathBuf {
  stage_dir
    .join(INSTALL_PREFIX.trim_start_matches('/'))
    .join("bin")
    .join(os.exe_name(TOOL_NAME))
}

/// Configure, build and install flex, returning where the executable should be.
///
/// `version` is exported unmodified as `FLEX_VERSION` to every step. The
/// install root is emptied first, so anything at the returned path was put
/// there by this run. The path is not checked here; staging reports a missing
/// artifact.
pub fn build(
  source_dir: &Path,
  version: &str,
  options: &CompileOptions,
  env: &BuildEnv,
  runner: &impl CommandRunner,
) -> Result<PathBuf, CompileError> {
  ensure_man_page(source_dir)?;
  if remove_dir_if_exists(&options.stage_dir)? {
    debug!(path = %options.stage_dir.display(), "cleared previous install root");
  }

  let mut env = env.clone();
  env.set(ENV_FLEX_VERSION, version);
  let make = env.make_program().to_string();
  let jobs = options.jobs.max(1);

  info!(version, jobs, source = %source_dir.display(), "building flex");

  let configure = Invocation::new("sh", source_dir)
    .arg(format!("./{CONFIGURE_SCRIPT}"))
    .arg(format!("--prefix={INSTALL_PREFIX}"))
    .args(CONFIGURE_ARGS.iter().copied());
  run_step(CompileStep::Configure, &configure, &env, runner)?;

  let compile = Invocation::new(&make, source_dir).arg(format!("-j{jobs}"));
  run_step(CompileStep::Make, &compile, &env, runner)?;

  let install = Invocation::new(&make, source_dir)
    .arg(format!("DESTDIR={}", options.stage_dir.display()))
    .arg("install");
  run_step(CompileStep::Install, &install, &env, runner)?;

  let artifact = installed_binary_path(&options.stage_dir, options.os);
  debug!(path = %artifact.display(), "expected artifact");
  Ok(artifact)
}

fn run_step(
  step: CompileStep,
  invocation: &Invocation,
  env: &BuildEnv,
  runner: &impl CommandRunner,
) -> Result<(), CompileError> {
  let output = runner.run(invocation, env).map_err(|source| CompileError::Spawn {
    step,
    cmd: invocation.to_string(),
    source,
  })?;

  if !output.success() {
    return Err(CompileError::Failed {
      step,
      cmd: invocation.to_string(),
      code: output.code,
      output: output.diagnostics(),
    });
  }
  Ok(())
}

/// Write `doc/flex.1` if the tree has none.
fn ensure_man_page(source_dir: &Path) -> std::io::Result<()> {
  let man_page = source_dir.join("doc").join(format!("{TOOL_NAME}.1"));
  if man_page.exists() {
    return Ok(());
  }
  if let Some(parent) = man_page.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::write(&man_page, MAN_PAGE_STUB)?;
  debug!(path = %man_page.display(), "wrote stub man page");
  Ok(())
}
