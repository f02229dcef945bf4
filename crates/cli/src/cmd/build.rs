//! Implementation of the `flexpack build` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use flexpack_lib::build::ConfigureState;
use flexpack_lib::consts::TOOL_NAME;
use flexpack_lib::execute::{BuildEnv, ProcessRunner};
use flexpack_lib::stage::BuildInfo;
use flexpack_lib::{BuildConfig, BuildReport, run_build};

use crate::output::{OutputFormat, format_duration, print_json, print_stat, print_success, truncate_hash};

#[derive(Debug, Args)]
pub struct BuildArgs {
  /// Upstream version (overrides FLEX_VERSION)
  #[arg(long)]
  flex_version: Option<String>,

  /// Source tree to build instead of the pinned checkout (overrides FLEX_SOURCE)
  #[arg(long)]
  source: Option<PathBuf>,

  /// Project directory holding the pinned checkout (default: current directory)
  #[arg(long)]
  project_root: Option<PathBuf>,

  /// Root of the package-data tree to stage into
  #[arg(long, env = "FLEXPACK_PACKAGE_ROOT")]
  package_root: Option<PathBuf>,

  /// Scratch directory for the install root and downloads
  #[arg(long, env = "FLEXPACK_WORK_DIR")]
  work_dir: Option<PathBuf>,

  /// Parallel make jobs
  #[arg(short, long)]
  jobs: Option<usize>,

  /// Build from the upstream release tarball instead of the pinned checkout
  #[arg(long)]
  release: bool,

  /// Expected SHA-256 of the release tarball
  #[arg(long, requires = "release")]
  sha256: Option<String>,

  /// Compile with `zig cc` for a static musl binary (Linux only)
  #[arg(long)]
  zig: bool,

  #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,
}

impl BuildArgs {
  /// Overlay the flags that were given onto `config`.
  fn apply(self, config: &mut BuildConfig, cwd: &Path) {
    if let Some(version) = self.flex_version {
      config.version = version;
    }
    if let Some(source) = self.source {
      config.source_override = Some(cwd.join(source));
    }
    if let Some(package_root) = self.package_root {
      config.package_root = cwd.join(package_root);
    }
    if let Some(work_dir) = self.work_dir {
      config.work_dir = cwd.join(work_dir);
    }
    if let Some(jobs) = self.jobs {
      config.jobs = jobs;
    }
    if let Some(sha256) = self.sha256 {
      config.tarball_sha256 = Some(sha256);
    }
    config.from_release |= self.release;
    config.zig |= self.zig;
  }
}

#[derive(Serialize)]
struct BuildSummary<'a> {
  binary: &'a Path,
  build_info: &'a Path,
  bootstrapped: bool,
  elapsed_ms: u128,
  info: &'a BuildInfo,
}

pub fn cmd_build(args: BuildArgs) -> Result<()> {
  let cwd = std::env::current_dir().context("Failed to determine current directory")?;
  let project_root = args.project_root.as_ref().map_or_else(|| cwd.clone(), |root| cwd.join(root));
  let output = args.output;

  let mut config = BuildConfig::from_env(project_root);
  args.apply(&mut config, &cwd);

  let env = BuildEnv::from_host().with_defaults();
  let report = run_build(&config, &env, &ProcessRunner).context("flex build failed")?;

  if output.is_json() {
    print_json(&BuildSummary {
      binary: &report.staged.binary,
      build_info: &report.staged.build_info_path,
      bootstrapped: report.configure == ConfigureState::Bootstrapped,
      elapsed_ms: report.elapsed.as_millis(),
      info: &report.staged.info,
    })?;
  } else {
    print_report(&report);
  }

  Ok(())
}

fn print_report(report: &BuildReport) {
  let info = &report.staged.info;
  print_success(&format!(
    "Staged {} {} at {}",
    TOOL_NAME,
    info.version,
    report.staged.binary.display()
  ));
  print_stat(
    "Source",
    &format!("{} ({})", report.source.provenance, report.source.path.display()),
  );
  let configure = match report.configure {
    ConfigureState::AlreadyConfigured => "already present",
    ConfigureState::Bootstrapped => "generated by autogen.sh",
  };
  print_stat("Configure", configure);
  print_stat("Platform", &info.triple);
  print_stat("Wheel tag", &info.wheel_tag);
  print_stat("SHA-256", truncate_hash(&info.sha256.0));
  print_stat("Elapsed", &format_duration(report.elapsed));
}
