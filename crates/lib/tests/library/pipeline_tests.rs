//! End-to-end pipeline runs against fake source trees and real subprocesses.

use flexpack_lib::build::{BootstrapError, CompileError, CompileStep, ConfigureState};
use flexpack_lib::execute::ProcessRunner;
use flexpack_lib::source::Provenance;
use flexpack_lib::stage::{BuildInfo, StageError};
use flexpack_lib::{BuildError, run_build};

use super::common::{AUTOGEN_OK, CONFIGURE_OK, MAKE_FAIL, MAKE_NOOP, MAKE_OK, Project};

#[test]
fn trivial_build_stages_exactly_one_artifact() {
  let project = Project::configured();
  let config = project.config();

  let report = run_build(&config, &project.env(), &ProcessRunner).unwrap();

  let staged = project.staged_bin_files(&config);
  assert_eq!(staged.len(), 1);
  assert_eq!(staged[0], config.package_root.join("gnu_flex/bin/flex"));
  assert_eq!(report.staged.binary, staged[0]);
  assert_eq!(
    report.source.provenance,
    Provenance::Pinned {
      version: "2.6.4".to_string()
    }
  );
}

#[test]
fn failing_build_aborts_without_artifact() {
  let project = Project::with(&[("third_party/flex/configure", CONFIGURE_OK)], MAKE_FAIL);
  let config = project.config();

  let err = run_build(&config, &project.env(), &ProcessRunner).unwrap_err();

  match err {
    BuildError::Compile(CompileError::Failed { step, code, output, .. }) => {
      assert_eq!(step, CompileStep::Make);
      assert_eq!(code, Some(1));
      assert!(output.contains("boom"));
    }
    other => panic!("unexpected error: {other:?}"),
  }
  assert!(project.staged_bin_files(&config).is_empty());
  assert!(!config.package_root.join("gnu_flex/build-info.json").exists());
}

#[test]
fn version_reaches_configure_unmodified() {
  let project = Project::configured();
  let mut config = project.config();
  config.version = "2.6.4+local build".to_string();

  run_build(&config, &project.env(), &ProcessRunner).unwrap();

  let seen = std::fs::read_to_string(project.source().join(".configured-version")).unwrap();
  assert_eq!(seen, "2.6.4+local build");
}

#[test]
fn unconfigured_checkout_bootstraps_once() {
  let project = Project::with(&[("third_party/flex/autogen.sh", AUTOGEN_OK)], MAKE_OK);
  let config = project.config();

  let report = run_build(&config, &project.env(), &ProcessRunner).unwrap();

  assert_eq!(report.configure, ConfigureState::Bootstrapped);
  let runs = std::fs::read_to_string(project.source().join(".autogen-runs")).unwrap();
  assert_eq!(runs.lines().count(), 1);

  // A second build finds configure and leaves autogen alone.
  let report = run_build(&config, &project.env(), &ProcessRunner).unwrap();
  assert_eq!(report.configure, ConfigureState::AlreadyConfigured);
  let runs = std::fs::read_to_string(project.source().join(".autogen-runs")).unwrap();
  assert_eq!(runs.lines().count(), 1);
}

#[test]
fn failing_autogen_surfaces_stderr() {
  let project = Project::with(
    &[(
      "third_party/flex/autogen.sh",
      "#!/bin/sh\necho 'autoreconf: not found' >&2\nexit 1\n",
    )],
    MAKE_OK,
  );
  let config = project.config();

  let err = run_build(&config, &project.env(), &ProcessRunner).unwrap_err();

  match err {
    BuildError::Bootstrap(BootstrapError::Failed { stderr, .. }) => assert!(stderr.contains("autoreconf: not found")),
    other => panic!("unexpected error: {other:?}"),
  }
  assert!(project.staged_bin_files(&config).is_empty());
}

#[test]
fn override_is_built_instead_of_checkout() {
  let project = Project::with(
    &[
      ("third_party/flex/configure", "#!/bin/sh\nexit 1\n"),
      ("vendor/flex/configure", CONFIGURE_OK),
    ],
    MAKE_OK,
  );
  let mut config = project.config();
  config.source_override = Some(project.root().join("vendor/flex"));

  let report = run_build(&config, &project.env(), &ProcessRunner).unwrap();

  assert_eq!(report.source.provenance, Provenance::Override);
  assert!(project.root().join("vendor/flex/.configured-version").exists());
  assert!(!project.source().join(".configured-version").exists());
}

#[test]
fn staged_binary_runs_and_build_info_is_recorded() {
  let project = Project::configured();
  let config = project.config();

  let report = run_build(&config, &project.env(), &ProcessRunner).unwrap();

  let output = std::process::Command::new(&report.staged.binary).output().unwrap();
  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "flex 2.6.4");

  let info = BuildInfo::load(&report.staged.build_info_path).unwrap();
  assert_eq!(info.tool, "flex");
  assert_eq!(info.version, "2.6.4");
  assert!(info.wheel_tag.starts_with("py3-none-"));
}

#[test]
fn rebuild_without_install_does_not_restage_old_binary() {
  let project = Project::configured();
  let mut config = project.config();
  run_build(&config, &project.env(), &ProcessRunner).unwrap();
  assert_eq!(project.staged_bin_files(&config).len(), 1);

  config.version = "9.9.9".to_string();
  let err = run_build(&config, &project.env_with_make(MAKE_NOOP), &ProcessRunner).unwrap_err();

  assert!(matches!(err, BuildError::Stage(StageError::ArtifactMissing(_))));
  assert!(project.staged_bin_files(&config).is_empty());
  assert!(!config.package_root.join("gnu_flex/build-info.json").exists());
}

#[test]
fn failed_rebuild_removes_previous_package() {
  let project = Project::configured();
  let config = project.config();
  run_build(&config, &project.env(), &ProcessRunner).unwrap();

  run_build(&config, &project.env_with_make(MAKE_FAIL), &ProcessRunner).unwrap_err();

  assert!(project.staged_bin_files(&config).is_empty());
}
