//! Integration tests for `flexpack build`.

use predicates::prelude::*;

use super::common::{CONFIGURE_OK, MAKE_FAIL, MAKE_OK, TestEnv};

// =============================================================================
// Success
// =============================================================================

#[test]
fn trivial_tree_stages_one_artifact() {
  let env = TestEnv::configured();

  env
    .build_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Staged flex 2.6.4"));

  let staged = env.staged_files();
  assert_eq!(staged.len(), 1);
  assert_eq!(staged[0], env.package_dir().join("bin/flex"));
  assert!(env.package_dir().join("build-info.json").is_file());
}

#[test]
fn json_output_describes_artifact() {
  let env = TestEnv::configured();

  let output = env.build_cmd().args(["--output", "json"]).output().unwrap();
  assert!(output.status.success());

  let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(value["info"]["tool"], "flex");
  assert_eq!(value["info"]["version"], "2.6.4");
  assert_eq!(value["info"]["source"]["provenance"]["kind"], "pinned");
  assert_eq!(value["bootstrapped"], false);
  assert!(value["binary"].as_str().unwrap().ends_with("gnu_flex/bin/flex"));
}

#[test]
fn flex_version_env_reaches_build_unmodified() {
  let env = TestEnv::configured();

  env.build_cmd().env("FLEX_VERSION", "2.6.4-rc1").assert().success();

  let seen = std::fs::read_to_string(env.root().join("third_party/flex/.configured-version")).unwrap();
  assert_eq!(seen, "2.6.4-rc1");
}

#[test]
fn flag_overrides_version_env() {
  let env = TestEnv::configured();

  env
    .build_cmd()
    .env("FLEX_VERSION", "from-env")
    .args(["--flex-version", "from-flag"])
    .assert()
    .success();

  let seen = std::fs::read_to_string(env.root().join("third_party/flex/.configured-version")).unwrap();
  assert_eq!(seen, "from-flag");
}

#[test]
fn flex_source_env_wins_over_checkout() {
  let env = TestEnv::new(MAKE_OK);
  env.write_script("third_party/flex/configure", "#!/bin/sh\nexit 1\n");
  env.write_script("elsewhere/flex/configure", CONFIGURE_OK);

  env
    .build_cmd()
    .env("FLEX_SOURCE", env.root().join("elsewhere/flex"))
    .assert()
    .success()
    .stdout(predicate::str::contains("override"));

  assert!(env.root().join("elsewhere/flex/.configured-version").exists());
  assert_eq!(env.staged_files().len(), 1);
}

#[test]
fn missing_configure_is_bootstrapped() {
  let env = TestEnv::new(MAKE_OK);
  env.write_script(
    "third_party/flex/autogen.sh",
    "#!/bin/sh\ncd \"$(dirname \"$0\")\"\nprintf '#!/bin/sh\\nexit 0\\n' > configure\n",
  );

  env
    .build_cmd()
    .env("LIBTOOLIZE", "true")
    .assert()
    .success()
    .stdout(predicate::str::contains("generated by autogen.sh"));

  assert!(env.root().join("third_party/flex/configure").is_file());
  assert_eq!(env.staged_files().len(), 1);
}

// =============================================================================
// Failure
// =============================================================================

#[test]
fn failing_build_exits_nonzero_and_stages_nothing() {
  let env = TestEnv::new(MAKE_FAIL);
  env.write_script("third_party/flex/configure", CONFIGURE_OK);

  env
    .build_cmd()
    .assert()
    .failure()
    .stderr(predicate::str::contains("native build failed"))
    .stderr(predicate::str::contains("parse.y: error: syntax error"));

  assert!(env.staged_files().is_empty());
  assert!(!env.package_dir().exists());
}

#[test]
fn failing_configure_exits_nonzero() {
  let env = TestEnv::new(MAKE_OK);
  env.write_script(
    "third_party/flex/configure",
    "#!/bin/sh\necho 'configure: error: no acceptable C compiler found' >&2\nexit 77\n",
  );

  env
    .build_cmd()
    .assert()
    .failure()
    .stderr(predicate::str::contains("exit code 77"))
    .stderr(predicate::str::contains("no acceptable C compiler found"));

  assert!(!env.package_dir().exists());
}

#[test]
fn invalid_override_does_not_fall_back() {
  let env = TestEnv::configured();

  env
    .build_cmd()
    .args(["--source", "does/not/exist"])
    .current_dir(env.root())
    .assert()
    .failure()
    .stderr(predicate::str::contains("flex source not found"));

  assert!(!env.package_dir().exists());
}

#[test]
fn failed_rebuild_leaves_no_earlier_artifact() {
  let env = TestEnv::configured();
  env.build_cmd().assert().success();
  assert_eq!(env.staged_files().len(), 1);

  env.write_script("tools/make", MAKE_FAIL);
  env.build_cmd().assert().failure();

  assert!(!env.package_dir().exists());
}
