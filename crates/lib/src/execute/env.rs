//! Environment handed to the upstream toolchain.
//!
//! Subprocesses see exactly the variables held here: the inherited
//! environment plus defaults that let a git checkout of flex build without its
//! documentation toolchain. Defaults never replace a value the caller set.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::platform::Arch;

/// Variables that are filled in when absent.
pub const DEFAULT_VARS: &[(&str, &str)] = &[
  ("CFLAGS", "-O2"),
  ("CPPFLAGS", "-D_GNU_SOURCE"),
  ("MAKEINFO", "true"),
  ("HELP2MAN", "true"),
];

/// Program names searched for on `PATH` when `LIBTOOLIZE` is unset.
pub const LIBTOOLIZE_CANDIDATES: &[&str] = &["libtoolize", "glibtoolize"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnv {
  vars: BTreeMap<String, String>,
}

impl BuildEnv {
  /// Snapshot the current process environment.
  ///
  /// Variables whose name or value is not valid UTF-8 are skipped.
  pub fn from_host() -> Self {
    Self::from_vars(
      std::env::vars_os().filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?))),
    )
  }

  pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
  where
    K: Into<String>,
    V: Into<String>,
  {
    Self {
      vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
  }

  /// Apply the build defaults and locate `libtoolize`.
  pub fn with_defaults(mut self) -> Self {
    for (key, value) in DEFAULT_VARS {
      self.set_default(key, value);
    }
    if self.get("LIBTOOLIZE").is_none_or(str::is_empty) {
      if let Some(found) = self.find_program(LIBTOOLIZE_CANDIDATES) {
        debug!(libtoolize = %found, "found libtoolize on PATH");
        self.set("LIBTOOLIZE", found);
      }
    }
    self
  }

  /// Compile with `zig cc` against musl for the given architecture.
  pub fn use_zig_cc(&mut self, arch: Arch) {
    self.set("CC", format!("zig cc -target {}", arch.musl_target()));
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.vars.get(key).map(String::as_str)
  }

  pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
    self.vars.insert(key.into(), value.into());
  }

  /// Set `key` only if it is not already present. Returns whether it was set.
  pub fn set_default(&mut self, key: &str, value: &str) -> bool {
    if self.vars.contains_key(key) {
      return false;
    }
    self.vars.insert(key.to_string(), value.to_string());
    true
  }

  /// The `make` program, honouring `MAKE`.
  pub fn make_program(&self) -> &str {
    self.get("MAKE").filter(|m| !m.is_empty()).unwrap_or("make")
  }

  /// The configured or discovered `libtoolize`, if any.
  pub fn libtoolize(&self) -> Option<&str> {
    self.get("LIBTOOLIZE").filter(|l| !l.is_empty())
  }

  /// Search this environment's `PATH` for the first of `candidates`.
  pub fn find_program(&self, candidates: &[&str]) -> Option<String> {
    let search_path = self.get("PATH")?;
    let cwd = std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
    candidates.iter().find_map(|name| {
      which::which_in(name, Some(search_path), &cwd)
        .ok()
        .map(|p| p.to_string_lossy().into_owned())
    })
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }
}
