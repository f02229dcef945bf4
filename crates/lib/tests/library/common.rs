//! Shared fixtures: fake flex source trees driven by shell scripts.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use flexpack_lib::BuildConfig;
use flexpack_lib::execute::BuildEnv;
use tempfile::TempDir;

/// `configure` that records the version it was given and succeeds.
pub const CONFIGURE_OK: &str = "#!/bin/sh\nprintf '%s' \"$FLEX_VERSION\" > .configured-version\nexit 0\n";

/// `make` stand-in: `install` writes a stub flex into `$DESTDIR/usr/local/bin`.
pub const MAKE_OK: &str = r#"#!/bin/sh
dest=""
target=all
for arg in "$@"; do
  case "$arg" in
    DESTDIR=*) dest="${arg#DESTDIR=}" ;;
    install) target=install ;;
  esac
done
if [ "$target" = install ]; then
  mkdir -p "$dest/usr/local/bin"
  printf '#!/bin/sh\necho "flex %s"\n' "$FLEX_VERSION" > "$dest/usr/local/bin/flex"
  chmod 755 "$dest/usr/local/bin/flex"
fi
exit 0
"#;

/// `make` stand-in that fails to compile.
pub const MAKE_FAIL: &str = "#!/bin/sh\necho 'scan.c:1: error: boom' >&2\nexit 1\n";

/// `make` stand-in whose every step succeeds without installing anything.
pub const MAKE_NOOP: &str = "#!/bin/sh\nexit 0\n";

/// `autogen.sh` that generates a working `configure`.
pub const AUTOGEN_OK: &str = "#!/bin/sh\ncd \"$(dirname \"$0\")\"\necho run >> .autogen-runs\nprintf '#!/bin/sh\\nexit 0\\n' > configure\n";

pub fn write_script(root: &Path, relative: &str, content: &str) -> PathBuf {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(&path, content).unwrap();
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}

/// A project directory with a pinned checkout and a fake `make`.
pub struct Project {
  pub temp: TempDir,
  pub make: PathBuf,
}

impl Project {
  /// Pinned checkout with a generated `configure` and a `make` that succeeds.
  pub fn configured() -> Self {
    Self::with(&[("third_party/flex/configure", CONFIGURE_OK)], MAKE_OK)
  }

  pub fn with(files: &[(&str, &str)], make: &str) -> Self {
    let temp = TempDir::new().unwrap();
    for (relative, content) in files {
      write_script(temp.path(), relative, content);
    }
    let make = write_script(temp.path(), "tools/make", make);
    Self { temp, make }
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  pub fn source(&self) -> PathBuf {
    self.root().join("third_party/flex")
  }

  pub fn config(&self) -> BuildConfig {
    let mut config = BuildConfig::new(self.root());
    config.jobs = 2;
    config
  }

  /// Host environment with `MAKE` pointing at the fake and a dummy libtoolize.
  pub fn env(&self) -> BuildEnv {
    let mut env = BuildEnv::from_host().with_defaults();
    env.set("MAKE", self.make.to_string_lossy());
    env.set("LIBTOOLIZE", "true");
    env
  }

  /// Host environment that runs `make` from `script` instead.
  pub fn env_with_make(&self, script: &str) -> BuildEnv {
    let make = write_script(self.root(), "tools/other-make", script);
    let mut env = self.env();
    env.set("MAKE", make.to_string_lossy());
    env
  }

  /// Files staged into the package's `bin` directory.
  pub fn staged_bin_files(&self, config: &BuildConfig) -> Vec<PathBuf> {
    let bin = config.package_root.join("gnu_flex").join("bin");
    match std::fs::read_dir(&bin) {
      Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
      Err(_) => Vec::new(),
    }
  }
}
