//! Fixed names, versions and defaults shared across the crate.

/// Name of the upstream executable, also used for the staged binary.
pub const TOOL_NAME: &str = "flex";

/// Upstream release built when `FLEX_VERSION` is not set.
pub const DEFAULT_FLEX_VERSION: &str = "2.6.4";

/// SHA-256 of the upstream `flex-2.6.4.tar.gz` release tarball.
pub const DEFAULT_TARBALL_SHA256: &str = "e87aae032bf07c26f85ac0ed3250998c37621d95f8bd748b31f15b33c45ee995";

/// Pinned checkout location, relative to the project root.
pub const DEFAULT_SOURCE_PATH: &str = "third_party/flex";

pub const ENV_FLEX_VERSION: &str = "FLEX_VERSION";
pub const ENV_FLEX_SOURCE: &str = "FLEX_SOURCE";

/// Python package the binary is staged into, as `<package>/bin/<tool>`.
pub const PACKAGE_NAME: &str = "gnu_flex";
pub const PACKAGE_BIN_DIR: &str = "bin";
pub const BUILD_INFO_FILE: &str = "build-info.json";

/// Install prefix passed to `configure`; the artifact lands at `<DESTDIR><prefix>/bin`.
pub const INSTALL_PREFIX: &str = "/usr/local";

pub const CONFIGURE_ARGS: &[&str] = &["--disable-shared", "--enable-static", "--disable-nls"];

/// Returns the release tarball URL for a flex version.
pub fn tarball_url(version: &str) -> String {
  format!("https://github.com/westes/flex/releases/download/v{version}/flex-{version}.tar.gz")
}

/// Returns the release tarball file name for a flex version.
pub fn tarball_name(version: &str) -> String {
  format!("{TOOL_NAME}-{version}.tar.gz")
}

/// Known tarball checksum for a version, if one is built in.
pub fn known_tarball_sha256(version: &str) -> Option<&'static str> {
  (version == DEFAULT_FLEX_VERSION).then_some(DEFAULT_TARBALL_SHA256)
}
