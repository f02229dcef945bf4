//! flexpack-lib: build GNU flex and stage it as platform-tagged package data
//!
//! The crate drives a single linear pipeline:
//! - `source`: pick the flex source tree (override, pinned checkout or release tarball)
//! - `build`: generate `configure` if needed, then configure/make/install
//! - `stage`: copy the executable into the package-data tree with its platform tag
//!
//! `pipeline::run_build` strings these together.

pub mod build;
pub mod config;
pub mod consts;
pub mod execute;
pub mod pipeline;
pub mod platform;
pub mod source;
pub mod stage;
pub mod util;

pub use config::BuildConfig;
pub use pipeline::{BuildError, BuildReport, run_build};
