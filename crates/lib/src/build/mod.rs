//! Native build of the upstream tool.
//!
//! # Submodules
//!
//! - [`bootstrap`] - generating `configure` with `autogen.sh` when it is missing
//! - [`compile`] - `configure`, `make` and `make install` into a staging root

pub mod bootstrap;
pub mod compile;

pub use bootstrap::{BootstrapError, ConfigureState, ensure_configured};
pub use compile::{CompileError, CompileOptions, CompileStep, build, installed_binary_path};
