//! External process execution.
//!
//! Everything that starts a subprocess goes through [`CommandRunner`], with the
//! environment described by [`BuildEnv`].

pub mod env;
pub mod runner;

pub use env::BuildEnv;
pub use runner::{CommandOutput, CommandRunner, Invocation, ProcessRunner, exit_status};
