mod build;
mod fetch;
mod info;

pub use build::{BuildArgs, cmd_build};
pub use fetch::cmd_fetch;
pub use info::cmd_info;
