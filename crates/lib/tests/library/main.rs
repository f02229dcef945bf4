//! Library integration tests.
//!
//! The fixtures are shell scripts, so these only run on Unix.

#![cfg(unix)]

mod common;
mod pipeline_tests;
