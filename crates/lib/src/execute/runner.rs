//! Running external toolchain commands.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::env::BuildEnv;

/// A single external command: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: PathBuf,
}

impl Invocation {
  pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: cwd.to_path_buf(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }
}

impl fmt::Display for Invocation {
  /// Shell-like rendering, quoting words that contain whitespace or quotes.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let words = std::iter::once(&self.program).chain(self.args.iter());
    for (i, word) in words.enumerate() {
      if i > 0 {
        f.write_str(" ")?;
      }
      if word.is_empty() || word.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"') {
        write!(f, "'{}'", word.replace('\'', r"'\''"))?;
      } else {
        f.write_str(word)?;
      }
    }
    Ok(())
  }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  /// Exit code, `None` when the process was killed by a signal.
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }

  /// The captured output worth showing a user when the command failed.
  ///
  /// Stderr first, followed by the tail of stdout, where configure and make
  /// print the context leading up to an error.
  pub fn diagnostics(&self) -> String {
    const STDOUT_TAIL_LINES: usize = 40;

    let lines: Vec<&str> = self.stdout.lines().collect();
    let start = lines.len().saturating_sub(STDOUT_TAIL_LINES);
    let stdout_tail = lines[start..].join("\n");

    let stderr = self.stderr.trim_end();
    match (stderr.trim().is_empty(), stdout_tail.trim().is_empty()) {
      (true, _) => stdout_tail,
      (false, true) => stderr.to_string(),
      (false, false) => format!("{stderr}\n{stdout_tail}"),
    }
  }
}

/// Human-readable exit status for error messages.
pub fn exit_status(code: &Option<i32>) -> String {
  match *code {
    Some(code) => format!("exit code {code}"),
    None => "termination by signal".to_string(),
  }
}

/// Seam between orchestration and the processes it starts.
///
/// An `Err` means the process could not be started at all; a started process
/// that exits non-zero is reported through [`CommandOutput::code`].
pub trait CommandRunner {
  fn run(&self, invocation: &Invocation, env: &BuildEnv) -> std::io::Result<CommandOutput>;
}

/// Runs commands as real child processes and waits for them to finish.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
  fn run(&self, invocation: &Invocation, env: &BuildEnv) -> std::io::Result<CommandOutput> {
    info!(cmd = %invocation, cwd = %invocation.cwd.display(), "running");

    let output = Command::new(&invocation.program)
      .args(&invocation.args)
      .current_dir(&invocation.cwd)
      .env_clear()
      .envs(env.iter())
      .output()?;

    let result = CommandOutput {
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !result.stdout.is_empty() {
      debug!(stdout = %result.stdout, "command stdout");
    }
    if !result.stderr.is_empty() {
      debug!(stderr = %result.stderr, "command stderr");
    }
    debug!(code = ?result.code, "command finished");

    Ok(result)
  }
}
