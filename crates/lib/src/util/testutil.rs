//! Test utilities for flexpack-lib.
//!
//! Fake source trees, tarballs and a command runner that records what the
//! orchestration asked it to run.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs::File;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::execute::{BuildEnv, CommandOutput, CommandRunner, Invocation};

/// Write `content` to `root/relative`, creating parents, and mark it executable.
pub fn write_script(root: &Path, relative: &str, content: &str) {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(&path, content).unwrap();

  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }
}

/// Write a gzipped tarball whose entries live under `top_dir/`.
pub fn write_tarball(dest: &Path, top_dir: &str, files: &[(&str, &str)]) {
  let file = File::create(dest).unwrap();
  let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

  for (name, content) in files {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o755);
    header.set_cksum();
    builder
      .append_data(&mut header, format!("{top_dir}/{name}"), content.as_bytes())
      .unwrap();
  }

  builder.into_inner().unwrap().finish().unwrap();
}

/// A [`CommandRunner`] that records invocations and replays scripted results.
///
/// Commands without a scripted result succeed with empty output.
#[derive(Default)]
pub struct RecordingRunner {
  pub calls: RefCell<Vec<Invocation>>,
  pub envs: RefCell<Vec<BuildEnv>>,
  responses: RefCell<VecDeque<CommandOutput>>,
}

impl RecordingRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Queue the result for the next command.
  pub fn respond(self, output: CommandOutput) -> Self {
    self.responses.borrow_mut().push_back(output);
    self
  }

  pub fn succeed(self) -> Self {
    self.respond(ok_output(""))
  }

  pub fn fail(self, code: i32, stderr: &str) -> Self {
    self.respond(CommandOutput {
      code: Some(code),
      stdout: String::new(),
      stderr: stderr.to_string(),
    })
  }

  /// Commands run so far, rendered as strings.
  pub fn commands(&self) -> Vec<String> {
    self.calls.borrow().iter().map(ToString::to_string).collect()
  }

  pub fn count_matching(&self, needle: &str) -> usize {
    self.commands().iter().filter(|c| c.contains(needle)).count()
  }
}

impl CommandRunner for RecordingRunner {
  fn run(&self, invocation: &Invocation, env: &BuildEnv) -> std::io::Result<CommandOutput> {
    self.calls.borrow_mut().push(invocation.clone());
    self.envs.borrow_mut().push(env.clone());
    Ok(self.responses.borrow_mut().pop_front().unwrap_or_else(|| ok_output("")))
  }
}

pub fn ok_output(stdout: &str) -> CommandOutput {
  CommandOutput {
    code: Some(0),
    stdout: stdout.to_string(),
    stderr: String::new(),
  }
}
