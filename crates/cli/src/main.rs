mod cmd;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flexpack_lib::consts::{DEFAULT_FLEX_VERSION, ENV_FLEX_VERSION};
use tracing_subscriber::EnvFilter;

use cmd::{BuildArgs, cmd_build, cmd_fetch, cmd_info};
use output::{OutputFormat, print_error};

/// flexpack - build GNU flex and stage it as platform-specific package data
#[derive(Parser)]
#[command(name = "flexpack")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build flex from source and stage the executable
  Build(BuildArgs),

  /// Download and extract a release tarball without building it
  Fetch {
    /// Upstream version to fetch (overrides FLEX_VERSION)
    #[arg(long, env = ENV_FLEX_VERSION, default_value = DEFAULT_FLEX_VERSION)]
    flex_version: String,

    /// Expected SHA-256 of the tarball
    #[arg(long)]
    sha256: Option<String>,

    /// Directory to download and extract into
    #[arg(long)]
    dest: PathBuf,
  },

  /// Show the host platform and its package tag
  Info {
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Build(args) => cmd_build(args),
    Commands::Fetch {
      flex_version,
      sha256,
      dest,
    } => cmd_fetch(&flex_version, sha256.as_deref(), &dest),
    Commands::Info { output } => cmd_info(output),
  };

  if let Err(err) = result {
    print_error(&format!("{err:#}"));
    std::process::exit(1);
  }
}
