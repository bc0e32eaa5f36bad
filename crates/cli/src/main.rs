//! `bblua <script> [-o output] [args...]`
//!
//! Runs a Lua build script and writes the rules it declares as JSON.

mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, anyhow};
use clap::Parser;
use clap::error::ErrorKind;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use bblua_lib::consts::APP_NAME;
use bblua_lib::eval::{Options, execute};

/// Generate build rules from a Lua script.
#[derive(Debug, Parser)]
#[command(name = APP_NAME, version)]
struct Cli {
  /// Build script to run
  script: PathBuf,

  /// Write rules to this file instead of standard output (`-` for stdout)
  #[arg(short, long, value_name = "OUTPUT")]
  output: Option<PathBuf>,

  /// Arguments passed to the script as `...`
  #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
  args: Vec<String>,
}

fn main() -> ExitCode {
  // Logs go to stderr; stdout may be carrying the rules.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(err) => match err.kind() {
      ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
      _ => {
        let _ = err.print();
        return ExitCode::FAILURE;
      }
    },
  };

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      output::print_error(&err.to_string());
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let options = Options {
    script: cli.script,
    output: cli.output,
    args: cli.args,
  };

  // Lua errors are not Send + Sync, so carry the message instead.
  let summary = execute(&options).map_err(|e| anyhow!("{}", e))?;
  debug!(rules = summary.rules, "done");
  Ok(())
}
