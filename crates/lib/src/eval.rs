//! Build script evaluation.
//!
//! [`execute`] runs one script end to end: the script's rules go to the
//! chosen output and every file it touched is reported to the parent build
//! process named by `BB_DEPS`.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use mlua::prelude::*;
use tracing::{debug, info};

use crate::deps::DepSender;
use crate::lua::runtime::{self, ScriptState};
use crate::path::{PathStyle, os};
use crate::rules::{RuleWriter, RulesError};

/// Errors that can occur while evaluating a script.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
  #[error("failed to open output file '{}': {source}", path.display())]
  OpenOutput {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("cannot read '{}': {source}", path.display())]
  ReadScript {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("{0}")]
  Lua(#[from] LuaError),

  #[error(transparent)]
  Rules(#[from] RulesError),
}

/// What to run and where its rules go.
#[derive(Debug, Clone, Default)]
pub struct Options {
  pub script: PathBuf,
  /// Rule output file. `None` or `-` means standard output.
  pub output: Option<PathBuf>,
  /// Passed to the script as `...`.
  pub args: Vec<String>,
}

impl Options {
  /// The output file, unless rules go to standard output.
  pub fn output_file(&self) -> Option<&Path> {
    self.output.as_deref().filter(|p| *p != Path::new("-"))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalSummary {
  /// Number of rules the script emitted.
  pub rules: usize,
}

/// Run a build script with the process environment.
///
/// The script is read before the output is opened, so a missing script
/// leaves an existing output file untouched.
pub fn execute(options: &Options) -> Result<EvalSummary, EvalError> {
  let source = read_script(&options.script)?;

  let out: Box<dyn Write> = match options.output_file() {
    Some(path) => {
      let file = File::create(path).map_err(|source| EvalError::OpenOutput {
        path: path.to_path_buf(),
        source,
      })?;
      Box::new(BufWriter::new(file))
    }
    None => Box::new(io::stdout().lock()),
  };

  let deps = DepSender::from_env().boxed();
  evaluate(options, &source, PathStyle::native(), out, deps)
}

/// Run an already loaded script against explicit outputs.
pub fn evaluate(
  options: &Options,
  source: &[u8],
  style: PathStyle,
  out: Box<dyn Write>,
  deps: DepSender<Box<dyn Write>>,
) -> Result<EvalSummary, EvalError> {
  let state = Rc::new(ScriptState::new(style, RuleWriter::new(out)?, deps));

  // The runtime holds clones of `state` inside its callbacks; drop it before
  // finishing so nothing can add rules after the array is closed.
  {
    let lua = runtime::create_runtime(state.clone())?;
    runtime::run_script(&lua, &state, &options.script, source, &options.args)?;
  }

  let rules = state.rules.borrow_mut().finish()?;

  if let Some(path) = options.output_file() {
    state.report_output(&os::path_bytes(path));
  }

  if let Err(err) = state.deps.borrow_mut().flush() {
    debug!(error = %err, "failed to flush dependency records");
  }

  info!(script = %options.script.display(), rules, "script evaluated");
  Ok(EvalSummary { rules })
}

fn read_script(path: &Path) -> Result<Vec<u8>, EvalError> {
  fs::read(path).map_err(|source| EvalError::ReadScript {
    path: path.to_path_buf(),
    source,
  })
}
