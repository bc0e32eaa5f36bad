//! The rule output stream.
//!
//! Every `rule{}` call in a script becomes one JSON object in a top-level
//! array. Rules are written as they are declared rather than collected, so
//! the array is opened when the writer is created and closed by
//! [`RuleWriter::finish`]:
//!
//! ```text
//! [
//! {"inputs":["a.c"],"task":["cc","-c","a.c"],"outputs":["a.o"]},
//! {"inputs":["a.o"],"task":["ld","a.o"],"outputs":["app"]}
//! ]
//! ```

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RulesError {
  #[error("failed to write rules: {0}")]
  Io(#[from] io::Error),

  #[error("failed to encode rule: {0}")]
  Json(#[from] serde_json::Error),

  #[error("rule output already finished")]
  Finished,
}

/// One build step: run `task` to turn `inputs` into `outputs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
  #[serde(default)]
  pub inputs: Vec<String>,
  #[serde(default)]
  pub task: Vec<String>,
  #[serde(default)]
  pub outputs: Vec<String>,
}

/// Streams rules as a JSON array.
#[derive(Debug)]
pub struct RuleWriter<W: Write> {
  out: W,
  count: usize,
  finished: bool,
}

impl<W: Write> RuleWriter<W> {
  /// Opens the array on `out`.
  pub fn new(mut out: W) -> Result<Self, RulesError> {
    out.write_all(b"[\n")?;
    Ok(Self {
      out,
      count: 0,
      finished: false,
    })
  }

  pub fn add(&mut self, rule: &Rule) -> Result<(), RulesError> {
    if self.finished {
      return Err(RulesError::Finished);
    }

    if self.count > 0 {
      self.out.write_all(b",\n")?;
    }
    serde_json::to_writer(&mut self.out, rule)?;
    self.count += 1;
    Ok(())
  }

  pub fn count(&self) -> usize {
    self.count
  }

  /// Closes the array and flushes. Returns the number of rules written.
  ///
  /// Calling this more than once is harmless.
  pub fn finish(&mut self) -> Result<usize, RulesError> {
    if !self.finished {
      if self.count > 0 {
        self.out.write_all(b"\n")?;
      }
      self.out.write_all(b"]\n")?;
      self.finished = true;
    }
    self.out.flush()?;
    Ok(self.count)
  }
}
