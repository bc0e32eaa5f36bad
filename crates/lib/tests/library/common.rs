//! Shared helpers for the library integration tests.

use std::io::Write;
use std::path::{Path, PathBuf};

use bblua_lib::deps::{DepSender, Dependency};
use bblua_lib::eval::{EvalError, EvalSummary, Options, evaluate};
use bblua_lib::path::PathStyle;
use tempfile::TempDir;

pub use bblua_lib::util::testutil::SharedBuf;

/// Builds a tree of empty files; entries ending in `/` are directories.
pub fn fixture(paths: &[&str]) -> TempDir {
  let temp = TempDir::new().unwrap();
  for path in paths {
    let full = temp.path().join(path);
    if path.ends_with('/') {
      std::fs::create_dir_all(&full).unwrap();
    } else {
      std::fs::create_dir_all(full.parent().unwrap()).unwrap();
      std::fs::write(&full, "").unwrap();
    }
  }
  temp
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
  let path = dir.join(name);
  std::fs::write(&path, content).unwrap();
  path
}

/// The result of running one script.
pub struct Run {
  pub result: Result<EvalSummary, EvalError>,
  pub rules: SharedBuf,
  pub deps: SharedBuf,
}

impl Run {
  pub fn rules_json(&self) -> Vec<serde_json::Value> {
    serde_json::from_str::<serde_json::Value>(&self.rules.text())
      .unwrap()
      .as_array()
      .unwrap()
      .clone()
  }

  /// Every reported dependency as `(is_output, name)`.
  pub fn reported(&self) -> Vec<(bool, String)> {
    decode_all(&self.deps.contents())
  }
}

/// Writes `source` to `build.lua` in `dir` and runs it with POSIX paths.
pub fn run_in(dir: &Path, source: &str, args: &[&str]) -> Run {
  let script = write_file(dir, "build.lua", source);
  let options = Options {
    script,
    output: None,
    args: args.iter().map(|a| a.to_string()).collect(),
  };

  let rules = SharedBuf::default();
  let deps = SharedBuf::default();
  let result = evaluate(
    &options,
    source.as_bytes(),
    PathStyle::Posix,
    Box::new(rules.clone()),
    DepSender::with_writer(Box::new(deps.clone()) as Box<dyn Write>),
  );

  Run { result, rules, deps }
}

pub fn decode_all(bytes: &[u8]) -> Vec<(bool, String)> {
  let mut reader = bytes;
  let mut found = Vec::new();
  while let Some(dep) = Dependency::read_from(&mut reader).unwrap() {
    found.push((dep.output, String::from_utf8(dep.name.into_owned()).unwrap()));
  }
  found
}

pub fn root_str(temp: &TempDir) -> String {
  temp.path().to_str().unwrap().to_string()
}
