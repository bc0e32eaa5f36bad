//! Dependency reporting through a real `BB_DEPS` descriptor.

#![cfg(unix)]

use std::fs::OpenOptions;
use std::os::fd::IntoRawFd;

use bblua_lib::consts::DEPS_ENV_VAR;
use bblua_lib::eval::{Options, execute};
use serial_test::serial;

use super::common::{decode_all, fixture, root_str, write_file};

#[test]
#[serial]
fn execute_reports_script_dirs_and_output() {
  let temp = fixture(&["src/a.c"]);
  let root = root_str(&temp);
  let script = write_file(temp.path(), "build.lua", r#"rule{ inputs = glob("src/*.c") }"#);
  let output = temp.path().join("rules.json");

  let deps_file = temp.path().join("deps.bin");
  std::fs::write(&deps_file, b"").unwrap();
  let fd = OpenOptions::new().write(true).open(&deps_file).unwrap().into_raw_fd();

  temp_env::with_var(DEPS_ENV_VAR, Some(fd.to_string()), || {
    let options = Options {
      script,
      output: Some(output.clone()),
      args: vec![],
    };
    assert_eq!(execute(&options).unwrap().rules, 1);
  });

  let reported = decode_all(&std::fs::read(&deps_file).unwrap());
  assert_eq!(
    reported,
    vec![
      (false, format!("{}/build.lua", root)),
      (false, format!("{}/src", root)),
      (true, format!("{}/rules.json", root)),
    ]
  );

  let rules: serde_json::Value = serde_json::from_slice(&std::fs::read(&output).unwrap()).unwrap();
  assert!(rules[0]["inputs"][0].as_str().unwrap().ends_with("src/a.c"));
}

#[test]
#[serial]
fn execute_without_parent_still_runs() {
  let temp = fixture(&[]);
  let script = write_file(temp.path(), "build.lua", r#"rule{ task = {"x"} }"#);
  let output = temp.path().join("rules.json");

  temp_env::with_var_unset(DEPS_ENV_VAR, || {
    let options = Options {
      script,
      output: Some(output.clone()),
      args: vec![],
    };
    assert_eq!(execute(&options).unwrap().rules, 1);
  });

  assert!(output.exists());
}
