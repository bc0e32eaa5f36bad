//! End-to-end script behaviour: rules, arguments, modules and errors.

use bblua_lib::eval::EvalError;

use super::common::{fixture, root_str, run_in, write_file};

mod rules {
  use super::*;

  #[test]
  fn no_rules_is_empty_array() {
    let temp = fixture(&[]);
    let run = run_in(temp.path(), "local x = 1", &[]);
    assert_eq!(run.result.unwrap().rules, 0);
    assert_eq!(run.rules.text(), "[\n]\n");
  }

  #[test]
  fn rules_keep_declaration_order() {
    let temp = fixture(&[]);
    let run = run_in(
      temp.path(),
      r#"
        for i = 1, 3 do
          rule{ inputs = {"in" .. i}, task = {"step", tostring(i)}, outputs = {"out" .. i} }
        end
      "#,
      &[],
    );
    assert_eq!(run.result.as_ref().unwrap().rules, 3);

    let rules = run.rules_json();
    let tasks: Vec<&str> = rules.iter().map(|r| r["task"][1].as_str().unwrap()).collect();
    assert_eq!(tasks, vec!["1", "2", "3"]);
  }

  #[test]
  fn strings_are_escaped() {
    let temp = fixture(&[]);
    let run = run_in(temp.path(), r#"rule{ task = {"echo", "a\"b\\c\n"} }"#, &[]);
    run.result.as_ref().unwrap();
    assert_eq!(run.rules_json()[0]["task"][1], "a\"b\\c\n");
  }
}

mod arguments {
  use super::*;

  #[test]
  fn passed_as_varargs() {
    let temp = fixture(&[]);
    let run = run_in(
      temp.path(),
      r##"rule{ task = { select("#", ...) .. "", ... } }"##,
      &["one", "two"],
    );
    run.result.as_ref().unwrap();
    assert_eq!(run.rules_json()[0]["task"], serde_json::json!(["2", "one", "two"]));
  }
}

mod modules {
  use super::*;

  #[test]
  fn required_module_is_found_and_reported() {
    let temp = fixture(&[]);
    let root = root_str(&temp);
    write_file(temp.path(), "toolchain.lua", r#"return { cc = "clang" }"#);

    let run = run_in(temp.path(), r#"rule{ task = { require("toolchain").cc } }"#, &[]);
    run.result.as_ref().unwrap();

    assert_eq!(run.rules_json()[0]["task"], serde_json::json!(["clang"]));
    let reported = run.reported();
    assert_eq!(reported[0], (false, format!("{}/build.lua", root)));
    assert_eq!(reported[1], (false, format!("{}/toolchain.lua", root)));
  }

  #[test]
  fn modules_can_use_globals() {
    let temp = fixture(&["src/a.c"]);
    write_file(temp.path(), "helpers.lua", "return function(p) return glob(p) end");

    let run = run_in(
      temp.path(),
      r#"rule{ inputs = require("helpers")("src/*.c") }"#,
      &[],
    );
    run.result.as_ref().unwrap();
    let inputs = run.rules_json()[0]["inputs"].clone();
    assert!(inputs[0].as_str().unwrap().ends_with("src/a.c"));
  }

  #[test]
  fn missing_module_is_an_error() {
    let temp = fixture(&[]);
    let run = run_in(temp.path(), r#"require("not_here")"#, &[]);
    assert!(run.result.unwrap_err().to_string().contains("not_here"));
  }
}

mod path_library {
  use super::*;

  #[test]
  fn available_to_scripts() {
    let temp = fixture(&[]);
    let run = run_in(
      temp.path(),
      r#"
        local head, tail = path.split("a/b/c.o")
        local root, ext = path.splitext(tail)
        rule{ task = { head, tail, root, ext, path.join(head, "d"), tostring(path.isabs("/x")) } }
      "#,
      &[],
    );
    run.result.as_ref().unwrap();
    assert_eq!(
      run.rules_json()[0]["task"],
      serde_json::json!(["a/b", "c.o", "c", ".o", "a/b/d", "true"])
    );
  }

  #[test]
  fn script_dir_is_visible() {
    let temp = fixture(&[]);
    let root = root_str(&temp);
    let run = run_in(temp.path(), "rule{ task = { SCRIPT_DIR } }", &[]);
    run.result.as_ref().unwrap();
    assert_eq!(run.rules_json()[0]["task"][0], root.as_str());
  }
}

mod errors {
  use super::*;

  #[test]
  fn runtime_error() {
    let temp = fixture(&[]);
    let run = run_in(temp.path(), r#"error("custom failure")"#, &[]);
    let err = run.result.unwrap_err();
    assert!(matches!(err, EvalError::Lua(_)));
    assert!(err.to_string().contains("custom failure"));
  }

  #[test]
  fn syntax_error_names_the_script() {
    let temp = fixture(&[]);
    let run = run_in(temp.path(), "rule{", &[]);
    let err = run.result.unwrap_err().to_string();
    assert!(err.contains("build.lua"), "{}", err);
  }

  #[cfg(target_os = "linux")]
  #[test]
  fn non_utf8_glob_result_in_rule_is_rejected() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp = fixture(&["good.c"]);
    std::fs::write(temp.path().join(OsStr::from_bytes(b"\xff.c")), "").unwrap();

    let run = run_in(temp.path(), r#"rule{ inputs = glob("*.c") }"#, &[]);
    let err = run.result.unwrap_err().to_string();
    assert!(err.contains("rule field 'inputs' item 2 is not valid UTF-8"), "{}", err);
    assert_eq!(run.rules.text(), "[\n");
  }

  #[test]
  fn rules_before_the_error_are_still_written() {
    let temp = fixture(&[]);
    let run = run_in(temp.path(), r#"rule{ task = {"first"} } error("stop")"#, &[]);
    assert!(run.result.is_err());
    assert!(run.rules.text().contains("first"));
  }
}
