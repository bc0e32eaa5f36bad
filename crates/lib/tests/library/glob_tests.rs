//! Tests for `glob()` as seen from build scripts.

use super::common::{fixture, root_str, run_in};

/// Runs a script that returns its glob result through a single rule, and
/// gives back the matched paths relative to the temp root.
fn globbed(paths: &[&str], call: &str) -> Vec<String> {
  let temp = fixture(paths);
  let root = root_str(&temp);
  let run = run_in(temp.path(), &format!("rule{{ inputs = {} }}", call), &[]);
  run.result.as_ref().unwrap();

  let rules = run.rules_json();
  rules[0]["inputs"]
    .as_array()
    .unwrap()
    .iter()
    .map(|v| {
      let s = v.as_str().unwrap();
      s.strip_prefix(&root).unwrap().trim_start_matches('/').to_string()
    })
    .collect()
}

mod patterns {
  use super::*;

  #[test]
  fn wildcard_is_relative_to_script_dir() {
    assert_eq!(
      globbed(&["a.c", "b.c", "c.h"], r#"glob("*.c")"#),
      vec!["a.c", "b.c"]
    );
  }

  #[test]
  fn results_are_sorted_and_unique() {
    assert_eq!(
      globbed(&["b.c", "a.c"], r#"glob("*.c", "a.*", "b.c")"#),
      vec!["a.c", "b.c"]
    );
  }

  #[test]
  fn recursive_marker_lists_everything() {
    assert_eq!(
      globbed(&["src/a.c", "src/sub/b.c", "src/sub/c.h"], r#"glob("src/**/*.c")"#),
      vec!["src/a.c", "src/sub/b.c"]
    );
  }

  #[test]
  fn wildcard_directories() {
    assert_eq!(
      globbed(&["lib/x/test.c", "lib/y/test.c", "lib/z/main.c"], r#"glob("lib/*/test.c")"#),
      vec!["lib/x/test.c", "lib/y/test.c"]
    );
  }

  #[test]
  fn missing_directory_is_empty() {
    assert!(globbed(&["a.c"], r#"glob("nothing/*.c")"#).is_empty());
  }

  #[test]
  fn literal_paths_need_not_exist() {
    assert_eq!(globbed(&[], r#"glob("generated.c")"#), vec!["generated.c"]);
  }

  #[test]
  fn tables_of_patterns() {
    assert_eq!(
      globbed(&["a.c", "b.h", "c.txt"], r#"glob({"*.c", "*.h"}, "*.txt")"#),
      vec!["a.c", "b.h", "c.txt"]
    );
  }
}

mod exclusions {
  use super::*;

  #[test]
  fn removes_earlier_matches() {
    assert_eq!(
      globbed(&["a.c", "b.c", "test_a.c"], r#"glob("*.c", "!test_*.c")"#),
      vec!["a.c", "b.c"]
    );
  }

  #[test]
  fn does_not_affect_later_patterns() {
    assert_eq!(
      globbed(&["a.c", "test_a.c"], r#"glob("!test_*.c", "*.c")"#),
      vec!["a.c", "test_a.c"]
    );
  }

  #[test]
  fn works_inside_tables() {
    assert_eq!(
      globbed(&["a.c", "b.c"], r#"glob({"*.c", "!b.c"})"#),
      vec!["a.c"]
    );
  }
}

mod errors {
  use super::*;

  #[test]
  fn non_string_pattern_is_an_error() {
    let temp = fixture(&[]);
    let run = run_in(temp.path(), "glob(true)", &[]);
    let err = run.result.unwrap_err().to_string();
    assert!(err.contains("bad argument #1 to 'glob'"), "{}", err);
  }
}

#[test]
fn listed_directories_are_reported() {
  let temp = fixture(&["src/a.c", "src/sub/b.c"]);
  let root = root_str(&temp);
  let run = run_in(temp.path(), r#"glob("src/**")"#, &[]);
  run.result.as_ref().unwrap();

  let reported = run.reported();
  assert_eq!(
    reported,
    vec![
      (false, format!("{}/build.lua", root)),
      (false, format!("{}/src", root)),
      (false, format!("{}/src/sub", root)),
    ]
  );
}

#[test]
fn string_glob_matches_names() {
  let temp = fixture(&[]);
  let run = run_in(
    temp.path(),
    r#"
      local kept = {}
      for _, name in ipairs({"main.c", "main.h", "util.c"}) do
        if name:glob("*.c") then kept[#kept + 1] = name end
      end
      rule{ inputs = kept }
    "#,
    &[],
  );
  run.result.as_ref().unwrap();
  assert_eq!(run.rules_json()[0]["inputs"], serde_json::json!(["main.c", "util.c"]));
}
