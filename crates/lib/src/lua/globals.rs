//! Global functions available to build scripts.
//!
//! - `path` - Path manipulation library (also `require("path")`)
//! - `glob(...)` - Expand patterns relative to `SCRIPT_DIR`
//! - `string.glob(s, pattern)` - Match a string against one pattern
//! - `rule{}` - Emit a rule

use std::rc::Rc;

use mlua::prelude::*;

use super::helpers::{self, bad_argument, check_string};
use super::runtime::ScriptState;
use crate::consts::SCRIPT_DIR_GLOBAL;
use crate::glob::{MatchSet, Walker, glob_match};
use crate::path::PathStyle;
use crate::rules::Rule;

/// Register all build script globals in the Lua runtime.
pub fn register_globals(lua: &Lua, state: Rc<ScriptState>) -> LuaResult<()> {
  let style = state.style;

  let path = helpers::path::create_path_helpers(lua, style)?;
  lua.globals().set("path", path.clone())?;
  let package: LuaTable = lua.globals().get("package")?;
  package.get::<LuaTable>("loaded")?.set("path", path)?;

  lua.globals().set("glob", create_glob(lua, state.clone())?)?;

  let string: LuaTable = lua.globals().get("string")?;
  string.set(
    "glob",
    lua.create_function(move |_, (text, pattern): (LuaString, LuaString)| {
      Ok(glob_match(style, &text.as_bytes(), &pattern.as_bytes()))
    })?,
  )?;

  lua.globals().set("rule", create_rule(lua, state)?)?;

  Ok(())
}

/// `glob(...)` accepts any mix of patterns and sequences of patterns and
/// returns the sorted matches. Relative patterns are resolved against
/// `SCRIPT_DIR`, and every directory read along the way is reported as an
/// input.
fn create_glob(lua: &Lua, state: Rc<ScriptState>) -> LuaResult<LuaFunction> {
  lua.create_function(move |lua, args: LuaMultiValue| {
    let dir = script_dir(lua)?;
    let walker = Walker::new(state.style);
    let mut set = MatchSet::new();

    let mut apply = |pattern: &[u8]| {
      let pattern = rebase(state.style, &dir, pattern);
      set.apply_with(&walker, &pattern, &mut |listed| state.report_input(listed));
    };

    for (i, value) in args.into_iter().enumerate() {
      match value {
        LuaValue::Table(patterns) => {
          for value in patterns.sequence_values::<LuaValue>() {
            let pattern = check_string(lua, value?, i + 1, "glob")?;
            apply(&pattern.as_bytes());
          }
        }
        value => {
          let pattern = check_string(lua, value, i + 1, "glob")?;
          apply(&pattern.as_bytes());
        }
      }
    }

    let matches = set
      .into_iter()
      .map(|path| lua.create_string(path))
      .collect::<LuaResult<Vec<_>>>()?;
    lua.create_sequence_from(matches)
  })
}

/// `rule{ inputs = {...}, task = {...}, outputs = {...} }`
fn create_rule(lua: &Lua, state: Rc<ScriptState>) -> LuaResult<LuaFunction> {
  lua.create_function(move |_, arg: LuaValue| {
    let got = arg.type_name();
    let LuaValue::Table(spec) = arg else {
      return Err(bad_argument(1, "rule", "table", got));
    };

    let rule = Rule {
      inputs: string_list(&spec, "inputs")?,
      task: string_list(&spec, "task")?,
      outputs: string_list(&spec, "outputs")?,
    };

    state.rules.borrow_mut().add(&rule).map_err(LuaError::external)
  })
}

/// Reads an optional list of strings from a rule field.
fn string_list(spec: &LuaTable, field: &str) -> LuaResult<Vec<String>> {
  match spec.get::<LuaValue>(field)? {
    LuaValue::Nil => Ok(Vec::new()),
    LuaValue::Table(items) => items
      .sequence_values::<LuaValue>()
      .enumerate()
      .map(|(i, item)| match item? {
        LuaValue::String(s) => match s.to_str() {
          Ok(text) => Ok(text.to_string()),
          Err(_) => Err(LuaError::external(format!(
            "rule field '{}' item {} is not valid UTF-8",
            field,
            i + 1
          ))),
        },
        other => Err(LuaError::external(format!(
          "rule field '{}' item {} must be a string, got {}",
          field,
          i + 1,
          other.type_name()
        ))),
      })
      .collect(),
    other => Err(LuaError::external(format!(
      "rule field '{}' must be a table, got {}",
      field,
      other.type_name()
    ))),
  }
}

fn script_dir(lua: &Lua) -> LuaResult<Vec<u8>> {
  let dir: Option<LuaString> = lua.globals().get(SCRIPT_DIR_GLOBAL)?;
  Ok(dir.map(|d| d.as_bytes().to_vec()).unwrap_or_default())
}

/// Joins `pattern` onto `dir`, keeping a leading `!` in front.
fn rebase(style: PathStyle, dir: &[u8], pattern: &[u8]) -> Vec<u8> {
  let (exclude, pattern) = match pattern.strip_prefix(b"!") {
    Some(rest) => (true, rest),
    None => (false, pattern),
  };

  let mut joined = dir.to_vec();
  style.join(&mut joined, pattern);
  if exclude {
    joined.insert(0, b'!');
  }
  joined
}
