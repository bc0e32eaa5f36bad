//! Lua libraries exposed to build scripts, plus argument checking helpers.

pub mod path;

use mlua::prelude::*;

/// Builds the error Lua's own library functions raise for a wrong argument.
pub fn bad_argument(position: usize, func: &str, expected: &str, got: &str) -> LuaError {
  LuaError::external(format!(
    "bad argument #{} to '{}' ({} expected, got {})",
    position, func, expected, got
  ))
}

/// Accepts a string, or a number coerced to one, the way `luaL_checklstring`
/// does.
pub fn check_string(lua: &Lua, value: LuaValue, position: usize, func: &str) -> LuaResult<LuaString> {
  let got = value.type_name();
  match value {
    LuaValue::String(s) => Ok(s),
    LuaValue::Integer(_) | LuaValue::Number(_) => lua
      .coerce_string(value)?
      .ok_or_else(|| bad_argument(position, func, "string", got)),
    _ => Err(bad_argument(position, func, "string", got)),
  }
}
