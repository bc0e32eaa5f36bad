use mlua::prelude::*;

use super::check_string;
use crate::path::PathStyle;

/// Create the `path` library table.
pub fn create_path_helpers(lua: &Lua, style: PathStyle) -> LuaResult<LuaTable> {
  let path = lua.create_table()?;

  // path.isabs(p)
  path.set(
    "isabs",
    lua.create_function(move |_, p: LuaString| Ok(style.is_absolute(&p.as_bytes())))?,
  )?;

  // path.join(...) - nil arguments are skipped, absolute ones restart the path
  path.set(
    "join",
    lua.create_function(move |lua, args: LuaMultiValue| {
      let mut buf = Vec::new();
      for (i, value) in args.into_iter().enumerate() {
        if value.is_nil() {
          continue;
        }
        let component = check_string(lua, value, i + 1, "join")?;
        style.join(&mut buf, &component.as_bytes());
      }
      lua.create_string(&buf)
    })?,
  )?;

  // path.split(p) -> head, tail
  path.set(
    "split",
    lua.create_function(move |lua, p: LuaString| {
      let bytes = p.as_bytes();
      let split = style.split(&bytes);
      Ok((lua.create_string(split.head)?, lua.create_string(split.tail)?))
    })?,
  )?;

  path.set(
    "basename",
    lua.create_function(move |lua, p: LuaString| lua.create_string(style.basename(&p.as_bytes())))?,
  )?;

  path.set(
    "dirname",
    lua.create_function(move |lua, p: LuaString| lua.create_string(style.dirname(&p.as_bytes())))?,
  )?;

  // path.splitext(p) -> root, ext
  path.set(
    "splitext",
    lua.create_function(move |lua, p: LuaString| {
      let bytes = p.as_bytes();
      let split = style.split_extension(&bytes);
      Ok((lua.create_string(split.head)?, lua.create_string(split.tail)?))
    })?,
  )?;

  path.set(
    "getext",
    lua.create_function(move |lua, p: LuaString| lua.create_string(style.extension(&p.as_bytes())))?,
  )?;

  path.set(
    "norm",
    lua.create_function(move |lua, p: LuaString| lua.create_string(style.normalize(&p.as_bytes())))?,
  )?;

  Ok(path)
}
