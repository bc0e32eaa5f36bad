//! Script-relative module loading.
//!
//! Rather than reimplementing `require`, we hook into `package.searchers[2]`
//! (the Lua file searcher) with a function that:
//! 1. Uses Lua's built-in `package.searchpath` for path resolution
//! 2. Reports the resolved file to the dependency channel as an input
//! 3. Leaves caching and `package.preload` to `require` itself
//!
//! The script's own directory is searched before the default path, so a
//! build script can `require` helpers that sit next to it regardless of the
//! working directory.

use std::fs;
use std::rc::Rc;

use mlua::prelude::*;
use tracing::debug;

use super::runtime::ScriptState;
use crate::path::{PathStyle, os};

/// Create the searcher installed as `package.searchers[2]`.
fn create_lua_searcher(lua: &Lua, state: Rc<ScriptState>) -> LuaResult<LuaFunction> {
  lua.create_function(move |lua, modname: LuaString| {
    let package: LuaTable = lua.globals().get("package")?;
    let path: LuaString = package.get("path")?;

    let searchpath: LuaFunction = package.get("searchpath")?;
    let (found, errmsg): (Option<LuaString>, Option<LuaString>) = searchpath.call((modname.clone(), path))?;

    let Some(file) = found else {
      // Not found: hand the accumulated search message back to require.
      return Ok((LuaValue::Nil, LuaValue::String(errmsg.unwrap_or(lua.create_string("")?))));
    };

    let file_bytes = file.as_bytes().to_vec();
    let file_path = os::to_path(&file_bytes);
    let source = fs::read(&file_path)
      .map_err(|e| LuaError::external(format!("cannot read '{}': {}", file_path.display(), e)))?;

    debug!(module = %modname.to_string_lossy(), file = %file_path.display(), "loading module");
    state.report_input(&file_bytes);

    let loader = lua
      .load(source)
      .set_name(format!("@{}", file_path.display()))
      .into_function()?;

    // require passes the file name on to the loader as its second argument.
    Ok((LuaValue::Function(loader), LuaValue::String(file)))
  })
}

/// Install the module searcher into the Lua runtime.
pub fn install_loaders(lua: &Lua, state: Rc<ScriptState>) -> LuaResult<()> {
  let package: LuaTable = lua.globals().get("package")?;
  let searchers: LuaTable = package.get("searchers")?;
  searchers.set(2, create_lua_searcher(lua, state)?)?;
  Ok(())
}

/// Put `dir/?.lua` and `dir/?/init.lua` in front of `package.path`.
pub fn prepend_search_dir(lua: &Lua, style: PathStyle, dir: &[u8]) -> LuaResult<()> {
  let package: LuaTable = lua.globals().get("package")?;
  let current: LuaString = package.get("path")?;

  let mut path = Vec::new();
  for template in [&b"?.lua"[..], b"?/init.lua"] {
    let mut entry = dir.to_vec();
    style.join(&mut entry, template);
    path.extend_from_slice(&entry);
    path.push(b';');
  }
  path.extend_from_slice(&current.as_bytes());

  package.set("path", lua.create_string(&path)?)
}
