use std::cell::RefCell;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

use mlua::prelude::*;
use tracing::{debug, warn};

use crate::consts::SCRIPT_DIR_GLOBAL;
use crate::deps::DepSender;
use crate::lua::{globals, loaders};
use crate::path::{PathStyle, os};
use crate::rules::RuleWriter;

/// Everything a running script writes to, shared with the Lua callbacks.
pub struct ScriptState {
  pub style: PathStyle,
  pub rules: RefCell<RuleWriter<Box<dyn Write>>>,
  pub deps: RefCell<DepSender<Box<dyn Write>>>,
}

impl ScriptState {
  pub fn new(style: PathStyle, rules: RuleWriter<Box<dyn Write>>, deps: DepSender<Box<dyn Write>>) -> Self {
    Self {
      style,
      rules: RefCell::new(rules),
      deps: RefCell::new(deps),
    }
  }

  /// Reports a file the script read. Failures are logged and otherwise
  /// ignored.
  pub fn report_input(&self, name: &[u8]) {
    if let Err(err) = self.deps.borrow_mut().send_input(name) {
      warn!(name = %String::from_utf8_lossy(name), error = %err, "failed to report input");
    }
  }

  /// Reports a file the script produced.
  pub fn report_output(&self, name: &[u8]) {
    if let Err(err) = self.deps.borrow_mut().send_output(name) {
      warn!(name = %String::from_utf8_lossy(name), error = %err, "failed to report output");
    }
  }
}

/// Create a new Lua runtime with the build script globals registered.
///
/// Only the safe standard libraries are loaded and loading C modules is
/// disabled. `require` resolves Lua files through [`loaders`].
pub fn create_runtime(state: Rc<ScriptState>) -> LuaResult<Lua> {
  let lua = Lua::new();

  globals::register_globals(&lua, state.clone())?;
  loaders::install_loaders(&lua, state)?;

  Ok(lua)
}

/// Run a script's source with `args` as its varargs (`...`).
///
/// `SCRIPT_DIR` is set to the script's directory first, the module search
/// path is extended with that directory, and the script itself is reported
/// as an input.
pub fn run_script(lua: &Lua, state: &ScriptState, script: &Path, source: &[u8], args: &[String]) -> LuaResult<()> {
  let script_bytes = os::path_bytes(script);
  let dir = state.style.dirname(&script_bytes);

  lua.globals().set(SCRIPT_DIR_GLOBAL, lua.create_string(dir)?)?;
  loaders::prepend_search_dir(lua, state.style, dir)?;
  state.report_input(&script_bytes);

  debug!(script = %script.display(), args = args.len(), "running script");

  lua
    .load(source)
    .set_name(format!("@{}", script.display()))
    .call::<()>(LuaVariadic::from_iter(args.iter().cloned()))
}
