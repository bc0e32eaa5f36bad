//! Names shared between the library, the binary and the scripts it runs.

pub const APP_NAME: &str = "bblua";

/// Environment variable naming the dependency channel descriptor.
pub const DEPS_ENV_VAR: &str = "BB_DEPS";

/// Global holding the directory of the running script.
pub const SCRIPT_DIR_GLOBAL: &str = "SCRIPT_DIR";
