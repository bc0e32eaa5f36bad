//! bblua-lib: the pieces of the `bblua` build script front end.
//!
//! - [`path`]: path algebra over byte strings
//! - [`glob`]: pattern matching and directory walking
//! - [`deps`]: binary dependency reporting to a parent build process
//! - [`rules`]: the JSON rule stream
//! - [`lua`]: the script environment
//! - [`eval`]: running a script end to end

pub mod consts;
pub mod deps;
pub mod eval;
pub mod glob;
pub mod lua;
pub mod path;
pub mod rules;
pub mod util;
