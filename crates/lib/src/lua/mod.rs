//! The embedded Lua environment that build scripts run in.
//!
//! # Submodules
//!
//! - [`globals`] - `glob()`, `rule{}`, `string.glob` and the `path` library
//! - [`helpers`] - Lua libraries and argument checking shared by the globals
//! - [`loaders`] - Script-relative `require` that reports loaded modules
//! - [`runtime`] - VM setup, per-run state and script execution

pub mod globals;
pub mod helpers;
pub mod loaders;
pub mod runtime;
