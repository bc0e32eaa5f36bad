//! Library-level integration tests: whole scripts run through `eval`.

mod common;
mod deps_tests;
mod glob_tests;
mod script_tests;
