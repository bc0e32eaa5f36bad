//! Terminal output for the few messages the binary prints itself.
//!
//! Rules go to standard output (or a file) untouched, so everything here
//! writes to standard error.

use owo_colors::{OwoColorize, Stream};

/// Prints `Error: <message>`, with the prefix in red when stderr supports it.
pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    "Error:".if_supports_color(Stream::Stderr, |s| s.red()),
    message
  );
}
