//! Glob patterns: segment matching, directory walking and aggregation.

pub mod matcher;
pub mod set;
pub mod walker;

pub use matcher::{is_glob_pattern, is_recursive_glob};
pub use set::MatchSet;
pub use walker::{WalkEvent, Walker};

use crate::path::PathStyle;

/// Resolves `patterns` in order and returns the sorted result.
///
/// Patterns prefixed with `!` remove their matches from the result so far.
pub fn glob<I, P>(style: PathStyle, patterns: I) -> Vec<Vec<u8>>
where
  I: IntoIterator<Item = P>,
  P: AsRef<[u8]>,
{
  let walker = Walker::new(style);
  let mut set = MatchSet::new();
  for pattern in patterns {
    set.apply(&walker, pattern.as_ref());
  }
  set.into_vec()
}

/// Matches `text` against a single-segment pattern without touching the
/// filesystem.
pub fn glob_match(style: PathStyle, text: &[u8], pattern: &[u8]) -> bool {
  matcher::matches(style, text, pattern)
}
