//! Ordered include/exclude aggregation across many patterns.

use std::collections::BTreeSet;
use std::collections::btree_set;

use super::walker::{WalkEvent, Walker};

/// Sorted, deduplicated set of matched paths.
///
/// Patterns are applied in order: a pattern starting with `!` removes its
/// matches from what has been collected so far, anything else adds to it. An
/// exclusion therefore only affects patterns before it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
  paths: BTreeSet<Vec<u8>>,
}

impl MatchSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, path: impl Into<Vec<u8>>) -> bool {
    self.paths.insert(path.into())
  }

  pub fn remove(&mut self, path: &[u8]) -> bool {
    self.paths.remove(path)
  }

  pub fn contains(&self, path: &[u8]) -> bool {
    self.paths.contains(path)
  }

  pub fn len(&self) -> usize {
    self.paths.len()
  }

  pub fn is_empty(&self) -> bool {
    self.paths.is_empty()
  }

  pub fn iter(&self) -> btree_set::Iter<'_, Vec<u8>> {
    self.paths.iter()
  }

  pub fn into_vec(self) -> Vec<Vec<u8>> {
    self.paths.into_iter().collect()
  }

  /// Applies one pattern, which may be an exclusion.
  pub fn apply(&mut self, walker: &Walker, pattern: &[u8]) {
    self.apply_with(walker, pattern, &mut |_| {});
  }

  /// Like [`MatchSet::apply`], also calling `on_listed` for every directory
  /// read while resolving the pattern.
  pub fn apply_with(&mut self, walker: &Walker, pattern: &[u8], on_listed: &mut dyn FnMut(&[u8])) {
    let (exclude, pattern) = match pattern.strip_prefix(b"!") {
      Some(rest) => (true, rest),
      None => (false, pattern),
    };

    walker.walk(pattern, &mut |event| match event {
      WalkEvent::Match { path, .. } if exclude => {
        self.paths.remove(path);
      }
      WalkEvent::Match { path, .. } => {
        self.paths.insert(path.to_vec());
      }
      WalkEvent::Listed { dir } => on_listed(dir),
    });
  }
}

impl IntoIterator for MatchSet {
  type Item = Vec<u8>;
  type IntoIter = btree_set::IntoIter<Vec<u8>>;

  fn into_iter(self) -> Self::IntoIter {
    self.paths.into_iter()
  }
}

impl<'a> IntoIterator for &'a MatchSet {
  type Item = &'a Vec<u8>;
  type IntoIter = btree_set::Iter<'a, Vec<u8>>;

  fn into_iter(self) -> Self::IntoIter {
    self.paths.iter()
  }
}
