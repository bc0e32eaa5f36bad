//! Resolving glob patterns against the filesystem.
//!
//! A pattern is resolved from the outside in. It is split into a head
//! (everything up to the last separator) and a tail (the last segment):
//!
//! 1. If the head contains a wildcard, the head is resolved first and the tail
//!    is then resolved inside every directory the head produced, recursively
//!    when it is `**`. This is how `src/*/test`, `src/*/**` and `a/**/*.txt`
//!    work.
//! 2. If the tail is `**`, the head directory and everything below it is
//!    produced in depth-first pre-order.
//! 3. If only the tail contains a wildcard, the head directory is listed and
//!    entries matching the tail are produced.
//! 4. Otherwise the pattern is literal and produced as-is, without checking
//!    that it exists.
//!
//! Directories that cannot be read produce nothing. Globbing never fails.
//!
//! Symlinks are reported but never descended, so cycles cannot occur. The
//! recursion for `**` is bounded only by the depth of the directory tree.

use std::fs;

use tracing::{debug, trace};

use super::matcher::{is_glob_pattern, is_recursive_glob, matches};
use crate::path::{PathStyle, os};

/// Something observed while resolving a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEvent<'a> {
  /// A path produced by the pattern.
  Match { path: &'a [u8], is_dir: bool },
  /// A directory whose listing was read. The current directory is reported
  /// as `.`.
  Listed { dir: &'a [u8] },
}

/// A directory entry, reduced to what matching needs.
#[derive(Debug)]
struct Entry {
  name: Vec<u8>,
  is_dir: bool,
}

/// Resolves glob patterns for one path style.
#[derive(Debug, Clone, Copy, Default)]
pub struct Walker {
  style: PathStyle,
}

impl Walker {
  pub fn new(style: PathStyle) -> Self {
    Self { style }
  }

  pub fn style(&self) -> PathStyle {
    self.style
  }

  /// Resolves `pattern`, reporting every match and listed directory to `visit`.
  pub fn walk(&self, pattern: &[u8], visit: &mut dyn FnMut(WalkEvent<'_>)) {
    let split = self.style.split(pattern);

    if is_glob_pattern(split.head) {
      let tail = split.tail;
      let recursive = is_recursive_glob(tail);
      self.walk(split.head, &mut |event| match event {
        WalkEvent::Match { path, is_dir: true } if recursive => {
          let mut buf = path.to_vec();
          self.walk_recursive(&mut buf, visit);
        }
        WalkEvent::Match { path, is_dir: true } => self.walk_dir(path, tail, visit),
        WalkEvent::Match { is_dir: false, .. } => {}
        listed @ WalkEvent::Listed { .. } => visit(listed),
      });
    } else if is_recursive_glob(split.tail) {
      let mut buf = split.head.to_vec();
      self.walk_recursive(&mut buf, visit);
    } else if is_glob_pattern(split.tail) {
      self.walk_dir(split.head, split.tail, visit);
    } else if !split.tail.is_empty() {
      visit(WalkEvent::Match {
        path: pattern,
        is_dir: false,
      });
    } else {
      visit(WalkEvent::Match {
        path: split.head,
        is_dir: true,
      });
    }
  }

  /// Collects the matches of a single pattern, in the order they were found.
  pub fn collect(&self, pattern: &[u8]) -> Vec<Vec<u8>> {
    let mut found = Vec::new();
    self.walk(pattern, &mut |event| {
      if let WalkEvent::Match { path, .. } = event {
        found.push(path.to_vec());
      }
    });
    found
  }

  /// Produces the entries of `dir` whose names match `pattern`.
  ///
  /// An empty pattern produces `dir` itself, joined with an empty component.
  fn walk_dir(&self, dir: &[u8], pattern: &[u8], visit: &mut dyn FnMut(WalkEvent<'_>)) {
    let mut buf = dir.to_vec();

    if pattern.is_empty() {
      self.style.join(&mut buf, pattern);
      visit(WalkEvent::Match {
        path: &buf,
        is_dir: true,
      });
      return;
    }

    let Some(entries) = self.read_dir(dir, visit) else {
      return;
    };

    for entry in entries {
      if !matches(self.style, &entry.name, pattern) {
        continue;
      }

      self.style.join(&mut buf, &entry.name);
      visit(WalkEvent::Match {
        path: &buf,
        is_dir: entry.is_dir,
      });
      buf.truncate(dir.len());
    }
  }

  /// Produces `buf` and everything beneath it, depth first.
  fn walk_recursive(&self, buf: &mut Vec<u8>, visit: &mut dyn FnMut(WalkEvent<'_>)) {
    let Some(entries) = self.read_dir(buf, visit) else {
      return;
    };

    // `**` matches zero directories too, so the starting point is included.
    visit(WalkEvent::Match {
      path: buf,
      is_dir: true,
    });

    self.descend(buf, entries, visit);
  }

  /// Produces each entry under `buf`, recursing into directories.
  ///
  /// `buf` is extended for each entry and restored to its original length
  /// afterwards.
  fn descend(&self, buf: &mut Vec<u8>, entries: Vec<Entry>, visit: &mut dyn FnMut(WalkEvent<'_>)) {
    let len = buf.len();

    for entry in entries {
      self.style.join(buf, &entry.name);
      visit(WalkEvent::Match {
        path: buf,
        is_dir: entry.is_dir,
      });

      if entry.is_dir
        && let Some(children) = self.read_dir(buf, visit)
      {
        self.descend(buf, children, visit);
      }

      buf.truncate(len);
    }
  }

  /// Reads a directory listing sorted by name, or `None` if it can't be opened.
  fn read_dir(&self, dir: &[u8], visit: &mut dyn FnMut(WalkEvent<'_>)) -> Option<Vec<Entry>> {
    let dir: &[u8] = if dir.is_empty() { b"." } else { dir };
    let path = os::to_path(dir);

    let reader = match fs::read_dir(&path) {
      Ok(reader) => reader,
      Err(err) => {
        debug!(dir = %path.display(), error = %err, "skipping unreadable directory");
        return None;
      }
    };

    let mut entries: Vec<Entry> = reader
      .filter_map(|entry| match entry {
        Ok(entry) => Some(entry),
        Err(err) => {
          debug!(dir = %path.display(), error = %err, "skipping unreadable entry");
          None
        }
      })
      .map(|entry| Entry {
        name: os::os_str_bytes(&entry.file_name()).into_owned(),
        is_dir: entry.file_type().is_ok_and(|t| t.is_dir()),
      })
      .collect();
    entries.sort_unstable_by(|a, b| a.name.cmp(&b.name));

    trace!(dir = %path.display(), entries = entries.len(), "listed directory");
    visit(WalkEvent::Listed { dir });

    Some(entries)
  }
}
