//! Path algebra over byte slices.
//!
//! Paths are handled as raw bytes rather than [`std::path::Path`] so that
//! strings coming out of Lua scripts (which may not be valid UTF-8) can be
//! decomposed and joined without conversion. None of these functions touch
//! the filesystem.
//!
//! All operations are parameterised by a [`PathStyle`], which fixes the
//! separator set and case sensitivity. The style is chosen once at process
//! start (see [`PathStyle::native`]) and passed to every consumer.

pub mod os;

use std::cmp::Ordering;

/// Path style that determines separators and case sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathStyle {
  /// Forward slashes only, case-sensitive.
  Posix,
  /// Forward or back slashes, ASCII case-insensitive, `X:` drive prefixes.
  Windows,
}

/// A path broken into two borrowed halves.
///
/// For [`PathStyle::split`] these are the parent directory and the basename.
/// For [`PathStyle::split_extension`] they are the root and the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
  pub head: &'a [u8],
  pub tail: &'a [u8],
}

impl PathStyle {
  /// The style of the platform this binary was built for.
  pub const fn native() -> Self {
    if cfg!(windows) { Self::Windows } else { Self::Posix }
  }

  /// Separator inserted by [`PathStyle::join`].
  pub const fn default_sep(self) -> u8 {
    match self {
      Self::Posix => b'/',
      Self::Windows => b'\\',
    }
  }

  pub const fn case_sensitive(self) -> bool {
    matches!(self, Self::Posix)
  }

  pub const fn is_sep(self, c: u8) -> bool {
    match self {
      Self::Posix => c == b'/',
      Self::Windows => c == b'/' || c == b'\\',
    }
  }

  /// Byte equality following the style's case rules.
  pub fn eq_byte(self, a: u8, b: u8) -> bool {
    if self.case_sensitive() {
      a == b
    } else {
      a.eq_ignore_ascii_case(&b)
    }
  }

  /// Maps a byte to the value used for ordering. Every separator folds to `/`.
  fn fold(self, c: u8) -> u8 {
    if self.is_sep(c) {
      b'/'
    } else if self.case_sensitive() {
      c
    } else {
      c.to_ascii_lowercase()
    }
  }

  /// Returns true if the path starts at a root.
  pub fn is_absolute(self, path: &[u8]) -> bool {
    if path.first().is_some_and(|&c| self.is_sep(c)) {
      return true;
    }

    self == Self::Windows && path.len() > 2 && path[1] == b':' && self.is_sep(path[2])
  }

  /// Splits a path into its parent directory and basename.
  ///
  /// The tail never contains a separator. Trailing separators are trimmed from
  /// the head, except that a rooted path keeps its separator prefix (`/foo`
  /// splits into `/` and `foo`).
  pub fn split(self, path: &[u8]) -> Split<'_> {
    let tail_start = self.basename_start(path);

    let mut head_end = tail_start;
    while head_end > 0 && self.is_sep(path[head_end - 1]) {
      head_end -= 1;
    }

    if head_end == 0 {
      head_end = tail_start;
    }

    Split {
      head: &path[..head_end],
      tail: &path[tail_start..],
    }
  }

  pub fn dirname(self, path: &[u8]) -> &[u8] {
    self.split(path).head
  }

  pub fn basename(self, path: &[u8]) -> &[u8] {
    self.split(path).tail
  }

  /// Splits a path into a root and an extension such that `root ++ ext`
  /// reproduces the input.
  ///
  /// Leading dots in the basename belong to the stem, so `.bashrc` has no
  /// extension and `..tar.gz` splits into `..tar` and `.gz`.
  pub fn split_extension(self, path: &[u8]) -> Split<'_> {
    let mut base = self.basename_start(path);

    while base < path.len() && path[base] == b'.' {
      base += 1;
    }

    while base < path.len() && path[base] != b'.' {
      base += 1;
    }

    Split {
      head: &path[..base],
      tail: &path[base..],
    }
  }

  pub fn extension(self, path: &[u8]) -> &[u8] {
    self.split_extension(path).tail
  }

  /// Appends `component` to `buf`.
  ///
  /// An absolute component replaces whatever has been accumulated. Otherwise a
  /// single separator is added when the buffer is non-empty and does not
  /// already end in one. Only the last byte of the buffer is inspected.
  pub fn join(self, buf: &mut Vec<u8>, component: &[u8]) {
    if self.is_absolute(component) {
      buf.clear();
    } else if buf.last().is_some_and(|&c| !self.is_sep(c)) {
      buf.push(self.default_sep());
    }

    buf.extend_from_slice(component);
  }

  /// Folds [`PathStyle::join`] over a sequence of components.
  pub fn join_all<I, C>(self, components: I) -> Vec<u8>
  where
    I: IntoIterator<Item = C>,
    C: AsRef<[u8]>,
  {
    let mut buf = Vec::new();
    for component in components {
      self.join(&mut buf, component.as_ref());
    }
    buf
  }

  /// Lexicographic comparison where all separators are equal to each other
  /// and, for the Windows style, letters compare case-insensitively.
  pub fn compare(self, a: &[u8], b: &[u8]) -> Ordering {
    a.iter()
      .map(|&c| self.fold(c))
      .cmp(b.iter().map(|&c| self.fold(c)))
  }

  /// Path normalization is deliberately a pass-through: `.` and `..`
  /// segments are left exactly as written.
  pub fn normalize(self, path: &[u8]) -> &[u8] {
    path
  }

  fn basename_start(self, path: &[u8]) -> usize {
    path
      .iter()
      .rposition(|&c| self.is_sep(c))
      .map_or(0, |i| i + 1)
  }
}

impl Default for PathStyle {
  fn default() -> Self {
    Self::native()
  }
}
