//! Single-segment glob matching.
//!
//! Supported syntax:
//! - `?` matches exactly one byte
//! - `*` matches zero or more bytes
//! - `[abc]` matches any listed byte, `[!abc]` any byte not listed
//!
//! Class members are literal bytes: there are no ranges, so `[a-c]` matches
//! `a`, `-` or `c`. A class without a closing `]` never matches.
//!
//! Matching never treats separators specially; a pattern is expected to
//! describe one path segment. `*` is matched by plain backtracking, which is
//! exponential in the worst case for patterns with many stars
//! (`*a*a*a*...`). Patterns in build scripts are short, so no memoisation is
//! done.

use crate::path::PathStyle;

/// Returns true if `pattern` matches the whole of `candidate`.
pub fn matches(style: PathStyle, candidate: &[u8], pattern: &[u8]) -> bool {
  let mut i = 0;
  let mut j = 0;

  while j < pattern.len() {
    match pattern[j] {
      b'?' => {
        if i == candidate.len() {
          return false;
        }
        i += 1;
      }

      b'*' => {
        let rest = &pattern[j + 1..];
        if rest.is_empty() {
          return true;
        }

        return (i..=candidate.len()).any(|k| matches(style, &candidate[k..], rest));
      }

      b'[' => {
        let Some(&c) = candidate.get(i) else {
          return false;
        };

        let Some((class, negated, end)) = parse_class(&pattern[j + 1..]) else {
          return false;
        };

        let found = class.iter().any(|&m| style.eq_byte(c, m));
        if found == negated {
          return false;
        }

        i += 1;
        j += end;
      }

      literal => {
        if i == candidate.len() || !style.eq_byte(candidate[i], literal) {
          return false;
        }
        i += 1;
      }
    }

    j += 1;
  }

  i == candidate.len()
}

/// Parses the body of a character class (the bytes after `[`).
///
/// Returns the member bytes, whether the class is negated, and the offset of
/// the closing `]` relative to the opening `[`.
fn parse_class(body: &[u8]) -> Option<(&[u8], bool, usize)> {
  let negated = body.first() == Some(&b'!');
  let start = usize::from(negated);

  if start == body.len() {
    return None;
  }

  let close = body[start..].iter().position(|&c| c == b']')? + start;
  Some((&body[start..close], negated, close + 1))
}

/// Returns true if the segment contains any wildcard byte.
pub fn is_glob_pattern(segment: &[u8]) -> bool {
  segment.iter().any(|c| matches!(c, b'?' | b'*' | b'['))
}

/// Returns true if the segment is exactly the recursive marker `**`.
pub fn is_recursive_glob(segment: &[u8]) -> bool {
  segment == b"**"
}
