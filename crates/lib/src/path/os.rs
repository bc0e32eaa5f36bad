//! Conversions between byte paths and OS paths.
//!
//! On Unix these are lossless. Elsewhere paths must round-trip through UTF-8,
//! so invalid sequences are replaced.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::Path;

#[cfg(unix)]
pub fn to_path(bytes: &[u8]) -> Cow<'_, Path> {
  use std::os::unix::ffi::OsStrExt;

  Cow::Borrowed(Path::new(OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
pub fn to_path(bytes: &[u8]) -> Cow<'_, Path> {
  match String::from_utf8_lossy(bytes) {
    Cow::Borrowed(s) => Cow::Borrowed(Path::new(s)),
    Cow::Owned(s) => Cow::Owned(s.into()),
  }
}

#[cfg(unix)]
pub fn os_str_bytes(s: &OsStr) -> Cow<'_, [u8]> {
  use std::os::unix::ffi::OsStrExt;

  Cow::Borrowed(s.as_bytes())
}

#[cfg(not(unix))]
pub fn os_str_bytes(s: &OsStr) -> Cow<'_, [u8]> {
  match s.to_string_lossy() {
    Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
    Cow::Owned(s) => Cow::Owned(s.into_bytes()),
  }
}

pub fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
  os_str_bytes(path.as_os_str())
}
