//! The write side of the dependency channel.
//!
//! A parent build process that wants to learn which files a script touched
//! passes an open, writable file descriptor and names it in `BB_DEPS`. When
//! the variable is missing or does not name a usable descriptor the sender is
//! inert and every send is a no-op.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use tracing::{debug, warn};

use super::record::Dependency;
use crate::consts::DEPS_ENV_VAR;

/// Sends dependency records to the parent process, if there is one.
pub struct DepSender<W: Write = BufWriter<File>> {
  out: Option<W>,
}

impl DepSender {
  /// Attaches to the descriptor named by `BB_DEPS`.
  pub fn from_env() -> Self {
    Self::from_var(std::env::var(DEPS_ENV_VAR).ok().as_deref())
  }

  /// Attaches to the descriptor named by `value`, the contents of `BB_DEPS`.
  ///
  /// The value must be a positive decimal descriptor number that is open for
  /// writing. On success the descriptor is switched to append mode and owned
  /// by the sender, which closes it when dropped.
  pub fn from_var(value: Option<&str>) -> Self {
    let Some(value) = value else {
      debug!("{} not set, dependency reporting disabled", DEPS_ENV_VAR);
      return Self::inert();
    };

    let fd = match value.trim().parse::<i32>() {
      Ok(fd) if fd > 0 => fd,
      _ => {
        warn!(value, "ignoring invalid {} value", DEPS_ENV_VAR);
        return Self::inert();
      }
    };

    match attach(fd) {
      Ok(file) => {
        debug!(fd, "dependency reporting enabled");
        Self::with_writer(BufWriter::new(file))
      }
      Err(err) => {
        warn!(fd, error = %err, "cannot report dependencies");
        Self::inert()
      }
    }
  }
}

impl<W: Write> DepSender<W> {
  pub fn with_writer(out: W) -> Self {
    Self { out: Some(out) }
  }

  pub fn inert() -> Self {
    Self { out: None }
  }

  /// True if records are being delivered somewhere.
  pub fn has_parent(&self) -> bool {
    self.out.is_some()
  }

  pub fn send(&mut self, dep: &Dependency<'_>) -> io::Result<()> {
    match self.out.as_mut() {
      Some(out) => dep.write_to(out),
      None => Ok(()),
    }
  }

  pub fn send_input(&mut self, name: &[u8]) -> io::Result<()> {
    self.send(&Dependency::input(name))
  }

  pub fn send_output(&mut self, name: &[u8]) -> io::Result<()> {
    self.send(&Dependency::output(name))
  }

  pub fn flush(&mut self) -> io::Result<()> {
    match self.out.as_mut() {
      Some(out) => out.flush(),
      None => Ok(()),
    }
  }

  /// Returns the underlying writer, or `None` for an inert sender.
  pub fn into_inner(mut self) -> Option<W> {
    self.out.take()
  }

  /// Erases the writer type.
  pub fn boxed(self) -> DepSender<Box<dyn Write>>
  where
    W: 'static,
  {
    match self.into_inner() {
      Some(out) => DepSender::with_writer(Box::new(out)),
      None => DepSender::inert(),
    }
  }
}

impl<W: Write> Drop for DepSender<W> {
  fn drop(&mut self) {
    if let Err(err) = self.flush() {
      warn!(error = %err, "failed to flush dependency records");
    }
  }
}

impl<W: Write> std::fmt::Debug for DepSender<W> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("DepSender").field("has_parent", &self.has_parent()).finish()
  }
}

#[cfg(unix)]
fn attach(fd: i32) -> io::Result<File> {
  use rustix::fs::{OFlags, fcntl_getfl, fcntl_setfl};
  use std::os::fd::{BorrowedFd, FromRawFd, OwnedFd};

  let to_io = |e: rustix::io::Errno| io::Error::from_raw_os_error(e.raw_os_error());

  // SAFETY: `fd` was checked to be positive, so it is never the -1 niche.
  // Whether it is open is unknown until fcntl answers; the borrow is only
  // passed to fcntl, which reports EBADF for a closed number, and it does
  // not outlive this function. Ownership is taken only after that check.
  let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
  let flags = fcntl_getfl(borrowed).map_err(to_io)?;

  let mode = flags & OFlags::RWMODE;
  if mode != OFlags::WRONLY && mode != OFlags::RDWR {
    return Err(io::Error::new(
      io::ErrorKind::PermissionDenied,
      "descriptor is not open for writing",
    ));
  }

  fcntl_setfl(borrowed, (flags - OFlags::RWMODE) | OFlags::APPEND).map_err(to_io)?;

  // SAFETY: the descriptor is open and was handed to this process for
  // exclusive use by the parent; nothing else in the process closes it.
  let owned = unsafe { OwnedFd::from_raw_fd(fd) };
  Ok(File::from(owned))
}

#[cfg(not(unix))]
fn attach(_fd: i32) -> io::Result<File> {
  Err(io::Error::new(
    io::ErrorKind::Unsupported,
    "descriptor inheritance is not supported on this platform",
  ))
}
