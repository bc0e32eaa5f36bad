//! Test utilities for bblua-lib.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// An in-memory writer whose contents stay readable after it has been moved
/// into something that owns it.
#[derive(Debug, Clone, Default)]
pub struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
  pub fn contents(&self) -> Vec<u8> {
    self.0.borrow().clone()
  }

  pub fn text(&self) -> String {
    String::from_utf8(self.contents()).unwrap()
  }
}

impl Write for SharedBuf {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.0.borrow_mut().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}
