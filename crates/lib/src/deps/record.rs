//! Binary encoding of dependency records.
//!
//! Each record is a fixed 44-byte header in host byte order followed by the
//! raw name bytes:
//!
//! | Offset | Size | Field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 2    | flags: bit 0 output, bits 1..16 kind    |
//! | 2      | 2    | name length                             |
//! | 4      | 8    | timestamp, 0 when unknown               |
//! | 12     | 32   | checksum, all zero when unknown         |
//! | 44     | len  | name                                    |
//!
//! The header has no padding. Records are written back to back with no
//! framing beyond the length field.

use std::borrow::Cow;
use std::io::{self, Read, Write};

use thiserror::Error;

pub const HEADER_LEN: usize = 44;

/// Longest name a record can carry. Longer names are truncated.
pub const MAX_NAME_LEN: usize = u16::MAX as usize;

/// Largest kind tag that fits next to the output flag.
pub const MAX_KIND: u16 = 0x7fff;

pub const CHECKSUM_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum DecodeError {
  #[error("record truncated: need {needed} bytes, have {available}")]
  Truncated { needed: usize, available: usize },

  #[error("failed to read record: {0}")]
  Io(#[from] io::Error),
}

/// A single file reported to the parent build process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency<'a> {
  /// True if the script produces the file, false if it consumes it.
  pub output: bool,
  pub kind: u16,
  pub timestamp: u64,
  pub checksum: [u8; CHECKSUM_LEN],
  pub name: Cow<'a, [u8]>,
}

impl<'a> Dependency<'a> {
  pub fn input(name: impl Into<Cow<'a, [u8]>>) -> Self {
    Self::new(false, name)
  }

  pub fn output(name: impl Into<Cow<'a, [u8]>>) -> Self {
    Self::new(true, name)
  }

  fn new(output: bool, name: impl Into<Cow<'a, [u8]>>) -> Self {
    Self {
      output,
      kind: 0,
      timestamp: 0,
      checksum: [0; CHECKSUM_LEN],
      name: name.into(),
    }
  }

  /// The name as it will be written, truncated to [`MAX_NAME_LEN`].
  pub fn wire_name(&self) -> &[u8] {
    &self.name[..self.name.len().min(MAX_NAME_LEN)]
  }

  pub fn encoded_len(&self) -> usize {
    HEADER_LEN + self.wire_name().len()
  }

  pub fn header(&self) -> [u8; HEADER_LEN] {
    let flags = u16::from(self.output) | ((self.kind & MAX_KIND) << 1);
    // wire_name is at most u16::MAX long
    let len = self.wire_name().len() as u16;

    let mut header = [0u8; HEADER_LEN];
    header[0..2].copy_from_slice(&flags.to_ne_bytes());
    header[2..4].copy_from_slice(&len.to_ne_bytes());
    header[4..12].copy_from_slice(&self.timestamp.to_ne_bytes());
    header[12..].copy_from_slice(&self.checksum);
    header
  }

  /// Writes the header and name as one record.
  pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
    out.write_all(&self.header())?;
    out.write_all(self.wire_name())
  }

  pub fn to_bytes(&self) -> Vec<u8> {
    let mut buf = Vec::with_capacity(self.encoded_len());
    buf.extend_from_slice(&self.header());
    buf.extend_from_slice(self.wire_name());
    buf
  }

  pub fn into_owned(self) -> Dependency<'static> {
    Dependency {
      output: self.output,
      kind: self.kind,
      timestamp: self.timestamp,
      checksum: self.checksum,
      name: Cow::Owned(self.name.into_owned()),
    }
  }

  /// Decodes the record at the start of `bytes`, returning it along with the
  /// number of bytes consumed.
  pub fn decode(bytes: &[u8]) -> Result<(Dependency<'static>, usize), DecodeError> {
    let header: &[u8; HEADER_LEN] = bytes
      .get(..HEADER_LEN)
      .and_then(|h| h.try_into().ok())
      .ok_or(DecodeError::Truncated {
        needed: HEADER_LEN,
        available: bytes.len(),
      })?;

    let (mut dep, len) = Self::parse_header(header);
    let end = HEADER_LEN + len;
    let name = bytes.get(HEADER_LEN..end).ok_or(DecodeError::Truncated {
      needed: end,
      available: bytes.len(),
    })?;

    dep.name = Cow::Owned(name.to_vec());
    Ok((dep, end))
  }

  /// Reads the next record from `reader`.
  ///
  /// Returns `Ok(None)` at a clean end of stream. A stream that ends partway
  /// through a record is an error.
  pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Option<Dependency<'static>>, DecodeError> {
    let mut header = [0u8; HEADER_LEN];
    let read = read_full(reader, &mut header)?;
    if read == 0 {
      return Ok(None);
    }
    if read < HEADER_LEN {
      return Err(DecodeError::Truncated {
        needed: HEADER_LEN,
        available: read,
      });
    }

    let (mut dep, len) = Self::parse_header(&header);
    let mut name = vec![0u8; len];
    let read = read_full(reader, &mut name)?;
    if read < len {
      return Err(DecodeError::Truncated {
        needed: HEADER_LEN + len,
        available: HEADER_LEN + read,
      });
    }

    dep.name = Cow::Owned(name);
    Ok(Some(dep))
  }

  fn parse_header(header: &[u8; HEADER_LEN]) -> (Dependency<'static>, usize) {
    let flags = u16::from_ne_bytes([header[0], header[1]]);
    let len = u16::from_ne_bytes([header[2], header[3]]);
    let mut timestamp = [0u8; 8];
    timestamp.copy_from_slice(&header[4..12]);
    let mut checksum = [0u8; CHECKSUM_LEN];
    checksum.copy_from_slice(&header[12..]);

    let dep = Dependency {
      output: flags & 1 == 1,
      kind: flags >> 1,
      timestamp: u64::from_ne_bytes(timestamp),
      checksum,
      name: Cow::Borrowed(&[]),
    };
    (dep, usize::from(len))
  }
}

/// Fills `buf` as far as the reader allows, returning the number of bytes read.
fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
  let mut filled = 0;
  while filled < buf.len() {
    match reader.read(&mut buf[filled..]) {
      Ok(0) => break,
      Ok(n) => filled += n,
      Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
      Err(e) => return Err(e),
    }
  }
  Ok(filled)
}
