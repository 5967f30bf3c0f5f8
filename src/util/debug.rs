use alloc::{format, string::String};
use core::fmt::{Debug, Display, Formatter, Write};

/// A container for `&[u8]` that formats itself as a hex dump on output via
/// [`Debug`] and [`Display`].
pub(crate) struct HexDump<'a>(pub &'a [u8]);

impl<'a> Display for HexDump<'a> {
  fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
    Debug::fmt(self, f)
  }
}

impl<'a> Debug for HexDump<'a> {
  fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
    let mut b = f.debug_struct("[u8]");
    let mut line = String::with_capacity(100);
    let mut start = 0usize;

    for (count, &byte) in self.0.iter().enumerate() {
      // End of line
      if (count % 32) == 0 && count != 0 {
        let linenum = format!("{:04X?}", start);
        b.field(linenum.as_str(), &line.as_str());
        start += 32;
        line.clear();
      }
      if (count % 8) == 0 && count != start {
        write!(&mut line, " ")?;
      }
      if (count % 4) == 0 && count != start {
        write!(&mut line, " ")?;
      }
      write!(&mut line, "{:02X?}", byte)?;
    }
    // Last remaining line
    if !line.is_empty() {
      let linenum = format!("{:04X?}", start);
      b.field(linenum.as_str(), &line.as_str());
    }

    b.finish()
  }
}

/// Hex dump for short (i.e., single-line) byte strings.
///
/// The output will be a continuous string of hex digits, interleaved by a `:`
/// character every `self.1` bytes.
pub(crate) struct ShortHexDump<'a>(pub &'a [u8], pub usize);

impl<'a> Debug for ShortHexDump<'a> {
  fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
    for (i, byte) in self.0.iter().enumerate() {
      if self.1 != 0 && i != 0 && (i % self.1) == 0 {
        write!(f, ":")?;
      }
      write!(f, "{:02X}", byte)?;
    }
    Ok(())
  }
}

impl<'a> Display for ShortHexDump<'a> {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    Debug::fmt(self, f)
  }
}

/// Formats a byte string as a [`ShortHexDump`] when it is short, and as a
/// multi-line [`HexDump`] otherwise.
pub(crate) struct BytesDump<'a>(pub &'a [u8]);

impl<'a> Debug for BytesDump<'a> {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    if self.0.len() <= 32 {
      write!(f, "Bytes({:?})", ShortHexDump(self.0, 4))
    } else {
      Debug::fmt(&HexDump(self.0), f)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn short_hex_dump() {
    let bytes = [0xDEu8, 0xAD, 0xBE, 0xEF, 0x01];
    assert_eq!(format!("{:?}", ShortHexDump(&bytes, 2)), "DEAD:BEEF:01");
    assert_eq!(format!("{}", ShortHexDump(&bytes, 0)), "DEADBEEF01");
    assert_eq!(format!("{:?}", BytesDump(&bytes[..2])), "Bytes(DEAD)");
  }
}
