//! Various traits to help parsing of DNS messages.

use crate::bail;
use crate::errors::{truncated, Result};
use crate::name::read_name;
use byteorder::{ReadBytesExt, BE};
use std::io::Cursor;

/// Extensions to `Cursor<&[u8]>` for reading a DNS message.
///
/// Every read checks the remaining length first, so a message that is
/// shorter than its own headers claim fails with
/// [`crate::Error::TruncatedMessage`] instead of reading out of bounds.
pub trait DNSReadExt {
    /// Returns the number of bytes remaining to be consumed.
    fn remaining(&self) -> usize;

    /// Reads a (possibly compressed) domain name, and moves past it.
    ///
    /// The cursor only moves past the name's original occurrence, never to
    /// where a compression pointer led.
    fn read_qname(&mut self) -> Result<String>;

    /// Reads a big endian u16, naming `what` in any error.
    fn read_be_u16(&mut self, what: &str) -> Result<u16>;

    /// Reads a big endian u32, naming `what` in any error.
    fn read_be_u32(&mut self, what: &str) -> Result<u32>;

    /// Moves past `len` bytes without reading them.
    fn skip(&mut self, len: usize, what: &str) -> Result<()>;
}

impl<'a> DNSReadExt for Cursor<&'a [u8]> {
    fn remaining(&self) -> usize {
        let pos = self.position() as usize;
        self.get_ref().len().saturating_sub(pos)
    }

    fn read_qname(&mut self) -> Result<String> {
        let start = self.position() as usize;
        let (qname, len) = read_name(self.get_ref(), start)?;

        self.set_position((start + len) as u64);
        Ok(qname)
    }

    fn read_be_u16(&mut self, what: &str) -> Result<u16> {
        self.read_u16::<BE>().map_err(truncated(what))
    }

    fn read_be_u32(&mut self, what: &str) -> Result<u32> {
        self.read_u32::<BE>().map_err(truncated(what))
    }

    fn skip(&mut self, len: usize, what: &str) -> Result<()> {
        if len > self.remaining() {
            bail!(
                TruncatedMessage,
                "{} of {} bytes at offset {} runs past the end of the {} byte message",
                what,
                len,
                self.position(),
                self.get_ref().len()
            );
        }

        self.set_position(self.position() + len as u64);
        Ok(())
    }
}
