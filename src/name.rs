//! Wire format domain names.
//!
//! A name is written as a sequence of labels, each preceded by a one octet
//! length, and terminated by a zero length label:
//!
//! ```text
//! www.example.com -> \x03www\x07example\x03com\x00
//! ```
//!
//! Inside a message a name (or the tail of one) may instead be a two octet
//! compression pointer, whose top two bits are set and whose remaining 14 bits
//! are an offset from the start of the message. See [rfc1035#section-4.1.4].
//!
//! [rfc1035#section-4.1.4]: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.4

use crate::bail;
use crate::errors::Result;
use log::trace;
use std::fmt::Write;

/// Restricts the length of a domain label to 63 characters. [RFC1035]
pub const MAX_LABEL_LEN: usize = 63;

/// Restricts the length of a name on the wire, including every length octet
/// and the terminating zero. [RFC1035]
pub const MAX_NAME_LEN: usize = 255;

/// Most compression pointers followed while decoding a single name.
pub const MAX_POINTERS: usize = 128;

const POINTER: u8 = 0b1100_0000;

/// Encodes a dotted hostname, e.g. `www.example.com`, into wire format labels.
///
/// Empty segments are skipped, so a fully qualified `example.com.` encodes the
/// same as `example.com`.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidName`] if the hostname is empty, not ASCII,
/// has a label longer than 63 octets, or would be longer than 255 octets on
/// the wire.
pub fn encode_name(hostname: &str) -> Result<Vec<u8>> {
    if !hostname.is_ascii() {
        bail!(InvalidName, "'{}' is not valid ascii", hostname);
    }

    let mut buf = Vec::with_capacity(hostname.len() + 2);

    for label in hostname.split('.').filter(|label| !label.is_empty()) {
        if label.len() > MAX_LABEL_LEN {
            bail!(
                InvalidName,
                "label '{}' longer than {} characters",
                label,
                MAX_LABEL_LEN
            );
        }

        buf.push(label.len() as u8);
        buf.extend_from_slice(label.as_bytes());
    }

    if buf.is_empty() {
        bail!(InvalidName, "'{}' does not contain any labels", hostname);
    }

    // The zero length root label ends every name.
    buf.push(0);

    if buf.len() > MAX_NAME_LEN {
        bail!(
            InvalidName,
            "'{}' is {} bytes when encoded, longer than {}",
            hostname,
            buf.len(),
            MAX_NAME_LEN
        );
    }

    Ok(buf)
}

/// Appends the wire format of `hostname` to `buf`. On error `buf` is left
/// unchanged.
pub fn write_name(buf: &mut Vec<u8>, hostname: &str) -> Result<()> {
    buf.extend_from_slice(&encode_name(hostname)?);
    Ok(())
}

/// Decodes the name starting at `start` within the message `buf`.
///
/// Returns the dotted name (without a trailing dot, or `.` for the root) and
/// the number of octets the name occupies at `start`. When the name ends in a
/// compression pointer, that count stops after the pointer, so the caller can
/// continue reading the message from `start + len` regardless of where the
/// pointer led.
///
/// Label octets outside printable ASCII, and literal `.` or `\` inside a
/// label, are written with the usual `\DDD` and `\.` escapes.
///
/// # Errors
///
/// Returns [`crate::Error::MalformedName`] if more than [`MAX_POINTERS`]
/// pointers are followed (which catches pointer cycles), if the decoded name
/// grows past [`MAX_NAME_LEN`], or if a reserved label type is found.
/// Returns [`crate::Error::TruncatedMessage`] if a label or pointer runs past
/// the end of `buf`.
pub fn read_name(buf: &[u8], start: usize) -> Result<(String, usize)> {
    let mut name = String::new();
    let mut pos = start;

    // Where the name ended at its original location, set by the first pointer.
    let mut jumped_from: Option<usize> = None;
    let mut pointers = 0;

    // Octets of labels seen so far, counting their length prefixes.
    let mut wire_len = 0;

    let end = loop {
        let len = match buf.get(pos) {
            Some(len) => *len,
            None => bail!(
                TruncatedMessage,
                "name at offset {} runs past the end of the {} byte message",
                start,
                buf.len()
            ),
        };

        match len & POINTER {
            0x00 if len == 0 => break jumped_from.unwrap_or(pos + 1),

            // A normal label.
            0x00 => {
                let label_start = pos + 1;
                let label_end = label_start + len as usize;
                let label = match buf.get(label_start..label_end) {
                    Some(label) => label,
                    None => bail!(
                        TruncatedMessage,
                        "label at offset {} runs past the end of the {} byte message",
                        pos,
                        buf.len()
                    ),
                };

                wire_len += 1 + label.len();
                if wire_len + 1 > MAX_NAME_LEN {
                    bail!(
                        MalformedName,
                        "name at offset {} is longer than {} bytes",
                        start,
                        MAX_NAME_LEN
                    );
                }

                if !name.is_empty() {
                    name.push('.');
                }
                push_label(&mut name, label);

                pos = label_end;
            }

            // Compression.
            POINTER => {
                let b2 = match buf.get(pos + 1) {
                    Some(b2) => *b2,
                    None => bail!(
                        TruncatedMessage,
                        "compression pointer at offset {} runs past the end of the message",
                        pos
                    ),
                };
                let ptr = ((len & !POINTER) as usize) << 8 | b2 as usize;

                pointers += 1;
                if pointers > MAX_POINTERS {
                    bail!(
                        MalformedName,
                        "name at offset {} follows more than {} compression pointers",
                        start,
                        MAX_POINTERS
                    );
                }

                trace!("following compression pointer at {} to {}", pos, ptr);

                jumped_from.get_or_insert(pos + 2);
                pos = ptr;
            }

            // 0b01 and 0b10 are reserved (the old extended label types).
            _ => bail!(
                MalformedName,
                "unsupported label type {:#04b} at offset {}",
                len >> 6,
                pos
            ),
        }
    };

    if name.is_empty() {
        name.push('.'); // Root domain
    }

    Ok((name, end - start))
}

fn push_label(name: &mut String, label: &[u8]) {
    for &b in label {
        match b {
            b'.' | b'\\' => {
                name.push('\\');
                name.push(b as char);
            }
            0x21..=0x7E => name.push(b as char),
            _ => {
                // Writing to a String never fails.
                let _ = write!(name, "\\{:03}", b);
            }
        }
    }
}
