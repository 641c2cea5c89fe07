use crate::types::Rcode;
use std::io;
use thiserror::Error;

/// Errors returned while building, exchanging or parsing DNS messages.
#[derive(Error, Debug)]
pub enum Error {
    /// The hostname can not be written as a wire format name.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// The caller supplied buffer can not hold the encoded request.
    #[error("buffer too small: need {needed} bytes but only {available} available")]
    BufferTooSmall { needed: usize, available: usize },

    /// A name in the message could not be decoded, for example a compression
    /// pointer cycle.
    #[error("malformed name: {0}")]
    MalformedName(String),

    /// The message ended before a declared section or record did.
    #[error("truncated message: {0}")]
    TruncatedMessage(String),

    #[error("timed out waiting for a response")]
    Timeout,

    #[error("transport failure: {0}")]
    TransportFailure(#[from] io::Error),

    /// The server answered, but with a non-zero response code.
    #[error("query failed with rcode: {0}")]
    ResponseCode(Rcode),

    #[error("response id {got} does not match query id {expected}")]
    MismatchedId { expected: u16, got: u16 },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Returns early with the given [`Error`] variant and a formatted message.
///
/// ```ignore
/// bail!(MalformedName, "too many compression pointers at offset {}", pos);
/// ```
#[macro_export]
macro_rules! bail {
    ($kind:ident, $($arg:tt)*) => {{
        return Err($crate::Error::$kind(format!($($arg)*)));
    }};
}

/// Maps a failed read on an in-memory message into a [`Error::TruncatedMessage`].
///
/// Reads from a `Cursor<&[u8]>` can only fail by running out of bytes, so any
/// io error here means the message was shorter than it claimed to be.
pub(crate) fn truncated(what: &str) -> impl FnOnce(io::Error) -> Error + '_ {
    move |e| Error::TruncatedMessage(format!("reading {}: {}", what, e))
}
