//! Error types for the rencode codec.

use std::io;

use crate::charset::Charset;
use crate::codec::{Group, TokenType};

/// Errors that can occur while encoding or decoding rencode values.
///
/// After any decode error the byte alignment of the source is lost; the
/// stream should not be read further.
#[derive(Debug, thiserror::Error)]
pub enum RencodeError {
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    #[error("no token type claims byte 0x{0:02X}")]
    UnmappedToken(u8),

    #[error("end-of-container terminator where a value was expected")]
    UnexpectedTerminator,

    #[error("truncated input: needed {needed} more byte(s)")]
    Truncated { needed: usize },

    #[error("malformed number text: {0:?}")]
    MalformedNumber(String),

    #[error("expected {expected} value, found {found} token")]
    CapabilityMismatch { expected: Group, found: TokenType },

    #[error("invalid string length prefix: {0}")]
    InvalidLength(String),

    #[error("invalid text: {0}")]
    InvalidText(String),

    #[error("character {ch:?} cannot be encoded as {charset}")]
    UnencodableText { charset: Charset, ch: char },

    #[error("nesting deeper than {limit} containers")]
    NestingTooDeep { limit: usize },

    #[error("{0} trailing byte(s) after value")]
    TrailingBytes(usize),

    #[error("invalid writer state: {0}")]
    InvalidState(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RencodeError {
    /// Maps an I/O failure while `needed` bytes were outstanding. End of
    /// input becomes `Truncated`; everything else passes through.
    pub(crate) fn from_read(e: io::Error, needed: usize) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated { needed }
        } else {
            Self::Io(e)
        }
    }

    /// Returns `true` if the source ran out of bytes mid-value.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}
