//! Text charsets used for string payloads.

use std::borrow::Cow;
use std::fmt;

use crate::error::RencodeError;

/// Byte encoding applied to string payloads.
///
/// This is the codec's only configuration option. Both ends of a stream must
/// agree on it; the wire carries no charset marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Charset {
    #[default]
    Utf8,
    /// ISO-8859-1: one byte per character, code points up to U+00FF.
    Latin1,
    /// 7-bit US-ASCII.
    Ascii,
}

impl Charset {
    /// Encodes `text`, borrowing it when the bytes are already correct.
    pub fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>, RencodeError> {
        match self {
            Self::Utf8 => Ok(Cow::Borrowed(text.as_bytes())),
            Self::Ascii => match text.chars().find(|c| !c.is_ascii()) {
                Some(ch) => Err(RencodeError::UnencodableText { charset: *self, ch }),
                None => Ok(Cow::Borrowed(text.as_bytes())),
            },
            Self::Latin1 => {
                if text.is_ascii() {
                    return Ok(Cow::Borrowed(text.as_bytes()));
                }
                text.chars()
                    .map(|ch| {
                        u8::try_from(u32::from(ch))
                            .map_err(|_| RencodeError::UnencodableText { charset: *self, ch })
                    })
                    .collect::<Result<Vec<u8>, _>>()
                    .map(Cow::Owned)
            }
        }
    }

    /// Decodes `bytes` into an owned string.
    pub fn decode(&self, bytes: Vec<u8>) -> Result<String, RencodeError> {
        match self {
            Self::Utf8 => String::from_utf8(bytes)
                .map_err(|e| RencodeError::InvalidText(format!("invalid UTF-8: {e}"))),
            Self::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(pos) => Err(RencodeError::InvalidText(format!(
                    "non-ASCII byte 0x{:02X} at offset {pos}",
                    bytes[pos]
                ))),
                // All bytes are ASCII, so this cannot fail.
                None => String::from_utf8(bytes)
                    .map_err(|e| RencodeError::InvalidText(e.to_string())),
            },
            Self::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }

    /// Number of bytes `text` occupies once encoded. Characters the charset
    /// cannot represent still count as one byte; `encode` rejects them.
    pub fn encoded_len(&self, text: &str) -> usize {
        match self {
            Self::Utf8 => text.len(),
            Self::Latin1 | Self::Ascii => text.chars().count(),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8 => write!(f, "UTF-8"),
            Self::Latin1 => write!(f, "ISO-8859-1"),
            Self::Ascii => write!(f, "US-ASCII"),
        }
    }
}
