//! The rencode wire format.
//!
//! Every value starts with one leading byte. The byte space is partitioned
//! into zones, each owned by a single token type (see [`catalog`]); small
//! integers, and the sizes of small strings, lists and maps, are carried
//! inside that byte. Fixed-width numbers are big-endian.

pub mod catalog;
pub mod decode;
pub mod encode;
pub mod group;
pub mod marker;

use bytes::{Bytes, BytesMut};

pub use catalog::{CATALOG, Catalog, TokenId, TokenType};
pub use decode::{MAX_NESTING_DEPTH, decode_value, decode_value_with};
pub use encode::{encode_value, encode_value_with};
pub use group::Group;

use crate::error::RencodeError;
use crate::types::Value;

/// Encodes `value` into a fresh buffer, with UTF-8 strings.
pub fn to_bytes(value: &Value) -> Result<Bytes, RencodeError> {
    let mut buf = BytesMut::new();
    encode_value(&mut buf, value)?;
    Ok(buf.freeze())
}

/// Decodes exactly one value spanning all of `data`, with UTF-8 strings.
pub fn from_slice(data: &[u8]) -> Result<Value, RencodeError> {
    let mut cursor = data;
    let value = decode_value(&mut cursor)?;
    if !cursor.is_empty() {
        return Err(RencodeError::TrailingBytes(cursor.len()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_round_trip() {
        let value = Value::from(vec![Value::from("Hello"), Value::Int(-10)]);
        let bytes = to_bytes(&value).unwrap();
        assert_eq!(&bytes[..], &[194, 133, b'H', b'e', b'l', b'l', b'o', 79]);
        assert_eq!(from_slice(&bytes).unwrap(), value);
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        assert!(matches!(from_slice(&[1, 2]), Err(RencodeError::TrailingBytes(1))));
    }
}
