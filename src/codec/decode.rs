//! Rencode decoding: bytes → `Value`.

use std::io::Read;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use bytes::Buf;
use num_bigint::BigInt;

use super::catalog::{CATALOG, TokenType};
use super::marker;
use crate::charset::Charset;
use crate::error::RencodeError;
use crate::types::{Value, ValueMap};

/// Containers nested deeper than this are rejected instead of recursing.
pub const MAX_NESTING_DEPTH: usize = 512;

/// Longest accepted large-string length prefix (fits any `u64`).
const MAX_LENGTH_DIGITS: usize = 20;

/// Decodes a single `Value` from the buffer, with UTF-8 strings.
pub fn decode_value(buf: &mut impl Buf) -> Result<Value, RencodeError> {
    decode_value_with(buf, Charset::Utf8)
}

/// Decodes a single `Value` from the buffer using `charset` for strings.
pub fn decode_value_with(buf: &mut impl Buf, charset: Charset) -> Result<Value, RencodeError> {
    let mut reader = Buf::reader(&mut *buf);
    Decoder::new(&mut reader, charset).read_value()
}

/// Resolves a leading byte to the token type that starts a value.
pub(crate) fn resolve(byte: u8) -> Result<TokenType, RencodeError> {
    match CATALOG.resolve_by_byte(byte) {
        Some(TokenType::End) => Err(RencodeError::UnexpectedTerminator),
        Some(token) => Ok(token),
        None => Err(RencodeError::UnmappedToken(byte)),
    }
}

/// Recursive reader over a byte source. Per-call state only: the nesting
/// depth of the value being decoded.
pub(crate) struct Decoder<'a, R> {
    src: &'a mut R,
    charset: Charset,
    depth: usize,
}

impl<'a, R: Read> Decoder<'a, R> {
    pub(crate) fn new(src: &'a mut R, charset: Charset) -> Self {
        Self {
            src,
            charset,
            depth: 0,
        }
    }

    /// Reads the next leading byte, or `None` at a clean end of input.
    pub(crate) fn next_token(&mut self) -> Result<Option<u8>, RencodeError> {
        let mut byte = [0u8; 1];
        loop {
            match self.src.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(RencodeError::Io(e)),
            }
        }
    }

    fn read_token(&mut self) -> Result<u8, RencodeError> {
        self.next_token()?
            .ok_or(RencodeError::Truncated { needed: 1 })
    }

    pub(crate) fn read_value(&mut self) -> Result<Value, RencodeError> {
        let lead = self.read_token()?;
        self.read_value_from(lead)
    }

    /// Decodes one value whose leading byte has already been consumed.
    pub(crate) fn read_value_from(&mut self, lead: u8) -> Result<Value, RencodeError> {
        let token = resolve(lead)?;
        self.read_token_payload(token, lead)
    }

    /// Reads the payload of `token`, given the leading byte it was resolved from.
    pub(crate) fn read_token_payload(
        &mut self,
        token: TokenType,
        lead: u8,
    ) -> Result<Value, RencodeError> {
        match token {
            TokenType::Null => Ok(Value::Null),
            TokenType::True => Ok(Value::Bool(true)),
            TokenType::False => Ok(Value::Bool(false)),
            TokenType::PositiveInt => {
                Ok(Value::Int(i32::from(lead - marker::POSITIVE_INT_START)))
            }
            TokenType::NegativeInt => Ok(Value::Int(
                i32::from(marker::NEGATIVE_INT_START) - 1 - i32::from(lead),
            )),
            TokenType::Byte => Ok(Value::Byte(i8::from_be_bytes(self.read_array()?))),
            TokenType::Short => Ok(Value::Short(i16::from_be_bytes(self.read_array()?))),
            TokenType::Int => Ok(Value::Int(i32::from_be_bytes(self.read_array()?))),
            TokenType::Long => Ok(Value::Long(i64::from_be_bytes(self.read_array()?))),
            TokenType::Float => Ok(Value::Float(f32::from_be_bytes(self.read_array()?))),
            TokenType::Double => Ok(Value::Double(f64::from_be_bytes(self.read_array()?))),
            TokenType::BigNumber => self.read_big_number(),
            TokenType::SmallString => {
                let len = usize::from(lead - marker::SMALL_STRING_START);
                self.read_string_data(len)
            }
            TokenType::LargeString => {
                let len = self.read_length_prefix(lead)?;
                self.read_string_data(len)
            }
            TokenType::SmallList => {
                let len = usize::from(lead - marker::SMALL_LIST_START);
                self.nested(|d| d.read_small_list(len))
            }
            TokenType::LargeList => self.nested(Self::read_large_list),
            TokenType::SmallMap => {
                let len = usize::from(lead - marker::SMALL_MAP_START);
                self.nested(|d| d.read_small_map(len))
            }
            TokenType::LargeMap => self.nested(Self::read_large_map),
            TokenType::End => Err(RencodeError::UnexpectedTerminator),
        }
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], RencodeError> {
        let mut data = [0u8; N];
        self.src
            .read_exact(&mut data)
            .map_err(|e| RencodeError::from_read(e, N))?;
        Ok(data)
    }

    /// Reads exactly `len` bytes without trusting `len` for the allocation.
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, RencodeError> {
        let mut data = Vec::new();
        (&mut *self.src)
            .take(len as u64)
            .read_to_end(&mut data)
            .map_err(|e| RencodeError::from_read(e, len - data.len()))?;
        if data.len() < len {
            return Err(RencodeError::Truncated {
                needed: len - data.len(),
            });
        }
        Ok(data)
    }

    fn read_string_data(&mut self, len: usize) -> Result<Value, RencodeError> {
        let data = self.read_bytes(len)?;
        Ok(Value::String(self.charset.decode(data)?))
    }

    /// Parses the ASCII length of a large string, starting at its first digit.
    fn read_length_prefix(&mut self, first_digit: u8) -> Result<usize, RencodeError> {
        let mut digits = String::from(char::from(first_digit));
        loop {
            let byte = self.read_token()?;
            if byte == marker::LENGTH_DELIMITER {
                break;
            }
            if !byte.is_ascii_digit() {
                return Err(RencodeError::InvalidLength(format!(
                    "unexpected byte 0x{byte:02X} after {digits:?}"
                )));
            }
            if digits.len() == MAX_LENGTH_DIGITS {
                return Err(RencodeError::InvalidLength(format!("{digits}... is too long")));
            }
            digits.push(char::from(byte));
        }
        digits
            .parse::<usize>()
            .map_err(|e| RencodeError::InvalidLength(format!("{digits}: {e}")))
    }

    /// Accumulates numeral text up to the terminator. Only digits, signs,
    /// '.' and exponent markers are accepted; a '.' anywhere selects decimal
    /// parsing.
    fn read_big_number(&mut self) -> Result<Value, RencodeError> {
        let mut text = String::new();
        loop {
            let byte = self.read_token()?;
            if byte == marker::END {
                break;
            }
            text.push(char::from(byte));
        }

        let numeral = text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
        if !numeral {
            return Err(RencodeError::MalformedNumber(text));
        }

        let parsed = if text.contains('.') {
            BigDecimal::from_str(&text).map(Value::Decimal).ok()
        } else {
            BigInt::from_str(&text).map(Value::BigInt).ok()
        };
        parsed.ok_or(RencodeError::MalformedNumber(text))
    }

    /// Runs `f` one container level deeper.
    fn nested(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<Value, RencodeError>,
    ) -> Result<Value, RencodeError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(RencodeError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn read_small_list(&mut self, len: usize) -> Result<Value, RencodeError> {
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(self.read_value()?);
        }
        Ok(Value::List(items))
    }

    fn read_large_list(&mut self) -> Result<Value, RencodeError> {
        let mut items = Vec::new();
        loop {
            let lead = self.read_token()?;
            if lead == marker::END {
                break;
            }
            items.push(self.read_value_from(lead)?);
        }
        Ok(Value::List(items))
    }

    fn read_small_map(&mut self, len: usize) -> Result<Value, RencodeError> {
        let mut map = ValueMap::new();
        for _ in 0..len {
            let lead = self.read_token()?;
            self.read_map_entry(&mut map, lead)?;
        }
        Ok(Value::Map(map))
    }

    fn read_large_map(&mut self) -> Result<Value, RencodeError> {
        let mut map = ValueMap::new();
        loop {
            let lead = self.read_token()?;
            if lead == marker::END {
                break;
            }
            self.read_map_entry(&mut map, lead)?;
        }
        Ok(Value::Map(map))
    }

    /// Reads one key (from `lead`) and its value. Equal keys: last write wins.
    fn read_map_entry(&mut self, map: &mut ValueMap, lead: u8) -> Result<(), RencodeError> {
        let key = self.read_value_from(lead)?;
        let value = self.read_value()?;
        if let Some(previous) = map.insert(key, value) {
            tracing::debug!(%previous, "duplicate map key, keeping last value");
        }
        Ok(())
    }
}
