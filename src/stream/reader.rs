//! Reads rencoded values from a byte source.

use std::io::Read;

use crate::charset::Charset;
use crate::codec::Group;
use crate::codec::decode::{Decoder, resolve};
use crate::error::RencodeError;
use crate::types::{Number, Value, ValueMap};

/// Reads rencoded values from a `Read` source.
///
/// Tokens are pulled one byte at a time; wrap unbuffered sources such as
/// files or sockets in a `BufReader`. After any error the stream position is
/// undefined and the reader should be discarded.
pub struct RencodeReader<R> {
    reader: R,
    charset: Charset,
}

impl<R: Read> RencodeReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_charset(reader, Charset::default())
    }

    pub fn with_charset(reader: R, charset: Charset) -> Self {
        Self { reader, charset }
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Reads the next value of any kind.
    pub fn read_value(&mut self) -> Result<Value, RencodeError> {
        Decoder::new(&mut self.reader, self.charset)
            .read_value()
            .inspect_err(|e| tracing::debug!(error = %e, "rencode read failed"))
    }

    /// Reads the next value, or returns `None` if the source is exhausted
    /// before its first byte.
    pub fn try_read_value(&mut self) -> Result<Option<Value>, RencodeError> {
        let mut decoder = Decoder::new(&mut self.reader, self.charset);
        let Some(lead) = decoder.next_token()? else {
            return Ok(None);
        };
        decoder
            .read_value_from(lead)
            .map(Some)
            .inspect_err(|e| tracing::debug!(error = %e, "rencode read failed"))
    }

    /// Reads the next value, failing before its payload is consumed if the
    /// leading byte is not a token of `group`.
    pub fn read_as(&mut self, group: Group) -> Result<Value, RencodeError> {
        let mut decoder = Decoder::new(&mut self.reader, self.charset);
        let lead = decoder
            .next_token()?
            .ok_or(RencodeError::Truncated { needed: 1 })?;
        let token = resolve(lead)?;
        if !group.contains(token) {
            tracing::debug!(expected = %group, found = %token, "rencode type mismatch");
            return Err(RencodeError::CapabilityMismatch {
                expected: group,
                found: token,
            });
        }
        decoder
            .read_token_payload(token, lead)
            .inspect_err(|e| tracing::debug!(error = %e, "rencode read failed"))
    }

    /// Reads a null; returns `()` for symmetry with the other typed reads.
    pub fn read_null(&mut self) -> Result<(), RencodeError> {
        self.read_as(Group::Null).map(drop)
    }

    pub fn read_bool(&mut self) -> Result<bool, RencodeError> {
        match self.read_as(Group::Boolean)? {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch(Group::Boolean, &other)),
        }
    }

    pub fn read_byte(&mut self) -> Result<i8, RencodeError> {
        match self.read_as(Group::Byte)? {
            Value::Byte(v) => Ok(v),
            other => Err(mismatch(Group::Byte, &other)),
        }
    }

    pub fn read_short(&mut self) -> Result<i16, RencodeError> {
        match self.read_as(Group::Short)? {
            Value::Short(v) => Ok(v),
            other => Err(mismatch(Group::Short, &other)),
        }
    }

    /// Reads an int in any of its encodings: inline positive, inline
    /// negative, or fixed-width.
    pub fn read_int(&mut self) -> Result<i32, RencodeError> {
        match self.read_as(Group::Int)? {
            Value::Int(v) => Ok(v),
            other => Err(mismatch(Group::Int, &other)),
        }
    }

    pub fn read_long(&mut self) -> Result<i64, RencodeError> {
        match self.read_as(Group::Long)? {
            Value::Long(v) => Ok(v),
            other => Err(mismatch(Group::Long, &other)),
        }
    }

    pub fn read_float(&mut self) -> Result<f32, RencodeError> {
        match self.read_as(Group::Float)? {
            Value::Float(v) => Ok(v),
            other => Err(mismatch(Group::Float, &other)),
        }
    }

    pub fn read_double(&mut self) -> Result<f64, RencodeError> {
        match self.read_as(Group::Double)? {
            Value::Double(v) => Ok(v),
            other => Err(mismatch(Group::Double, &other)),
        }
    }

    /// Reads any numeric token, fixed-width or big.
    pub fn read_number(&mut self) -> Result<Number, RencodeError> {
        Number::try_from(self.read_as(Group::Number)?)
            .map_err(|other| mismatch(Group::Number, &other))
    }

    pub fn read_string(&mut self) -> Result<String, RencodeError> {
        match self.read_as(Group::String)? {
            Value::String(s) => Ok(s),
            other => Err(mismatch(Group::String, &other)),
        }
    }

    pub fn read_list(&mut self) -> Result<Vec<Value>, RencodeError> {
        match self.read_as(Group::List)? {
            Value::List(items) => Ok(items),
            other => Err(mismatch(Group::List, &other)),
        }
    }

    pub fn read_map(&mut self) -> Result<ValueMap, RencodeError> {
        match self.read_as(Group::Map)? {
            Value::Map(map) => Ok(map),
            other => Err(mismatch(Group::Map, &other)),
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// A group read produced a value of the wrong shape.
fn mismatch(expected: Group, found: &Value) -> RencodeError {
    RencodeError::UnsupportedValue(format!("{expected} read produced a {} value", found.kind()))
}

impl<R: Read> Iterator for RencodeReader<R> {
    type Item = Result<Value, RencodeError>;

    /// Yields values until the source is cleanly exhausted.
    fn next(&mut self) -> Option<Self::Item> {
        self.try_read_value().transpose()
    }
}
