//! Writes rencoded values to a byte sink.

use std::io::Write;

use bigdecimal::BigDecimal;
use bytes::{BufMut, BytesMut};
use num_bigint::BigInt;

use crate::charset::Charset;
use crate::codec::catalog::SMALL_LIST_CAPACITY;
use crate::codec::{CATALOG, Group, encode, marker};
use crate::error::RencodeError;
use crate::types::{Number, Value, ValueMap};

/// A large container opened with `begin_list`/`begin_map`.
#[derive(Debug)]
struct OpenContainer {
    group: Group,
    items: usize,
}

/// Writes rencoded values to a `Write` sink.
///
/// Each value is encoded into a scratch buffer first and written only if
/// encoding succeeded, so a failed call leaves the sink untouched.
pub struct RencodeWriter<W> {
    writer: W,
    buf: BytesMut,
    charset: Charset,
    open: Vec<OpenContainer>,
}

impl<W: Write> RencodeWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_charset(writer, Charset::default())
    }

    pub fn with_charset(writer: W, charset: Charset) -> Self {
        Self {
            writer,
            buf: BytesMut::new(),
            charset,
            open: Vec::new(),
        }
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Writes any value, choosing its token by the catalog's group priority.
    pub fn write_value(&mut self, value: &Value) -> Result<(), RencodeError> {
        let charset = self.charset;
        self.emit(|buf| encode::encode_value_with(buf, value, charset))
    }

    /// Writes `value` only if the token it resolves to belongs to `group`.
    pub fn write_as(&mut self, value: &Value, group: Group) -> Result<(), RencodeError> {
        let charset = self.charset;
        let token = CATALOG
            .resolve_by_value(value, charset)
            .ok_or_else(|| RencodeError::UnsupportedValue(value.kind().to_owned()))?;
        if !group.contains(token) {
            return Err(RencodeError::CapabilityMismatch {
                expected: group,
                found: token,
            });
        }
        self.emit(|buf| encode::encode_token(buf, token, value, charset))
    }

    pub fn write_null(&mut self) -> Result<(), RencodeError> {
        self.emit(|buf| {
            encode::encode_null(buf);
            Ok(())
        })
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), RencodeError> {
        self.emit(|buf| {
            encode::encode_bool(buf, value);
            Ok(())
        })
    }

    pub fn write_byte(&mut self, value: i8) -> Result<(), RencodeError> {
        self.emit(|buf| {
            encode::encode_byte(buf, value);
            Ok(())
        })
    }

    pub fn write_short(&mut self, value: i16) -> Result<(), RencodeError> {
        self.emit(|buf| {
            encode::encode_short(buf, value);
            Ok(())
        })
    }

    pub fn write_int(&mut self, value: i32) -> Result<(), RencodeError> {
        self.emit(|buf| {
            encode::encode_int(buf, value);
            Ok(())
        })
    }

    pub fn write_long(&mut self, value: i64) -> Result<(), RencodeError> {
        self.emit(|buf| {
            encode::encode_long(buf, value);
            Ok(())
        })
    }

    pub fn write_float(&mut self, value: f32) -> Result<(), RencodeError> {
        self.emit(|buf| {
            encode::encode_float(buf, value);
            Ok(())
        })
    }

    pub fn write_double(&mut self, value: f64) -> Result<(), RencodeError> {
        self.emit(|buf| {
            encode::encode_double(buf, value);
            Ok(())
        })
    }

    /// Writes a char as a byte token; only ASCII chars fit.
    pub fn write_char(&mut self, value: char) -> Result<(), RencodeError> {
        let byte = i8::try_from(u32::from(value)).map_err(|_| RencodeError::UnencodableText {
            charset: Charset::Ascii,
            ch: value,
        })?;
        self.write_byte(byte)
    }

    pub fn write_big_int(&mut self, value: &BigInt) -> Result<(), RencodeError> {
        self.emit(|buf| {
            encode::encode_big_int(buf, value);
            Ok(())
        })
    }

    pub fn write_decimal(&mut self, value: &BigDecimal) -> Result<(), RencodeError> {
        self.emit(|buf| {
            encode::encode_decimal(buf, value);
            Ok(())
        })
    }

    pub fn write_number(&mut self, value: Number) -> Result<(), RencodeError> {
        self.write_value(&Value::from(value))
    }

    pub fn write_string(&mut self, value: &str) -> Result<(), RencodeError> {
        let charset = self.charset;
        self.emit(|buf| encode::encode_string(buf, value, charset))
    }

    pub fn write_list(&mut self, items: &[Value]) -> Result<(), RencodeError> {
        let charset = self.charset;
        self.emit(|buf| encode::encode_list(buf, items, charset))
    }

    pub fn write_map(&mut self, map: &ValueMap) -> Result<(), RencodeError> {
        let charset = self.charset;
        self.emit(|buf| encode::encode_map(buf, map, charset))
    }

    /// Writes any exact-size sequence as a list, small or large by length.
    pub fn write_seq<I>(&mut self, items: I) -> Result<(), RencodeError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
        I::IntoIter: ExactSizeIterator,
    {
        let items = items.into_iter();
        let small = items.len() < SMALL_LIST_CAPACITY;
        let charset = self.charset;
        self.emit(|buf| {
            if small {
                buf.put_u8(marker::SMALL_LIST_START + items.len() as u8);
            } else {
                buf.put_u8(marker::LARGE_LIST);
            }
            for item in items {
                encode::encode_value_with(buf, &item.into(), charset)?;
            }
            if !small {
                buf.put_u8(marker::END);
            }
            Ok(())
        })
    }

    /// Opens a terminator-delimited list; elements follow as ordinary writes
    /// until [`end_container`](Self::end_container).
    pub fn begin_list(&mut self) -> Result<(), RencodeError> {
        self.begin(Group::List, marker::LARGE_LIST)
    }

    /// Opens a terminator-delimited map; keys and values follow alternately.
    pub fn begin_map(&mut self) -> Result<(), RencodeError> {
        self.begin(Group::Map, marker::LARGE_MAP)
    }

    /// Closes the innermost container opened by `begin_list`/`begin_map`.
    pub fn end_container(&mut self) -> Result<(), RencodeError> {
        let Some(top) = self.open.last() else {
            return Err(RencodeError::InvalidState("no open container".into()));
        };
        if top.group == Group::Map && top.items % 2 != 0 {
            return Err(RencodeError::InvalidState(format!(
                "map closed after a key without a value ({} values written)",
                top.items
            )));
        }
        self.writer.write_all(&[marker::END])?;
        if let Some(closed) = self.open.pop() {
            tracing::trace!(group = %closed.group, items = closed.items, "closed large container");
        }
        self.count_item();
        Ok(())
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> Result<(), RencodeError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Returns the sink, without checking for open containers.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Flushes and returns the sink; fails if a container is still open.
    pub fn finish(mut self) -> Result<W, RencodeError> {
        if !self.open.is_empty() {
            return Err(RencodeError::InvalidState(format!(
                "{} container(s) still open",
                self.open.len()
            )));
        }
        self.flush()?;
        Ok(self.writer)
    }

    fn begin(&mut self, group: Group, id: u8) -> Result<(), RencodeError> {
        self.writer.write_all(&[id])?;
        tracing::trace!(%group, depth = self.open.len() + 1, "opened large container");
        self.open.push(OpenContainer { group, items: 0 });
        Ok(())
    }

    /// Records one complete value in the innermost open container.
    fn count_item(&mut self) {
        if let Some(top) = self.open.last_mut() {
            top.items += 1;
        }
    }

    /// Encodes into the scratch buffer, then writes it out in one piece.
    fn emit(
        &mut self,
        encode: impl FnOnce(&mut BytesMut) -> Result<(), RencodeError>,
    ) -> Result<(), RencodeError> {
        self.buf.clear();
        if let Err(e) = encode(&mut self.buf) {
            tracing::debug!(error = %e, "rencode write failed");
            self.buf.clear();
            return Err(e);
        }
        self.writer.write_all(&self.buf)?;
        self.buf.clear();
        self.count_item();
        Ok(())
    }
}
