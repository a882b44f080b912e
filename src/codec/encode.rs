//! Rencode encoding: `Value` → bytes.

use bigdecimal::BigDecimal;
use bytes::{BufMut, BytesMut};
use num_bigint::{BigInt, Sign};

use super::catalog::{
    CATALOG, INLINE_INT_MAX, INLINE_INT_MIN, SMALL_LIST_CAPACITY, SMALL_MAP_CAPACITY,
    SMALL_STRING_CAPACITY, TokenType,
};
use super::marker;
use crate::charset::Charset;
use crate::error::RencodeError;
use crate::types::{Value, ValueMap};

/// Encodes a `Value` into the buffer, with UTF-8 strings.
pub fn encode_value(buf: &mut BytesMut, value: &Value) -> Result<(), RencodeError> {
    encode_value_with(buf, value, Charset::Utf8)
}

/// Encodes a `Value` into the buffer using `charset` for strings.
///
/// On error the buffer may hold a partial encoding; callers that share the
/// buffer should truncate it back.
pub fn encode_value_with(
    buf: &mut BytesMut,
    value: &Value,
    charset: Charset,
) -> Result<(), RencodeError> {
    let token = CATALOG
        .resolve_by_value(value, charset)
        .ok_or_else(|| RencodeError::UnsupportedValue(value.kind().to_owned()))?;
    encode_token(buf, token, value, charset)
}

/// Writes `value` using an already-resolved token type.
pub(crate) fn encode_token(
    buf: &mut BytesMut,
    token: TokenType,
    value: &Value,
    charset: Charset,
) -> Result<(), RencodeError> {
    match (token, value) {
        (TokenType::Null, Value::Null) => encode_null(buf),
        (TokenType::True | TokenType::False, Value::Bool(b)) => encode_bool(buf, *b),
        (TokenType::Byte, Value::Byte(v)) => encode_byte(buf, *v),
        (TokenType::Short, Value::Short(v)) => encode_short(buf, *v),
        (TokenType::PositiveInt | TokenType::NegativeInt | TokenType::Int, Value::Int(v)) => {
            encode_int(buf, *v)
        }
        (TokenType::Long, Value::Long(v)) => encode_long(buf, *v),
        (TokenType::Float, Value::Float(v)) => encode_float(buf, *v),
        (TokenType::Double, Value::Double(v)) => encode_double(buf, *v),
        (TokenType::BigNumber, Value::BigInt(v)) => encode_big_int(buf, v),
        (TokenType::BigNumber, Value::Decimal(v)) => encode_decimal(buf, v),
        (TokenType::SmallString | TokenType::LargeString, Value::String(s)) => {
            return encode_string(buf, s, charset);
        }
        (TokenType::SmallList | TokenType::LargeList, Value::List(items)) => {
            return encode_list(buf, items, charset);
        }
        (TokenType::SmallMap | TokenType::LargeMap, Value::Map(map)) => {
            return encode_map(buf, map, charset);
        }
        (token, value) => {
            return Err(RencodeError::UnsupportedValue(format!(
                "{} cannot be written as {token}",
                value.kind()
            )));
        }
    }
    Ok(())
}

pub fn encode_null(buf: &mut BytesMut) {
    buf.put_u8(marker::NULL);
}

pub fn encode_bool(buf: &mut BytesMut, value: bool) {
    buf.put_u8(if value { marker::TRUE } else { marker::FALSE });
}

pub fn encode_byte(buf: &mut BytesMut, value: i8) {
    buf.put_u8(marker::BYTE);
    buf.put_i8(value);
}

pub fn encode_short(buf: &mut BytesMut, value: i16) {
    buf.put_u8(marker::SHORT);
    buf.put_i16(value);
}

/// Encodes an int, inlining it into a single byte when it is in -32..=43.
pub fn encode_int(buf: &mut BytesMut, value: i32) {
    match value {
        0..=INLINE_INT_MAX => buf.put_u8(marker::POSITIVE_INT_START + value as u8),
        // byte = start - 1 - value, so -1 maps to the first byte of the zone
        INLINE_INT_MIN..=-1 => buf.put_u8((i32::from(marker::NEGATIVE_INT_START) - 1 - value) as u8),
        _ => {
            buf.put_u8(marker::INT);
            buf.put_i32(value);
        }
    }
}

pub fn encode_long(buf: &mut BytesMut, value: i64) {
    buf.put_u8(marker::LONG);
    buf.put_i64(value);
}

pub fn encode_float(buf: &mut BytesMut, value: f32) {
    buf.put_u8(marker::FLOAT);
    buf.put_f32(value);
}

pub fn encode_double(buf: &mut BytesMut, value: f64) {
    buf.put_u8(marker::DOUBLE);
    buf.put_f64(value);
}

pub fn encode_big_int(buf: &mut BytesMut, value: &BigInt) {
    encode_numeral(buf, &value.to_string());
}

/// Encodes a decimal as plain text that always contains a '.', so the
/// decoder parses it back as a decimal.
pub fn encode_decimal(buf: &mut BytesMut, value: &BigDecimal) {
    encode_numeral(buf, &decimal_text(value));
}

fn encode_numeral(buf: &mut BytesMut, text: &str) {
    buf.put_u8(marker::BIG_NUMBER);
    buf.put_slice(text.as_bytes());
    buf.put_u8(marker::END);
}

fn decimal_text(value: &BigDecimal) -> String {
    let (unscaled, scale) = value.as_bigint_and_exponent();
    let sign = if unscaled.sign() == Sign::Minus { "-" } else { "" };
    let digits = unscaled.magnitude().to_string();

    if unscaled.sign() == Sign::NoSign {
        return "0.0".to_owned();
    }
    if scale <= 0 {
        let zeros = "0".repeat(scale.unsigned_abs() as usize);
        return format!("{sign}{digits}{zeros}.0");
    }

    let scale = scale as usize;
    let padded = if digits.len() <= scale {
        format!("{}{digits}", "0".repeat(scale + 1 - digits.len()))
    } else {
        digits
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);
    format!("{sign}{int_part}.{frac_part}")
}

/// Encodes a string; the size is the encoded byte length, not the char count.
pub fn encode_string(buf: &mut BytesMut, value: &str, charset: Charset) -> Result<(), RencodeError> {
    let bytes = charset.encode(value)?;
    let len = bytes.len();
    if len < SMALL_STRING_CAPACITY {
        buf.put_u8(marker::SMALL_STRING_START + len as u8);
    } else {
        buf.put_slice(len.to_string().as_bytes());
        buf.put_u8(marker::LENGTH_DELIMITER);
    }
    buf.put_slice(&bytes);
    Ok(())
}

pub fn encode_list(buf: &mut BytesMut, items: &[Value], charset: Charset) -> Result<(), RencodeError> {
    let small = items.len() < SMALL_LIST_CAPACITY;
    if small {
        buf.put_u8(marker::SMALL_LIST_START + items.len() as u8);
    } else {
        buf.put_u8(marker::LARGE_LIST);
    }
    for item in items {
        encode_value_with(buf, item, charset)?;
    }
    if !small {
        buf.put_u8(marker::END);
    }
    Ok(())
}

/// Encodes a map; pairs are written in ascending key order.
pub fn encode_map(buf: &mut BytesMut, map: &ValueMap, charset: Charset) -> Result<(), RencodeError> {
    let small = map.len() < SMALL_MAP_CAPACITY;
    if small {
        buf.put_u8(marker::SMALL_MAP_START + map.len() as u8);
    } else {
        buf.put_u8(marker::LARGE_MAP);
    }
    for (key, value) in map {
        encode_value_with(buf, key, charset)?;
        encode_value_with(buf, value, charset)?;
    }
    if !small {
        buf.put_u8(marker::END);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn encoded(value: &Value) -> BytesMut {
        let mut buf = BytesMut::new();
        encode_value(&mut buf, value).unwrap();
        buf
    }

    #[test]
    fn encode_singletons() {
        assert_eq!(&encoded(&Value::Null)[..], &[69]);
        assert_eq!(&encoded(&Value::Bool(true))[..], &[67]);
        assert_eq!(&encoded(&Value::Bool(false))[..], &[68]);
    }

    #[test]
    fn encode_inline_ints() {
        assert_eq!(&encoded(&Value::Int(0))[..], &[0]);
        assert_eq!(&encoded(&Value::Int(10))[..], &[10]);
        assert_eq!(&encoded(&Value::Int(43))[..], &[43]);
        assert_eq!(&encoded(&Value::Int(-1))[..], &[70]);
        assert_eq!(&encoded(&Value::Int(-10))[..], &[79]);
        assert_eq!(&encoded(&Value::Int(-32))[..], &[101]);
    }

    #[test]
    fn encode_fixed_int_outside_inline_range() {
        assert_eq!(&encoded(&Value::Int(44))[..], &[marker::INT, 0, 0, 0, 44]);
        let expected = (-33i32).to_be_bytes();
        assert_eq!(encoded(&Value::Int(-33))[0], marker::INT);
        assert_eq!(&encoded(&Value::Int(-33))[1..], &expected);
        assert_eq!(
            &encoded(&Value::Int(228_322))[..],
            &[marker::INT, 0x00, 0x03, 0x7B, 0xE2]
        );
    }

    #[test]
    fn encode_fixed_width_numbers() {
        assert_eq!(&encoded(&Value::Byte(b'b' as i8))[..], &[62, b'b']);
        assert_eq!(&encoded(&Value::Short(128))[..], &[63, 0x00, 0x80]);
        // Longs never inline, even when small.
        assert_eq!(&encoded(&Value::Long(5))[..], &[65, 0, 0, 0, 0, 0, 0, 0, 5]);

        let buf = encoded(&Value::Float(1.213));
        assert_eq!(buf[0], marker::FLOAT);
        assert_eq!(&buf[1..], &1.213f32.to_be_bytes());

        let buf = encoded(&Value::Double(0.123));
        assert_eq!(buf[0], marker::DOUBLE);
        assert_eq!(&buf[1..], &0.123f64.to_be_bytes());
    }

    #[test]
    fn encode_big_integer_text() {
        let big = BigInt::from_str("345734590893457893457893453458934589").unwrap();
        let buf = encoded(&Value::BigInt(big));
        assert_eq!(buf[0], marker::BIG_NUMBER);
        assert_eq!(&buf[1..buf.len() - 1], b"345734590893457893457893453458934589");
        assert_eq!(buf[buf.len() - 1], marker::END);
    }

    #[test]
    fn decimal_text_always_has_a_point() {
        let text = |s: &str| decimal_text(&BigDecimal::from_str(s).unwrap());
        assert_eq!(text("2.5"), "2.5");
        assert_eq!(text("123.456"), "123.456");
        assert_eq!(text("-0.05"), "-0.05");
        assert_eq!(text("0.5"), "0.5");
        assert_eq!(text("42"), "42.0");
        assert_eq!(text("1E+3"), "1000.0");
        assert_eq!(text("-7E+1"), "-70.0");
        assert_eq!(text("0"), "0.0");
    }

    #[test]
    fn encode_small_string() {
        assert_eq!(&encoded(&Value::from("Hello"))[..], &[133, b'H', b'e', b'l', b'l', b'o']);
        assert_eq!(&encoded(&Value::from(""))[..], &[128]);
    }

    #[test]
    fn encode_string_boundary() {
        let small = encoded(&Value::from("x".repeat(63)));
        assert_eq!(small[0], 128 + 63);
        assert_eq!(small.len(), 64);

        let large = encoded(&Value::from("x".repeat(64)));
        assert_eq!(&large[..3], b"64:");
        assert_eq!(large.len(), 67);
    }

    #[test]
    fn encode_string_with_charset() {
        let mut buf = BytesMut::new();
        encode_string(&mut buf, "é", Charset::Latin1).unwrap();
        assert_eq!(&buf[..], &[129, 0xE9]);

        buf.clear();
        encode_string(&mut buf, "é", Charset::Utf8).unwrap();
        assert_eq!(&buf[..], &[130, 0xC3, 0xA9]);

        buf.clear();
        assert!(encode_string(&mut buf, "€", Charset::Latin1).is_err());
    }

    #[test]
    fn encode_nested_lists() {
        let value = Value::from(vec![vec![1, 2, 3], vec![4, 5, 6, 7]]);
        assert_eq!(
            &encoded(&value)[..],
            &[194, 195, 1, 2, 3, 196, 4, 5, 6, 7]
        );
    }

    #[test]
    fn encode_list_boundary() {
        let small = encoded(&Value::from(vec![Value::Null; 63]));
        assert_eq!(small[0], 192 + 63);
        assert_eq!(small.len(), 64);

        let large = encoded(&Value::from(vec![Value::Null; 64]));
        assert_eq!(large[0], marker::LARGE_LIST);
        assert_eq!(large[large.len() - 1], marker::END);
        assert_eq!(large.len(), 66);
    }

    #[test]
    fn encode_empty_map() {
        assert_eq!(&encoded(&Value::Map(ValueMap::new()))[..], &[102]);
    }

    #[test]
    fn encode_map_in_key_order() {
        let mut map = ValueMap::new();
        map.insert(Value::Int(2), Value::Byte(b'2' as i8));
        map.insert(Value::Int(1), Value::Byte(b'1' as i8));
        assert_eq!(
            &encoded(&Value::Map(map))[..],
            &[104, 1, 62, b'1', 2, 62, b'2']
        );
    }

    #[test]
    fn encode_large_map() {
        let map: ValueMap = (0..25).map(|i| (Value::Int(i), Value::Null)).collect();
        let buf = encoded(&Value::Map(map));
        assert_eq!(buf[0], marker::LARGE_MAP);
        assert_eq!(buf[buf.len() - 1], marker::END);
        assert_eq!(buf.len(), 2 + 25 * 2);
    }

    #[test]
    fn mismatched_token_is_unsupported() {
        let mut buf = BytesMut::new();
        let err = encode_token(&mut buf, TokenType::Long, &Value::Int(1), Charset::Utf8)
            .unwrap_err();
        assert!(matches!(err, RencodeError::UnsupportedValue(_)));
    }
}
