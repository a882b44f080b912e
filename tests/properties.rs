//! Generated round-trip and idempotence checks.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use proptest::prelude::*;
use rencode::{Charset, RencodeReader, RencodeWriter, Value, from_slice, to_bytes};

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i8>().prop_map(Value::Byte),
        any::<i16>().prop_map(Value::Short),
        any::<i32>().prop_map(Value::Int),
        (-40i32..50).prop_map(Value::Int),
        any::<i64>().prop_map(Value::Long),
        any::<f32>().prop_map(Value::Float),
        any::<f64>().prop_map(Value::Double),
        any::<i128>().prop_map(|v| Value::BigInt(BigInt::from(v))),
        (any::<i64>(), -4i64..12)
            .prop_map(|(unscaled, scale)| Value::Decimal(BigDecimal::new(unscaled.into(), scale))),
        "\\PC{0,80}".prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(4, 256, 80, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..80).prop_map(Value::List),
            prop::collection::btree_map(inner.clone(), inner, 0..30).prop_map(Value::Map),
        ]
    })
}

proptest! {
    #[test]
    fn prop_round_trip(value in arb_value()) {
        let bytes = to_bytes(&value).unwrap();
        prop_assert_eq!(from_slice(&bytes).unwrap(), value);
    }

    #[test]
    fn prop_reencode_is_identical(value in arb_value()) {
        let bytes = to_bytes(&value).unwrap();
        let decoded = from_slice(&bytes).unwrap();
        prop_assert_eq!(to_bytes(&decoded).unwrap(), bytes);
    }

    #[test]
    fn prop_ints_inline_exactly_in_range(v in any::<i32>()) {
        let bytes = to_bytes(&Value::Int(v)).unwrap();
        let inline = (-32..=43).contains(&v);
        prop_assert_eq!(bytes.len(), if inline { 1 } else { 5 });
    }

    #[test]
    fn prop_every_prefix_is_truncated(value in arb_value()) {
        let bytes = to_bytes(&value).unwrap();
        for end in 0..bytes.len() {
            let err = from_slice(&bytes[..end]).unwrap_err();
            prop_assert!(err.is_truncated(), "prefix {} of {:?}: {}", end, &bytes[..], err);
        }
    }

    #[test]
    fn prop_stream_of_values(values in prop::collection::vec(arb_value(), 0..8)) {
        let mut writer = RencodeWriter::new(Vec::new());
        for value in &values {
            writer.write_value(value).unwrap();
        }
        let output = writer.finish().unwrap();
        let decoded = RencodeReader::new(&output[..])
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        prop_assert_eq!(decoded, values);
    }

    #[test]
    fn prop_latin1_strings(text in "[\\x{0}-\\x{FF}]{0,100}") {
        let mut writer = RencodeWriter::with_charset(Vec::new(), Charset::Latin1);
        writer.write_string(&text).unwrap();
        let output = writer.into_inner();
        let mut reader = RencodeReader::with_charset(&output[..], Charset::Latin1);
        prop_assert_eq!(reader.read_string().unwrap(), text);
    }
}
