//! Token catalog: which token type owns which leading byte.
//!
//! Every byte value is claimed by at most one [`TokenType`]. The global
//! [`CATALOG`] is built by a `const fn` that panics on any overlap, so an
//! overlapping table is a compile error rather than a runtime surprise.

use std::fmt;

use super::group::Group;
use super::marker;
use crate::charset::Charset;
use crate::types::Value;

/// The byte (or bytes) a token type claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenId {
    Single(u8),
    /// Inclusive range; the offset from `start` carries an inline value.
    Range { start: u8, end: u8 },
}

impl TokenId {
    pub const fn claims(self, byte: u8) -> bool {
        match self {
            Self::Single(id) => byte == id,
            Self::Range { start, end } => byte >= start && byte <= end,
        }
    }

    /// Number of bytes claimed.
    pub const fn capacity(self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Range { start, end } => (end - start) as usize + 1,
        }
    }
}

/// A wire-format rule with its own id or id range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    PositiveInt,
    Double,
    LargeString,
    LargeList,
    LargeMap,
    BigNumber,
    Byte,
    Short,
    Int,
    Long,
    Float,
    True,
    False,
    Null,
    NegativeInt,
    SmallMap,
    End,
    SmallString,
    SmallList,
}

impl TokenType {
    /// Every token type, in ascending order of first claimed byte.
    pub const ALL: [TokenType; 19] = [
        Self::PositiveInt,
        Self::Double,
        Self::LargeString,
        Self::LargeList,
        Self::LargeMap,
        Self::BigNumber,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::True,
        Self::False,
        Self::Null,
        Self::NegativeInt,
        Self::SmallMap,
        Self::End,
        Self::SmallString,
        Self::SmallList,
    ];

    pub const fn id(self) -> TokenId {
        match self {
            Self::PositiveInt => TokenId::Range {
                start: marker::POSITIVE_INT_START,
                end: marker::POSITIVE_INT_END,
            },
            Self::Double => TokenId::Single(marker::DOUBLE),
            Self::LargeString => TokenId::Range {
                start: marker::LARGE_STRING_START,
                end: marker::LARGE_STRING_END,
            },
            Self::LargeList => TokenId::Single(marker::LARGE_LIST),
            Self::LargeMap => TokenId::Single(marker::LARGE_MAP),
            Self::BigNumber => TokenId::Single(marker::BIG_NUMBER),
            Self::Byte => TokenId::Single(marker::BYTE),
            Self::Short => TokenId::Single(marker::SHORT),
            Self::Int => TokenId::Single(marker::INT),
            Self::Long => TokenId::Single(marker::LONG),
            Self::Float => TokenId::Single(marker::FLOAT),
            Self::True => TokenId::Single(marker::TRUE),
            Self::False => TokenId::Single(marker::FALSE),
            Self::Null => TokenId::Single(marker::NULL),
            Self::NegativeInt => TokenId::Range {
                start: marker::NEGATIVE_INT_START,
                end: marker::NEGATIVE_INT_END,
            },
            Self::SmallMap => TokenId::Range {
                start: marker::SMALL_MAP_START,
                end: marker::SMALL_MAP_END,
            },
            Self::End => TokenId::Single(marker::END),
            Self::SmallString => TokenId::Range {
                start: marker::SMALL_STRING_START,
                end: marker::SMALL_STRING_END,
            },
            Self::SmallList => TokenId::Range {
                start: marker::SMALL_LIST_START,
                end: marker::SMALL_LIST_END,
            },
        }
    }

    pub const fn capacity(self) -> usize {
        self.id().capacity()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::PositiveInt => "positive small int",
            Self::Double => "double",
            Self::LargeString => "large string",
            Self::LargeList => "large list",
            Self::LargeMap => "large map",
            Self::BigNumber => "big number",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
            Self::NegativeInt => "negative small int",
            Self::SmallMap => "small map",
            Self::End => "end-of-container",
            Self::SmallString => "small string",
            Self::SmallList => "small list",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inline capacities, derived from the zone widths.
pub const SMALL_STRING_CAPACITY: usize = TokenType::SmallString.capacity();
pub const SMALL_LIST_CAPACITY: usize = TokenType::SmallList.capacity();
pub const SMALL_MAP_CAPACITY: usize = TokenType::SmallMap.capacity();

/// Inclusive bounds of integers that fit in a single byte.
pub const INLINE_INT_MIN: i32 = -(TokenType::NegativeInt.capacity() as i32);
pub const INLINE_INT_MAX: i32 = TokenType::PositiveInt.capacity() as i32 - 1;

/// Immutable byte-to-token lookup.
#[derive(Debug)]
pub struct Catalog {
    by_byte: [Option<TokenType>; 256],
}

/// The catalog used by every encoder and decoder.
pub static CATALOG: Catalog = Catalog::build(&TokenType::ALL);

impl Catalog {
    /// Builds the lookup table. Panics (at compile time when used for a
    /// `static`) if two token types claim the same byte.
    pub const fn build(types: &[TokenType]) -> Self {
        if Self::find_overlap(types).is_some() {
            panic!("token types claim overlapping bytes");
        }

        let mut by_byte = [None; 256];
        let mut i = 0;
        while i < types.len() {
            let id = types[i].id();
            let mut b = 0;
            while b < 256 {
                if id.claims(b as u8) {
                    by_byte[b] = Some(types[i]);
                }
                b += 1;
            }
            i += 1;
        }
        Self { by_byte }
    }

    /// Returns the first byte claimed by more than one token type, with the
    /// two claimants.
    pub const fn find_overlap(types: &[TokenType]) -> Option<(u8, TokenType, TokenType)> {
        let mut i = 0;
        while i < types.len() {
            let mut j = i + 1;
            while j < types.len() {
                let (a, b) = (types[i].id(), types[j].id());
                let mut byte = 0;
                while byte < 256 {
                    if a.claims(byte as u8) && b.claims(byte as u8) {
                        return Some((byte as u8, types[i], types[j]));
                    }
                    byte += 1;
                }
                j += 1;
            }
            i += 1;
        }
        None
    }

    /// Decode-side lookup: the token type claiming `byte`.
    pub fn resolve_by_byte(&self, byte: u8) -> Option<TokenType> {
        self.by_byte[usize::from(byte)]
    }

    /// Encode-side lookup: walks the capability groups in priority order and
    /// returns the first token type able to carry `value`.
    pub fn resolve_by_value(&self, value: &Value, charset: Charset) -> Option<TokenType> {
        Group::PRIORITY
            .iter()
            .find_map(|group| group.select(value, charset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_byte_has_at_most_one_claimant() {
        assert_eq!(Catalog::find_overlap(&TokenType::ALL), None);
        for byte in 0..=255u8 {
            let claimants = TokenType::ALL
                .iter()
                .filter(|t| t.id().claims(byte))
                .count();
            assert!(claimants <= 1, "byte {byte} claimed {claimants} times");
        }
    }

    #[test]
    fn overlap_is_detected() {
        let overlapping = [TokenType::SmallString, TokenType::Null, TokenType::SmallString];
        assert_eq!(
            Catalog::find_overlap(&overlapping),
            Some((128, TokenType::SmallString, TokenType::SmallString))
        );
    }

    #[test]
    fn partial_table_leaves_other_bytes_unclaimed() {
        let catalog = Catalog::build(&[TokenType::Null, TokenType::SmallList]);
        assert_eq!(catalog.resolve_by_byte(marker::NULL), Some(TokenType::Null));
        assert_eq!(catalog.resolve_by_byte(200), Some(TokenType::SmallList));
        assert_eq!(catalog.resolve_by_byte(0), None);
    }

    #[test]
    fn terminator_is_only_claimed_by_end() {
        assert_eq!(CATALOG.resolve_by_byte(marker::END), Some(TokenType::End));
        let others = TokenType::ALL
            .iter()
            .filter(|t| **t != TokenType::End)
            .any(|t| t.id().claims(marker::END));
        assert!(!others);
    }

    #[test]
    fn unclaimed_bytes() {
        for byte in [b'-', b'.', b'/', b':'] {
            assert_eq!(CATALOG.resolve_by_byte(byte), None, "byte {byte}");
        }
        let claimed = (0..=255u8)
            .filter(|b| CATALOG.resolve_by_byte(*b).is_some())
            .count();
        assert_eq!(claimed, 252);
    }

    #[test]
    fn resolve_by_byte_zones() {
        assert_eq!(CATALOG.resolve_by_byte(0), Some(TokenType::PositiveInt));
        assert_eq!(CATALOG.resolve_by_byte(43), Some(TokenType::PositiveInt));
        assert_eq!(CATALOG.resolve_by_byte(44), Some(TokenType::Double));
        assert_eq!(CATALOG.resolve_by_byte(b'0'), Some(TokenType::LargeString));
        assert_eq!(CATALOG.resolve_by_byte(b'9'), Some(TokenType::LargeString));
        assert_eq!(CATALOG.resolve_by_byte(65), Some(TokenType::Long));
        assert_eq!(CATALOG.resolve_by_byte(101), Some(TokenType::NegativeInt));
        assert_eq!(CATALOG.resolve_by_byte(102), Some(TokenType::SmallMap));
        assert_eq!(CATALOG.resolve_by_byte(126), Some(TokenType::SmallMap));
        assert_eq!(CATALOG.resolve_by_byte(191), Some(TokenType::SmallString));
        assert_eq!(CATALOG.resolve_by_byte(192), Some(TokenType::SmallList));
        assert_eq!(CATALOG.resolve_by_byte(255), Some(TokenType::SmallList));
    }

    #[test]
    fn inline_capacities() {
        assert_eq!(SMALL_STRING_CAPACITY, 64);
        assert_eq!(SMALL_LIST_CAPACITY, 64);
        assert_eq!(SMALL_MAP_CAPACITY, 25);
        assert_eq!(INLINE_INT_MIN, -32);
        assert_eq!(INLINE_INT_MAX, 43);
    }

    #[test]
    fn resolve_by_value_picks_variant_by_size() {
        let utf8 = Charset::Utf8;
        assert_eq!(
            CATALOG.resolve_by_value(&Value::Int(43), utf8),
            Some(TokenType::PositiveInt)
        );
        assert_eq!(CATALOG.resolve_by_value(&Value::Int(44), utf8), Some(TokenType::Int));
        assert_eq!(
            CATALOG.resolve_by_value(&Value::Int(-32), utf8),
            Some(TokenType::NegativeInt)
        );
        assert_eq!(CATALOG.resolve_by_value(&Value::Int(-33), utf8), Some(TokenType::Int));
        assert_eq!(
            CATALOG.resolve_by_value(&Value::from("a".repeat(63)), utf8),
            Some(TokenType::SmallString)
        );
        assert_eq!(
            CATALOG.resolve_by_value(&Value::from("a".repeat(64)), utf8),
            Some(TokenType::LargeString)
        );
        assert_eq!(
            CATALOG.resolve_by_value(&Value::from(vec![0; 64]), utf8),
            Some(TokenType::LargeList)
        );
        assert_eq!(CATALOG.resolve_by_value(&Value::Null, utf8), Some(TokenType::Null));
    }

    #[test]
    fn string_size_is_measured_in_encoded_bytes() {
        // 32 two-byte characters: 64 bytes in UTF-8, 32 in Latin-1.
        let text = Value::from("é".repeat(32));
        assert_eq!(
            CATALOG.resolve_by_value(&text, Charset::Utf8),
            Some(TokenType::LargeString)
        );
        assert_eq!(
            CATALOG.resolve_by_value(&text, Charset::Latin1),
            Some(TokenType::SmallString)
        );
    }
}
