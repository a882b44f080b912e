//! Capability groups: token types that jointly carry one kind of value.

use std::fmt;

use super::catalog::{
    INLINE_INT_MAX, INLINE_INT_MIN, SMALL_LIST_CAPACITY, SMALL_MAP_CAPACITY,
    SMALL_STRING_CAPACITY, TokenType,
};
use crate::charset::Charset;
use crate::types::Value;

/// A named cluster of token types representing one semantic kind.
///
/// The generic encode path asks each group in [`Group::PRIORITY`] order to
/// select a token for a value; the typed reader/writer entry points check
/// that the resolved token belongs to the requested group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Null,
    Boolean,
    Byte,
    Short,
    Long,
    Float,
    Double,
    Int,
    Number,
    String,
    List,
    Map,
}

impl Group {
    /// Order in which groups are consulted when encoding.
    pub const PRIORITY: [Group; 12] = [
        Self::Null,
        Self::Boolean,
        Self::Byte,
        Self::Short,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Int,
        Self::Number,
        Self::String,
        Self::List,
        Self::Map,
    ];

    /// Token types belonging to this group.
    pub const fn members(self) -> &'static [TokenType] {
        match self {
            Self::Null => &[TokenType::Null],
            Self::Boolean => &[TokenType::True, TokenType::False],
            Self::Byte => &[TokenType::Byte],
            Self::Short => &[TokenType::Short],
            Self::Long => &[TokenType::Long],
            Self::Float => &[TokenType::Float],
            Self::Double => &[TokenType::Double],
            Self::Int => &[TokenType::PositiveInt, TokenType::NegativeInt, TokenType::Int],
            Self::Number => &[
                TokenType::BigNumber,
                TokenType::Byte,
                TokenType::Short,
                TokenType::Long,
                TokenType::Float,
                TokenType::Double,
                TokenType::PositiveInt,
                TokenType::NegativeInt,
                TokenType::Int,
            ],
            Self::String => &[TokenType::SmallString, TokenType::LargeString],
            Self::List => &[TokenType::SmallList, TokenType::LargeList],
            Self::Map => &[TokenType::SmallMap, TokenType::LargeMap],
        }
    }

    pub fn contains(self, token: TokenType) -> bool {
        self.members().contains(&token)
    }

    /// Picks the token type this group would use for `value`, or `None` if
    /// the group cannot represent it. Sized kinds choose the small variant
    /// while the size is below its inline capacity.
    pub fn select(self, value: &Value, charset: Charset) -> Option<TokenType> {
        match (self, value) {
            (Self::Null, Value::Null) => Some(TokenType::Null),
            (Self::Boolean, Value::Bool(true)) => Some(TokenType::True),
            (Self::Boolean, Value::Bool(false)) => Some(TokenType::False),
            (Self::Byte, Value::Byte(_)) => Some(TokenType::Byte),
            (Self::Short, Value::Short(_)) => Some(TokenType::Short),
            (Self::Long, Value::Long(_)) => Some(TokenType::Long),
            (Self::Float, Value::Float(_)) => Some(TokenType::Float),
            (Self::Double, Value::Double(_)) => Some(TokenType::Double),
            (Self::Int, Value::Int(v)) => Some(match *v {
                0..=INLINE_INT_MAX => TokenType::PositiveInt,
                INLINE_INT_MIN..=-1 => TokenType::NegativeInt,
                _ => TokenType::Int,
            }),
            (Self::Number, Value::BigInt(_) | Value::Decimal(_)) => Some(TokenType::BigNumber),
            (Self::Number, _) => [
                Self::Byte,
                Self::Short,
                Self::Long,
                Self::Float,
                Self::Double,
                Self::Int,
            ]
            .into_iter()
            .find_map(|group| group.select(value, charset)),
            (Self::String, Value::String(s)) => {
                Some(if charset.encoded_len(s) < SMALL_STRING_CAPACITY {
                    TokenType::SmallString
                } else {
                    TokenType::LargeString
                })
            }
            (Self::List, Value::List(items)) => Some(if items.len() < SMALL_LIST_CAPACITY {
                TokenType::SmallList
            } else {
                TokenType::LargeList
            }),
            (Self::Map, Value::Map(map)) => Some(if map.len() < SMALL_MAP_CAPACITY {
                TokenType::SmallMap
            } else {
                TokenType::LargeMap
            }),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Boolean => "BOOLEAN",
            Self::Byte => "BYTE",
            Self::Short => "SHORT",
            Self::Long => "LONG",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Int => "INT",
            Self::Number => "NUMBER",
            Self::String => "STRING",
            Self::List => "LIST",
            Self::Map => "MAP",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
