//! Numeric subset of [`Value`], returned by the NUMBER-group typed read.

use std::fmt;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::ToPrimitive;

use super::Value;

/// Any value carried by a NUMBER-group token.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    BigInt(BigInt),
    Decimal(BigDecimal),
}

impl Number {
    /// Converts to `f64`. Lossy for longs and big numbers beyond 2^53, and
    /// `None` only if a big number cannot be represented at all.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Byte(v) => Some(f64::from(*v)),
            Self::Short(v) => Some(f64::from(*v)),
            Self::Int(v) => Some(f64::from(*v)),
            Self::Long(v) => v.to_f64(),
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            Self::BigInt(v) => v.to_f64(),
            Self::Decimal(v) => v.to_f64(),
        }
    }

    /// Converts to `i64` if the number is integral and in range.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Self::Byte(v) => Some(i64::from(*v)),
            Self::Short(v) => Some(i64::from(*v)),
            Self::Int(v) => Some(i64::from(*v)),
            Self::Long(v) => Some(*v),
            Self::BigInt(v) => v.to_i64(),
            Self::Decimal(v) if v.is_integer() => v.to_i64(),
            Self::Float(_) | Self::Double(_) | Self::Decimal(_) => None,
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Byte(v) => Self::Byte(v),
            Number::Short(v) => Self::Short(v),
            Number::Int(v) => Self::Int(v),
            Number::Long(v) => Self::Long(v),
            Number::Float(v) => Self::Float(v),
            Number::Double(v) => Self::Double(v),
            Number::BigInt(v) => Self::BigInt(v),
            Number::Decimal(v) => Self::Decimal(v),
        }
    }
}

impl TryFrom<Value> for Number {
    /// Non-numeric values are handed back unchanged.
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Byte(v) => Ok(Self::Byte(v)),
            Value::Short(v) => Ok(Self::Short(v)),
            Value::Int(v) => Ok(Self::Int(v)),
            Value::Long(v) => Ok(Self::Long(v)),
            Value::Float(v) => Ok(Self::Float(v)),
            Value::Double(v) => Ok(Self::Double(v)),
            Value::BigInt(v) => Ok(Self::BigInt(v)),
            Value::Decimal(v) => Ok(Self::Decimal(v)),
            other => Err(other),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::BigInt(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
        }
    }
}
