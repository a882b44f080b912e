//! Dynamic value types moved by the codec.

mod number;
mod value;

pub use number::Number;
pub use value::{Value, ValueMap};
