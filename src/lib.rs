//! rencode: a pure-Rust codec for the rencode binary format.
//!
//! rencode is a compact, self-describing serialization format in the
//! bencode family. Every value begins with a single leading byte that
//! identifies its type and, for small values, carries the value or its
//! length inline.
//!
//! # Architecture
//!
//! - **`codec`**: Token catalog, capability groups, encoding and decoding
//! - **`stream`**: `RencodeWriter`/`RencodeReader` over `std::io`
//! - **`types`**: The dynamic `Value` model and `Number`
//! - **`charset`**: Text encodings used for string payloads
//!
//! ```
//! use rencode::{Value, from_slice, to_bytes};
//!
//! let value = Value::from(vec![Value::from("Hello"), Value::Int(-10)]);
//! let bytes = to_bytes(&value).unwrap();
//! assert_eq!(from_slice(&bytes).unwrap(), value);
//! ```

pub mod charset;
pub mod codec;
pub mod error;
pub mod stream;
pub mod types;

pub use charset::Charset;
pub use codec::{Group, TokenType, decode_value, encode_value, from_slice, to_bytes};
pub use error::RencodeError;
pub use stream::{RencodeReader, RencodeWriter};
pub use types::{Number, Value, ValueMap};
