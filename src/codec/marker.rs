//! Rencode id byte constants.
//!
//! Ranges are inclusive. The table in `catalog` is the authority on which
//! token type owns which byte; these are the raw numbers it is built from.

// Inline positive integer: the byte is the value (0..=43)
pub const POSITIVE_INT_START: u8 = 0;
pub const POSITIVE_INT_END: u8 = 43;

// Double (8-byte IEEE 754)
pub const DOUBLE: u8 = 44;

// Large string: ASCII decimal length, ':' then the payload (netstring)
pub const LARGE_STRING_START: u8 = b'0';
pub const LARGE_STRING_END: u8 = b'9';
pub const LENGTH_DELIMITER: u8 = b':';

// Terminator-delimited containers
pub const LARGE_LIST: u8 = 59;
pub const LARGE_MAP: u8 = 60;

// Big number: ASCII numeral text then END
pub const BIG_NUMBER: u8 = 61;

// Fixed-width big-endian numbers
pub const BYTE: u8 = 62;
pub const SHORT: u8 = 63;
pub const INT: u8 = 64;
pub const LONG: u8 = 65;
pub const FLOAT: u8 = 66;

// Singletons
pub const TRUE: u8 = 67;
pub const FALSE: u8 = 68;
pub const NULL: u8 = 69;

// Inline negative integer: value = NEGATIVE_INT_START - 1 - byte (-1..=-32)
pub const NEGATIVE_INT_START: u8 = 70;
pub const NEGATIVE_INT_END: u8 = 101;

// Small map: byte = start + pair count (0..=24)
pub const SMALL_MAP_START: u8 = 102;
pub const SMALL_MAP_END: u8 = 126;

// End of large container or big-number text
pub const END: u8 = 127;

// Small string: byte = start + byte length (0..=63)
pub const SMALL_STRING_START: u8 = 128;
pub const SMALL_STRING_END: u8 = 191;

// Small list: byte = start + element count (0..=63)
pub const SMALL_LIST_START: u8 = 192;
pub const SMALL_LIST_END: u8 = 255;
