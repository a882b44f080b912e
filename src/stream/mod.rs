//! Incremental reading and writing over `std::io` streams.

pub mod reader;
pub mod writer;

pub use reader::RencodeReader;
pub use writer::RencodeWriter;
