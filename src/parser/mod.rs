//! Basic low-level text handling: byte scanning and delimiter escaping.
pub mod byte_parser;
pub mod codec;

pub use byte_parser::ByteParser;
