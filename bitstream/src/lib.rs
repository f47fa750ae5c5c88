//! MSB-first bit packing primitives for the stgy codec.
//!
//! This crate provides [`BitWriter`] and [`BitReader`] for bit-level encoding and decoding.
//! The text transcoder uses them to move between 8-bit bytes and 6-bit symbols.
//!
//! # Design Principles
//!
//! - **Bounded reads** - a short buffer is an error, never a panic.
//! - **No domain knowledge** - nothing here knows about symbols or blocks.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b01_0011, 6).unwrap();
//! writer.write_bits(0b01_0110, 6).unwrap();
//!
//! let (bytes, tail) = writer.into_parts();
//! assert_eq!(bytes, vec![0b0100_1101]);
//! assert_eq!(tail.bits, 4);
//!
//! let mut reader = BitReader::new(b"M");
//! assert_eq!(reader.read_bits(6).unwrap(), 0b01_0011);
//! assert_eq!(reader.read_bits_padded(6).unwrap(), 0b01_0000);
//! ```

mod error;
mod reader;
mod writer;

pub use error::{BitError, BitResult};
pub use reader::BitReader;
pub use writer::{BitWriter, PartialByte};
