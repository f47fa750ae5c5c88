//! Payload header and block framing for the stgy codec.
//!
//! This crate handles the binary layout inside a strategy token once the
//! text and compression layers are peeled off: the 24-byte payload header,
//! the tag-delimited block sequence and limit enforcement. It does not know
//! what a block means, only how long it is.
//!
//! # Design Principles
//!
//! - **Exact reproduction** - Reserved header bytes and pad bytes are kept,
//!   so unframing an unedited payload gives back the same bytes.
//! - **Bounded decoding** - All counts are validated against [`Limits`]
//!   before the framer walks past them.
//! - **Fail closed** - A tag without a rule in the current section is an
//!   error; there is no generic length rule to guess with.
//!
//! See `WIRE_FORMAT.md` for the complete layout.

mod error;
mod frame;
mod header;
mod limits;
mod registry;

pub use error::{DecodeError, EncodeError, HeaderField, LimitKind, WireResult};
pub use frame::{
    array_body_len, frame, read_payload, unframe, write_block, write_payload, PayloadWriter,
    WireBlock, WirePayload, ARRAY_HEAD_SIZE, TAG_SIZE,
};
pub use header::{decode_header, encode_header, PayloadHeader, HEADER_SIZE, VERSION};
pub use limits::Limits;
pub use registry::{
    tags, BlockRegistry, BlockRule, ElementKind, Layout, Section, STANDARD_RULES,
};
