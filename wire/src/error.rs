//! Error types for wire format operations.

use std::fmt;

use crate::registry::Section;

/// Result type for wire format operations.
pub type WireResult<T> = Result<T, DecodeError>;

/// High-level decode errors for the payload header and block framing.
///
/// Offsets are byte positions within the buffer handed to the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Payload is too small to contain the header.
    PayloadTooSmall { actual: usize, required: usize },

    /// Unsupported payload version.
    UnsupportedVersion { found: u32 },

    /// A header length field disagrees with the payload length.
    HeaderLengthMismatch {
        field: HeaderField,
        header: u32,
        actual: usize,
    },

    /// No framing rule exists for this tag in the current section.
    UnknownBlockTag {
        tag: u16,
        section: Section,
        offset: usize,
    },

    /// An array block names an element kind with no known size.
    UnknownElementKind { tag: u16, kind: u16, offset: usize },

    /// A block body runs past the end of the payload.
    TruncatedBlock {
        tag: u16,
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Fewer than two bytes remain where a tag was expected.
    TruncatedTag { offset: usize },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Header length fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    BodyLen,
    ContentLen,
}

/// Specific wire limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    PayloadBytes,
    BlockCount,
    ArrayLength,
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    BufferTooSmall { needed: usize, available: usize },
    LengthOverflow { length: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PayloadTooSmall { actual, required } => {
                write!(
                    f,
                    "payload too small: {actual} bytes, need at least {required}"
                )
            }
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported payload version: {found}")
            }
            Self::HeaderLengthMismatch {
                field,
                header,
                actual,
            } => {
                write!(
                    f,
                    "header {field} is {header} but payload is {actual} bytes"
                )
            }
            Self::UnknownBlockTag {
                tag,
                section,
                offset,
            } => {
                write!(
                    f,
                    "unknown block tag 0x{tag:04X} in {section} section at offset {offset}"
                )
            }
            Self::UnknownElementKind { tag, kind, offset } => {
                write!(
                    f,
                    "unknown element kind {kind} in block 0x{tag:04X} at offset {offset}"
                )
            }
            Self::TruncatedBlock {
                tag,
                offset,
                needed,
                available,
            } => {
                write!(
                    f,
                    "truncated block 0x{tag:04X} at offset {offset}: need {needed} bytes, have {available}"
                )
            }
            Self::TruncatedTag { offset } => {
                write!(f, "truncated block tag at offset {offset}")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BodyLen => "body length",
            Self::ContentLen => "content length",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PayloadBytes => "payload bytes",
            Self::BlockCount => "block count",
            Self::ArrayLength => "array length",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall { needed, available } => {
                write!(f, "buffer too small: need {needed}, have {available}")
            }
            Self::LengthOverflow { length } => {
                write!(f, "length overflow: {length}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl std::error::Error for EncodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tag_display_is_hex() {
        let err = DecodeError::UnknownBlockTag {
            tag: 0x00FE,
            section: Section::Parameters,
            offset: 40,
        };
        let msg = err.to_string();
        assert!(msg.contains("0x00FE"));
        assert!(msg.contains("parameters"));
        assert!(msg.contains("40"));
    }

    #[test]
    fn decode_error_display_limits_exceeded() {
        let err = DecodeError::LimitsExceeded {
            kind: LimitKind::BlockCount,
            limit: 4,
            actual: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("block count"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn truncated_block_display() {
        let err = DecodeError::TruncatedBlock {
            tag: 6,
            offset: 30,
            needed: 10,
            available: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("truncated"));
        assert!(msg.contains("0x0006"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn header_mismatch_names_field() {
        let err = DecodeError::HeaderLengthMismatch {
            field: HeaderField::ContentLen,
            header: 5,
            actual: 64,
        };
        assert!(err.to_string().contains("content length"));
    }

    #[test]
    fn encode_error_display() {
        let err = EncodeError::BufferTooSmall {
            needed: 10,
            available: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("buffer too small"));
    }
}
