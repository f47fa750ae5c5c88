//! Error types for codec operations.

use std::fmt;

use text::TextError;
use wire::{ElementKind, Section};

use crate::compress::Container;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding or encoding a strategy.
///
/// Every stage failure aborts the whole call; no partial strategy is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
    /// Envelope or symbol error.
    Text(TextError),

    /// Payload header or framing error.
    Wire(wire::DecodeError),

    /// Payload assembly error.
    Encode(wire::EncodeError),

    /// The compressed stream could not be inflated.
    Inflate { reason: String },

    /// The payload could not be deflated.
    Deflate { reason: String },

    /// The stream inflates but is not what this codec would emit.
    NonCanonicalCompression { container: Container },

    /// An angle block holds fewer words than its count.
    AngleCountMismatch { count: u16, available: usize },

    /// An array block holds fewer elements than its count.
    ElementCountMismatch {
        tag: u16,
        count: u16,
        available: usize,
    },

    /// An array block carries a different element kind than its tag uses.
    ElementKindMismatch {
        tag: u16,
        expected: ElementKind,
        found: u16,
    },

    /// A block body has the wrong length for its typed layout.
    BodyLength {
        tag: u16,
        expected: usize,
        actual: usize,
    },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// The model cannot be written as a payload.
    InvalidModel(ModelFault),
}

/// Codec-level limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    TokenLength,
    CompressedBytes,
    PayloadBytes,
}

/// Why a strategy model cannot be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelFault {
    /// An objects-section block follows a parameters-section block.
    ObjectAfterParameters { index: usize },

    /// The first parameters block has a tag the objects section also uses,
    /// so it would be read back as an objects block.
    AmbiguousSectionStart { index: usize, tag: u16 },

    /// An opaque block has no framing rule where it sits.
    UnframedOpaque {
        index: usize,
        tag: u16,
        section: Section,
    },

    /// An opaque block uses a section and tag that decode as a typed block.
    TypedOpaque { index: usize, tag: u16 },

    /// An opaque body does not match the layout of its framing rule, so it
    /// would be split differently on decode.
    OpaqueLayout {
        index: usize,
        tag: u16,
        len: usize,
        expected: Option<usize>,
    },

    /// A text or array is too long for its 16-bit length field.
    TooLong { tag: u16, len: usize },
}

/// Coarse classification of a [`CodecError`], suitable for user-facing
/// "invalid code" messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Not a `[stgy:...]` token at all.
    Envelope,
    /// Characters or bit layout of the payload are wrong.
    Symbols,
    /// The compressed stream is damaged or non-canonical.
    Compression,
    /// The payload inflates but its blocks do not parse.
    Structure,
    /// A size limit was hit.
    Limits,
    /// The model handed to the encoder is inconsistent.
    Model,
}

impl CodecError {
    /// Returns the coarse kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Text(TextError::MalformedEnvelope { .. }) => ErrorKind::Envelope,
            Self::Text(_) => ErrorKind::Symbols,
            Self::Inflate { .. } | Self::NonCanonicalCompression { .. } => ErrorKind::Compression,
            Self::Wire(wire::DecodeError::LimitsExceeded { .. }) | Self::LimitsExceeded { .. } => {
                ErrorKind::Limits
            }
            Self::Wire(_)
            | Self::AngleCountMismatch { .. }
            | Self::ElementCountMismatch { .. }
            | Self::ElementKindMismatch { .. }
            | Self::BodyLength { .. } => ErrorKind::Structure,
            Self::Encode(_) | Self::Deflate { .. } | Self::InvalidModel(_) => ErrorKind::Model,
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(err) => write!(f, "text error: {err}"),
            Self::Wire(err) => write!(f, "wire error: {err}"),
            Self::Encode(err) => write!(f, "encode error: {err}"),
            Self::Inflate { reason } => write!(f, "inflate failed: {reason}"),
            Self::Deflate { reason } => write!(f, "deflate failed: {reason}"),
            Self::NonCanonicalCompression { container } => {
                write!(f, "non-canonical compression: {container} stream")
            }
            Self::AngleCountMismatch { count, available } => {
                write!(
                    f,
                    "angle block declares {count} angles but holds {available}"
                )
            }
            Self::ElementCountMismatch {
                tag,
                count,
                available,
            } => {
                write!(
                    f,
                    "block 0x{tag:04X} declares {count} elements but holds {available}"
                )
            }
            Self::ElementKindMismatch {
                tag,
                expected,
                found,
            } => {
                write!(
                    f,
                    "block 0x{tag:04X} expects element kind {} but has {found}",
                    expected.raw()
                )
            }
            Self::BodyLength {
                tag,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "block 0x{tag:04X} body is {actual} bytes, expected {expected}"
                )
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::InvalidModel(fault) => write!(f, "invalid model: {fault}"),
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TokenLength => "token length",
            Self::CompressedBytes => "compressed bytes",
            Self::PayloadBytes => "payload bytes",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for ModelFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectAfterParameters { index } => {
                write!(f, "block {index} belongs before the parameter blocks")
            }
            Self::AmbiguousSectionStart { index, tag } => {
                write!(
                    f,
                    "block {index} (0x{tag:04X}) cannot open the parameters section"
                )
            }
            Self::UnframedOpaque {
                index,
                tag,
                section,
            } => {
                write!(
                    f,
                    "opaque block {index} (0x{tag:04X}) has no rule in the {section} section"
                )
            }
            Self::TypedOpaque { index, tag } => {
                write!(
                    f,
                    "opaque block {index} (0x{tag:04X}) would decode as a typed block"
                )
            }
            Self::OpaqueLayout {
                index,
                tag,
                len,
                expected: Some(expected),
            } => {
                write!(
                    f,
                    "opaque block {index} (0x{tag:04X}) is {len} bytes but its layout frames {expected}"
                )
            }
            Self::OpaqueLayout {
                index,
                tag,
                len,
                expected: None,
            } => {
                write!(
                    f,
                    "opaque block {index} (0x{tag:04X}) of {len} bytes has no readable length"
                )
            }
            Self::TooLong { tag, len } => {
                write!(f, "block 0x{tag:04X} holds {len} items, more than 65535")
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::Envelope => "not a strategy code",
            Self::Symbols => "strategy code contains invalid characters",
            Self::Compression => "strategy code is damaged",
            Self::Structure => "strategy code has an unexpected layout",
            Self::Limits => "strategy code is too large",
            Self::Model => "strategy cannot be encoded",
        };
        write!(f, "{message}")
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Text(err) => Some(err),
            Self::Wire(err) => Some(err),
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TextError> for CodecError {
    fn from(err: TextError) -> Self {
        Self::Text(err)
    }
}

impl From<wire::DecodeError> for CodecError {
    fn from(err: wire::DecodeError) -> Self {
        Self::Wire(err)
    }
}

impl From<wire::EncodeError> for CodecError {
    fn from(err: wire::EncodeError) -> Self {
        Self::Encode(err)
    }
}

impl From<ModelFault> for CodecError {
    fn from(fault: ModelFault) -> Self {
        Self::InvalidModel(fault)
    }
}
