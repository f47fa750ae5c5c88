//! Error types for the text layer.

use std::fmt;

/// Result type for text layer operations.
pub type TextResult<T> = Result<T, TextError>;

/// Errors raised while unwrapping or transcoding a strategy token.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TextError {
    /// The token is not of the form `[stgy:<payload>]`.
    MalformedEnvelope { fault: EnvelopeFault },

    /// The payload has no key symbol.
    MissingKey,

    /// A character outside the alphabet, at a char index within the payload.
    InvalidSymbol { symbol: char, position: usize },

    /// The final symbol carries no complete byte.
    DanglingSymbol { position: usize },

    /// The unused low bits of the final symbol are not zero.
    NonZeroPadding { bits: u8, value: u8 },

    /// Bit packing failed.
    Bitstream(bitstream::BitError),
}

/// What is wrong with a token envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeFault {
    MissingPrefix,
    MissingSuffix,
    EmptyPayload,
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedEnvelope { fault } => write!(f, "malformed envelope: {fault}"),
            Self::MissingKey => write!(f, "payload has no key symbol"),
            Self::InvalidSymbol { symbol, position } => {
                write!(f, "invalid symbol {symbol:?} at position {position}")
            }
            Self::DanglingSymbol { position } => {
                write!(f, "dangling symbol at position {position} carries no byte")
            }
            Self::NonZeroPadding { bits, value } => {
                write!(f, "{bits} padding bits are non-zero (0b{value:b})")
            }
            Self::Bitstream(err) => write!(f, "bitstream error: {err}"),
        }
    }
}

impl fmt::Display for EnvelopeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::MissingPrefix => "missing \"[stgy:\" prefix",
            Self::MissingSuffix => "missing closing \"]\"",
            Self::EmptyPayload => "empty payload",
        };
        write!(f, "{reason}")
    }
}

impl std::error::Error for TextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bitstream(err) => Some(err),
            _ => None,
        }
    }
}

impl From<bitstream::BitError> for TextError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Bitstream(err)
    }
}
