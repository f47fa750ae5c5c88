//! Conversion between payload bytes and keyed symbol strings.
//!
//! Bytes are read as 6-bit groups, most significant bit first, and each group
//! is written as one symbol. The symbol at data position `i` (0-based, after
//! the key) carries `sextet + key + i + 1` modulo 64, so equal bytes at
//! different offsets produce different characters.

use bitstream::{BitReader, BitWriter};

use crate::alphabet::{Symbol, SYMBOL_BITS};
use crate::error::{TextError, TextResult};
use crate::policy::DecodePolicy;

/// Recoverable irregularities found while decoding under a lenient policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextQuirks {
    /// The last symbol contributed no complete byte and was dropped.
    pub dangling_symbol: bool,
    /// Low bits of the last symbol were non-zero and were dropped.
    pub nonzero_padding: bool,
}

impl TextQuirks {
    /// Returns `true` if the payload was fully canonical.
    #[must_use]
    pub const fn is_clean(self) -> bool {
        !self.dangling_symbol && !self.nonzero_padding
    }
}

/// The result of decoding a payload string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub key: Symbol,
    pub bytes: Vec<u8>,
    pub quirks: TextQuirks,
}

fn offset(key: Symbol, index: usize) -> u8 {
    // only the low six bits matter after rotation
    key.value().wrapping_add(((index + 1) % 64) as u8)
}

/// Encodes `bytes` as a key symbol followed by data symbols.
///
/// The final group is zero-filled, so the output is always canonical.
#[must_use]
pub fn encode_text(bytes: &[u8], key: Symbol) -> String {
    let mut out = String::with_capacity(1 + (bytes.len() * 8).div_ceil(6));
    out.push(key.to_char());

    let mut reader = BitReader::new(bytes);
    let mut index = 0;
    while let Ok(sextet) = reader.read_bits_padded(SYMBOL_BITS) {
        let symbol = Symbol::from_low_bits(sextet as u8).rotate(offset(key, index));
        out.push(symbol.to_char());
        index += 1;
    }
    out
}

/// Decodes a payload string (the text between `[stgy:` and `]`).
///
/// Under [`DecodePolicy::Strict`] a dangling final symbol or non-zero
/// padding bits are errors. Under [`DecodePolicy::Lenient`] they are
/// dropped and reported in [`DecodedText::quirks`].
///
/// # Errors
///
/// Returns [`TextError::MissingKey`] for an empty payload and
/// [`TextError::InvalidSymbol`] for any character outside the alphabet.
pub fn decode_text(payload: &str, policy: DecodePolicy) -> TextResult<DecodedText> {
    let mut chars = payload.chars().enumerate();
    let key = match chars.next() {
        Some((position, c)) => {
            Symbol::from_char(c).ok_or(TextError::InvalidSymbol {
                symbol: c,
                position,
            })?
        }
        None => return Err(TextError::MissingKey),
    };

    let mut writer = BitWriter::with_capacity(payload.len() * 6 / 8);
    let mut last_position = 0;
    for (index, (position, c)) in chars.enumerate() {
        let symbol = Symbol::from_char(c).ok_or(TextError::InvalidSymbol {
            symbol: c,
            position,
        })?;
        let sextet = symbol.unrotate(offset(key, index));
        writer.write_bits(u64::from(sextet.value()), SYMBOL_BITS)?;
        last_position = position;
    }

    let (bytes, tail) = writer.into_parts();
    let mut quirks = TextQuirks::default();
    if tail.bits >= SYMBOL_BITS {
        if policy.is_strict() {
            return Err(TextError::DanglingSymbol {
                position: last_position,
            });
        }
        quirks.dangling_symbol = true;
    } else if tail.value != 0 {
        if policy.is_strict() {
            return Err(TextError::NonZeroPadding {
                bits: tail.bits,
                value: tail.value,
            });
        }
        quirks.nonzero_padding = true;
    }

    Ok(DecodedText { key, bytes, quirks })
}
