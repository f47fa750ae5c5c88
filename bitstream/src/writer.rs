//! Bit-level writer for packing fixed-width groups into bytes.

use crate::error::{BitError, BitResult};

/// Bits written after the last complete byte.
///
/// `value` holds the `bits` low-order bits, right-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartialByte {
    pub value: u8,
    pub bits: u8,
}

impl PartialByte {
    /// Returns `true` if no bits are pending.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }
}

/// A bit-level writer that packs values most-significant bit first.
///
/// Call [`finish`](Self::finish) for a zero-padded byte buffer, or
/// [`into_parts`](Self::into_parts) to keep the trailing bits apart from the
/// complete bytes.
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    /// Bits not yet making up a whole byte, right-aligned.
    pending: u8,
    pending_bits: u8,
}

impl BitWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with room for `bytes` complete bytes.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    /// Returns the number of bits written so far.
    #[must_use]
    pub fn bits_written(&self) -> usize {
        self.bytes.len() * 8 + usize::from(self.pending_bits)
    }

    pub fn write_bit(&mut self, value: bool) {
        self.push_chunk(u8::from(value), 1);
    }

    /// Appends the low `take` bits of `chunk`; `take` never exceeds the
    /// room left in the pending byte.
    fn push_chunk(&mut self, chunk: u8, take: u8) {
        let shifted = (u16::from(self.pending) << take) | u16::from(chunk);
        self.pending = (shifted & 0xFF) as u8;
        self.pending_bits += take;
        if self.pending_bits == 8 {
            self.bytes.push(self.pending);
            self.pending = 0;
            self.pending_bits = 0;
        }
    }

    /// Writes the low `bits` bits of `value`, most-significant first.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidBitCount`] if `bits > 64`.
    /// Returns [`BitError::ValueOutOfRange`] if `value` doesn't fit in `bits`.
    pub fn write_bits(&mut self, value: u64, bits: u8) -> BitResult<()> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }
        if bits < 64 && value >> bits != 0 {
            return Err(BitError::ValueOutOfRange { value, bits });
        }

        let mut left = bits;
        while left > 0 {
            let take = left.min(8 - self.pending_bits);
            let chunk = (value >> (left - take)) & ((1u64 << take) - 1);
            self.push_chunk(chunk as u8, take);
            left -= take;
        }
        Ok(())
    }

    /// Returns the written bytes, zero-filling the last one if it is
    /// incomplete.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        let (mut bytes, tail) = self.into_parts();
        if !tail.is_empty() {
            bytes.push(tail.value << (8 - tail.bits));
        }
        bytes
    }

    /// Returns the complete bytes and the bits after them.
    #[must_use]
    pub fn into_parts(self) -> (Vec<u8>, PartialByte) {
        let tail = PartialByte {
            value: self.pending,
            bits: self.pending_bits,
        };
        (self.bytes, tail)
    }
}
