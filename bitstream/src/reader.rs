//! Bit-level reader with bounded operations.

use crate::error::{BitError, BitResult};

/// A bit-level reader that unpacks values most-significant bit first.
///
/// Reads are bounds-checked; a failed read leaves the position unchanged.
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Returns the number of bits remaining to read.
    #[must_use]
    pub const fn bits_remaining(&self) -> usize {
        self.data
            .len()
            .saturating_mul(8)
            .saturating_sub(self.bit_pos)
    }

    /// Returns `true` if there are no more bits to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }

    /// Returns the current bit position.
    #[must_use]
    pub const fn bit_position(&self) -> usize {
        self.bit_pos
    }

    pub fn read_bit(&mut self) -> BitResult<bool> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Reads up to 64 bits as an unsigned integer.
    pub fn read_bits(&mut self, bits: u8) -> BitResult<u64> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }
        let available = self.bits_remaining();
        if usize::from(bits) > available {
            return Err(BitError::UnexpectedEof {
                requested: usize::from(bits),
                available,
            });
        }

        let mut value = 0u64;
        let mut left = bits;
        while left > 0 {
            let byte = self.data[self.bit_pos / 8];
            let used = (self.bit_pos % 8) as u8;
            let take = left.min(8 - used);
            let chunk = (byte >> (8 - used - take)) & (0xFF >> (8 - take));
            value = (value << take) | u64::from(chunk);
            self.bit_pos += usize::from(take);
            left -= take;
        }
        Ok(value)
    }

    /// Reads a `bits`-wide group, zero-filling the low bits when fewer than
    /// `bits` remain.
    ///
    /// Fails only when nothing is left to read.
    pub fn read_bits_padded(&mut self, bits: u8) -> BitResult<u64> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }
        let available = self.bits_remaining();
        if available == 0 {
            return Err(BitError::UnexpectedEof {
                requested: usize::from(bits),
                available,
            });
        }
        if usize::from(bits) <= available {
            return self.read_bits(bits);
        }
        // available < bits <= 64 here, so the cast cannot truncate
        let short = available as u8;
        let value = self.read_bits(short)?;
        Ok(value << (bits - short))
    }
}
