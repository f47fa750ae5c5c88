//! Payload header types and constants.

use crate::error::{DecodeError, EncodeError, HeaderField, WireResult};

/// The only payload version the game produces.
pub const VERSION: u32 = 2;

/// Header size in bytes (24 total).
pub const HEADER_SIZE: usize = 4 + 4 + 10 + 2 + 4;

/// `body_len` counts everything after the first 16 bytes.
const BODY_LEN_BIAS: usize = 16;

/// `content_len` counts everything after the first 28 bytes.
const CONTENT_LEN_BIAS: usize = 28;

/// The fixed 24-byte header in front of the block sequence.
///
/// Reserved bytes are kept as read so that re-encoding an unedited payload
/// reproduces it exactly. See `WIRE_FORMAT.md` for the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PayloadHeader {
    pub version: u32,
    pub body_len: u32,
    pub reserved_a: [u8; 10],
    pub content_len: u16,
    pub reserved_b: [u8; 4],
}

impl Default for PayloadHeader {
    fn default() -> Self {
        Self {
            version: VERSION,
            body_len: 0,
            reserved_a: [0; 10],
            content_len: 0,
            reserved_b: [0; 4],
        }
    }
}

impl PayloadHeader {
    /// Length fields the game writes for a payload of `total_len` bytes.
    ///
    /// `content_len` saturates at zero for payloads too short to hold a
    /// title block.
    pub fn expected_lengths(total_len: usize) -> Result<(u32, u16), EncodeError> {
        let body_len = u32::try_from(total_len.saturating_sub(BODY_LEN_BIAS))
            .map_err(|_| EncodeError::LengthOverflow { length: total_len })?;
        let content_len = u16::try_from(total_len.saturating_sub(CONTENT_LEN_BIAS))
            .map_err(|_| EncodeError::LengthOverflow { length: total_len })?;
        Ok((body_len, content_len))
    }

    /// Returns a copy with both length fields set for `total_len` bytes.
    pub fn with_lengths(self, total_len: usize) -> Result<Self, EncodeError> {
        let (body_len, content_len) = Self::expected_lengths(total_len)?;
        Ok(Self {
            body_len,
            content_len,
            ..self
        })
    }

    /// Checks that both length fields agree with the actual payload length.
    pub fn check_lengths(&self, total_len: usize) -> WireResult<()> {
        let mismatch = |field, header: u32| DecodeError::HeaderLengthMismatch {
            field,
            header,
            actual: total_len,
        };
        let (body_len, content_len) = Self::expected_lengths(total_len)
            .map_err(|_| mismatch(HeaderField::BodyLen, self.body_len))?;
        if self.body_len != body_len {
            return Err(mismatch(HeaderField::BodyLen, self.body_len));
        }
        if self.content_len != content_len {
            return Err(mismatch(
                HeaderField::ContentLen,
                u32::from(self.content_len),
            ));
        }
        Ok(())
    }
}

pub(crate) fn u16_at(buf: &[u8], offset: usize) -> Option<u16> {
    let bytes = buf.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn u32_at(buf: &[u8], offset: usize) -> Option<u32> {
    let bytes = buf.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn array_at<const N: usize>(buf: &[u8], offset: usize) -> Option<[u8; N]> {
    let mut out = [0u8; N];
    out.copy_from_slice(buf.get(offset..offset.checked_add(N)?)?);
    Some(out)
}

/// Decodes the payload header and returns it with the block bytes after it.
///
/// Length fields are not checked here; see [`PayloadHeader::check_lengths`].
pub fn decode_header(buf: &[u8]) -> WireResult<(PayloadHeader, &[u8])> {
    let too_small = DecodeError::PayloadTooSmall {
        actual: buf.len(),
        required: HEADER_SIZE,
    };
    if buf.len() < HEADER_SIZE {
        return Err(too_small);
    }

    let version = u32_at(buf, 0).ok_or_else(|| too_small.clone())?;
    if version != VERSION {
        return Err(DecodeError::UnsupportedVersion { found: version });
    }

    let header = PayloadHeader {
        version,
        body_len: u32_at(buf, 4).ok_or_else(|| too_small.clone())?,
        reserved_a: array_at(buf, 8).ok_or_else(|| too_small.clone())?,
        content_len: u16_at(buf, 18).ok_or_else(|| too_small.clone())?,
        reserved_b: array_at(buf, 20).ok_or(too_small)?,
    };
    Ok((header, &buf[HEADER_SIZE..]))
}

/// Encodes a payload header into the provided output buffer.
pub fn encode_header(header: &PayloadHeader, out: &mut [u8]) -> Result<usize, EncodeError> {
    if out.len() < HEADER_SIZE {
        return Err(EncodeError::BufferTooSmall {
            needed: HEADER_SIZE,
            available: out.len(),
        });
    }

    out[0..4].copy_from_slice(&header.version.to_le_bytes());
    out[4..8].copy_from_slice(&header.body_len.to_le_bytes());
    out[8..18].copy_from_slice(&header.reserved_a);
    out[18..20].copy_from_slice(&header.content_len.to_le_bytes());
    out[20..24].copy_from_slice(&header.reserved_b);

    Ok(HEADER_SIZE)
}
