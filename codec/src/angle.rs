//! Angle blocks and the angle sign rule.

use wire::tags;

use crate::array::{decode_array, encode_array};
use crate::error::{CodecError, CodecResult};

/// Converts a raw angle word to degrees: raw values above 32767 are
/// `raw - 65536`.
#[must_use]
pub const fn decode_angle(raw: u16) -> i16 {
    if raw > 0x7FFF {
        (raw as i32 - 0x1_0000) as i16
    } else {
        raw as i16
    }
}

/// Converts degrees to a raw angle word: negative angles are
/// `angle + 65536`.
#[must_use]
pub const fn encode_angle(angle: i16) -> u16 {
    if angle < 0 {
        (angle as i32 + 0x1_0000) as u16
    } else {
        angle as u16
    }
}

/// Per-object rotation in degrees.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AngleBlock {
    pub angles: Vec<i16>,
}

impl AngleBlock {
    #[must_use]
    pub fn new(angles: Vec<i16>) -> Self {
        Self { angles }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.angles.len()
    }

    /// Decodes an angle block body (everything after the tag).
    ///
    /// A body holding fewer words than its count is an
    /// [`CodecError::AngleCountMismatch`].
    pub fn decode(body: &[u8]) -> CodecResult<Self> {
        match decode_array::<i16>(tags::ANGLES, body) {
            Ok(array) => Ok(Self::new(array.values)),
            Err(CodecError::ElementCountMismatch {
                count, available, ..
            }) => Err(CodecError::AngleCountMismatch { count, available }),
            Err(err) => Err(err),
        }
    }

    /// Appends the encoded body to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) -> CodecResult<()> {
        encode_array(tags::ANGLES, &self.angles, 0, out)
    }
}
