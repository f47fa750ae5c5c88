//! Configurable limits for bounded decoding.

/// Wire-level limits for payload framing.
///
/// These limits are enforced during decoding so a hostile token cannot make
/// the framer allocate without bound. Typed body limits belong to the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum inflated payload size in bytes.
    pub max_payload_bytes: usize,

    /// Maximum number of blocks in a payload.
    pub max_blocks: usize,

    /// Maximum element count of a single array block.
    pub max_array_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // the game caps boards well below this
            max_payload_bytes: 64 * 1024,
            max_blocks: 4096,
            max_array_len: 1024,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_payload_bytes: 4096,
            max_blocks: 64,
            max_array_len: 32,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_payload_bytes: usize::MAX,
            max_blocks: usize::MAX,
            max_array_len: usize::MAX,
        }
    }
}
