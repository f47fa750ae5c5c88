//! Limits and options for codec-level decoding.

use text::DecodePolicy;
use wire::{BlockRegistry, Limits as WireLimits};

use crate::error::{CodecError, CodecResult, LimitKind};

/// Size caps checked before each decode stage does its work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLimits {
    /// Maximum token length in bytes, envelope included.
    pub max_token_len: usize,
    /// Maximum length of the compressed stream after symbol decoding.
    pub max_compressed_bytes: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_token_len: 64 * 1024,
            max_compressed_bytes: 48 * 1024,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_token_len: 4096,
            max_compressed_bytes: 3072,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_token_len: usize::MAX,
            max_compressed_bytes: usize::MAX,
        }
    }

    /// Fails if `token` is longer than [`max_token_len`](Self::max_token_len).
    pub fn check_token(&self, token: &str) -> CodecResult<()> {
        check(LimitKind::TokenLength, self.max_token_len, token.len())
    }

    /// Fails if a compressed stream of `len` bytes is over the cap.
    pub fn check_compressed(&self, len: usize) -> CodecResult<()> {
        check(LimitKind::CompressedBytes, self.max_compressed_bytes, len)
    }
}

fn check(kind: LimitKind, limit: usize, actual: usize) -> CodecResult<()> {
    if actual > limit {
        return Err(CodecError::LimitsExceeded {
            kind,
            limit,
            actual,
        });
    }
    Ok(())
}

/// Everything a decode call can be configured with.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    pub policy: DecodePolicy,
    pub limits: CodecLimits,
    pub wire_limits: WireLimits,
    pub registry: BlockRegistry,
}

impl DecodeOptions {
    /// Default limits with canonical-only decoding.
    #[must_use]
    pub fn strict() -> Self {
        Self::default().with_policy(DecodePolicy::Strict)
    }

    /// Default limits with legacy-tolerant decoding.
    #[must_use]
    pub fn lenient() -> Self {
        Self::default().with_policy(DecodePolicy::Lenient)
    }

    #[must_use]
    pub fn with_policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: CodecLimits, wire_limits: WireLimits) -> Self {
        self.limits = limits;
        self.wire_limits = wire_limits;
        self
    }

    #[must_use]
    pub fn with_registry(mut self, registry: BlockRegistry) -> Self {
        self.registry = registry;
        self
    }
}
