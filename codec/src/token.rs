//! The two entry points: token to strategy and back.

use tracing::debug;
use wire::BlockRegistry;

use crate::compress::{deflate, inflate};
use crate::error::CodecResult;
use crate::limits::DecodeOptions;
use crate::payload::{decode_payload_with, encode_payload_with};
use crate::strategy::Strategy;

/// Decodes a `[stgy:...]` token with default (lenient) options.
pub fn decode_strategy(token: &str) -> CodecResult<Strategy> {
    decode_strategy_with(token, &DecodeOptions::default())
}

/// Decodes a `[stgy:...]` token.
///
/// Any stage failure aborts the call. Under a lenient policy every accepted
/// irregularity is logged at `debug`.
pub fn decode_strategy_with(token: &str, options: &DecodeOptions) -> CodecResult<Strategy> {
    options.limits.check_token(token)?;

    let decoded = text::decode_token(token, options.policy)?;
    if !decoded.quirks.is_clean() {
        debug!(
            dangling_symbol = decoded.quirks.dangling_symbol,
            nonzero_padding = decoded.quirks.nonzero_padding,
            "accepting non-canonical symbol tail"
        );
    }
    options.limits.check_compressed(decoded.bytes.len())?;

    let inflated = inflate(
        &decoded.bytes,
        options.policy,
        options.wire_limits.max_payload_bytes,
    )?;
    debug!(
        token = token.len(),
        compressed = decoded.bytes.len(),
        payload = inflated.bytes.len(),
        container = %inflated.container,
        "inflated token"
    );

    let strategy = decode_payload_with(&inflated.bytes, options)?;
    Ok(Strategy {
        key: decoded.key,
        ..strategy
    })
}

/// Encodes a strategy as a `[stgy:...]` token using the standard framing
/// rules.
pub fn encode_strategy(strategy: &Strategy) -> CodecResult<String> {
    encode_strategy_with(strategy, &BlockRegistry::STANDARD)
}

/// Encodes a strategy as a `[stgy:...]` token.
///
/// A model that passes [`Strategy::validate`] encodes to a token that
/// decodes strictly, with the same `registry` and large enough limits, back
/// to the same blocks.
pub fn encode_strategy_with(strategy: &Strategy, registry: &BlockRegistry) -> CodecResult<String> {
    let payload = encode_payload_with(strategy, registry)?;
    let compressed = deflate(&payload)?;
    Ok(text::encode_token(&compressed, strategy.key))
}
