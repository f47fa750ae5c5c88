//! Conversion between the inflated byte payload and the strategy model.

use tracing::debug;
use wire::{BlockRegistry, PayloadWriter};

use crate::block::Block;
use crate::error::CodecResult;
use crate::limits::DecodeOptions;
use crate::strategy::Strategy;

/// Decodes a byte payload with default options.
///
/// The key is left at [`text::Symbol::DEFAULT_KEY`]; it lives in the token,
/// not the payload.
pub fn decode_payload(bytes: &[u8]) -> CodecResult<Strategy> {
    decode_payload_with(bytes, &DecodeOptions::default())
}

/// Decodes a byte payload.
///
/// Strict decoding also requires the header length fields to match the
/// payload.
pub fn decode_payload_with(bytes: &[u8], options: &DecodeOptions) -> CodecResult<Strategy> {
    let payload = wire::read_payload(bytes, &options.registry, &options.wire_limits)?;
    if let Err(err) = payload.header.check_lengths(bytes.len()) {
        if options.policy.is_strict() {
            return Err(err.into());
        }
        debug!(%err, "ignoring header length fields");
    }

    let blocks = payload
        .blocks
        .iter()
        .map(Block::decode)
        .collect::<CodecResult<Vec<_>>>()?;
    debug!(len = bytes.len(), blocks = blocks.len(), "decoded payload");

    Ok(Strategy {
        header: payload.header,
        blocks,
        ..Strategy::default()
    })
}

/// Encodes the model as a byte payload framed by the standard rules.
pub fn encode_payload(strategy: &Strategy) -> CodecResult<Vec<u8>> {
    encode_payload_with(strategy, &BlockRegistry::STANDARD)
}

/// Encodes the model as a byte payload.
///
/// `registry` is the one the payload will be framed with on decode; opaque
/// blocks must have a rule in it. Header length fields are recomputed.
pub fn encode_payload_with(strategy: &Strategy, registry: &BlockRegistry) -> CodecResult<Vec<u8>> {
    strategy.validate(registry)?;

    let mut writer = PayloadWriter::new(strategy.header);
    let mut body = Vec::new();
    for block in &strategy.blocks {
        body.clear();
        block.encode_body(&mut body)?;
        writer.push_block(block.tag(), &body);
    }
    Ok(writer.finish()?)
}
