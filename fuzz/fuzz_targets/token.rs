#![no_main]

use codec::{decode_strategy_with, encode_strategy, CodecLimits, DecodeOptions, WireLimits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let options = DecodeOptions::lenient()
        .with_limits(CodecLimits::for_testing(), WireLimits::for_testing());

    // Arbitrary text, then the same symbols inside an envelope.
    let _ = decode_strategy_with(input, &options);
    let token = text::wrap(input);
    let Ok(strategy) = decode_strategy_with(&token, &options) else {
        return;
    };

    // Anything accepted must re-encode to a token that decodes strictly.
    let canonical = encode_strategy(&strategy).expect("decoded strategy re-encodes");
    let again = decode_strategy_with(&canonical, &DecodeOptions::strict())
        .expect("canonical token decodes");
    assert_eq!(again.blocks, strategy.blocks);
});
