#![no_main]

use codec::{decode_payload_with, encode_payload, DecodeOptions, WireLimits};
use libfuzzer_sys::fuzz_target;
use wire::BlockRegistry;

fuzz_target!(|data: &[u8]| {
    let limits = WireLimits::for_testing();

    if let Ok(blocks) = wire::frame(data, &BlockRegistry::STANDARD, &limits) {
        assert_eq!(wire::unframe(&blocks), data);
    }

    let options = DecodeOptions::strict();
    if let Ok(strategy) = decode_payload_with(data, &options) {
        // strictly accepted payloads are reproduced exactly
        assert_eq!(encode_payload(&strategy).expect("re-encodes"), data);
    }
});
