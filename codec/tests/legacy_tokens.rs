//! Tokens in the shape the game's older encoder produced: raw deflate with
//! no zlib wrapper, and a symbol tail that is not canonical.

use std::io::Write;

use codec::{
    decode_strategy, decode_strategy_with, encode_payload, encode_strategy, CodecError,
    DecodeOptions, ErrorKind, ObjectKind, PlacedObject, Point, Strategy, StrategyBuilder, Symbol,
};
use flate2::write::DeflateEncoder;
use flate2::Compression;
use text::TextError;

fn board(objects: usize) -> Strategy {
    StrategyBuilder::new("Legacy")
        .objects((0..objects).map(|i| {
            PlacedObject::new(ObjectKind::new(0x2F), Point::new(i as i16 * 100, 0))
                .with_angle(i as i16 * -30)
        }))
        .build()
}

fn raw_deflate(payload: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload).unwrap();
    encoder.finish().unwrap()
}

/// Writes `compressed` the way the legacy encoder did: the last symbol
/// either dangles or carries stray low bits.
fn legacy_token(compressed: &[u8]) -> String {
    let mut payload = text::encode_text(compressed, Symbol::DEFAULT_KEY);
    if compressed.len() % 3 == 0 {
        payload.push('A');
    } else {
        let last = payload.pop().unwrap();
        let symbol = Symbol::from_char(last).unwrap().rotate(1);
        payload.push(symbol.to_char());
    }
    text::wrap(&payload)
}

fn legacy(strategy: &Strategy) -> String {
    legacy_token(&raw_deflate(&encode_payload(strategy).unwrap()))
}

#[test]
fn legacy_token_fails_strict() {
    for objects in 0..6 {
        let token = legacy(&board(objects));
        let err = decode_strategy_with(&token, &DecodeOptions::strict()).unwrap_err();
        assert!(
            matches!(
                err,
                CodecError::Text(
                    TextError::DanglingSymbol { .. } | TextError::NonZeroPadding { .. }
                )
            ),
            "unexpected error for {objects} objects: {err}"
        );
        assert_eq!(err.kind(), ErrorKind::Symbols);
    }
}

#[test]
fn legacy_token_decodes_leniently() {
    for objects in 0..6 {
        let board = board(objects);
        let decoded = decode_strategy(&legacy(&board)).unwrap();
        assert_eq!(decoded.blocks, board.blocks);
        assert_eq!(decoded.object_count(), objects);
    }
}

#[test]
fn canonical_token_equals_lenient_decode_of_legacy() {
    let board = board(3);
    let canonical = encode_strategy(&board).unwrap();
    let from_canonical = decode_strategy_with(&canonical, &DecodeOptions::strict()).unwrap();
    let from_legacy = decode_strategy(&legacy(&board)).unwrap();

    assert_eq!(from_legacy, from_canonical);
    assert_eq!(encode_strategy(&from_legacy).unwrap(), canonical);
}

#[test]
fn raw_deflate_with_clean_symbols_is_still_non_canonical() {
    let compressed = raw_deflate(&encode_payload(&board(2)).unwrap());
    let token = text::encode_token(&compressed, Symbol::DEFAULT_KEY);

    let err = decode_strategy_with(&token, &DecodeOptions::strict()).unwrap_err();
    assert_eq!(
        err,
        CodecError::NonCanonicalCompression {
            container: codec::Container::RawDeflate
        }
    );
    assert_eq!(err.kind(), ErrorKind::Compression);
    assert_eq!(decode_strategy(&token).unwrap().blocks, board(2).blocks);
}
