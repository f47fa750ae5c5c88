//! The compression stage between the decoded symbol bytes and the payload.
//!
//! Payloads travel as zlib streams. Older encoders wrote raw deflate with no
//! zlib wrapper, which a lenient decode still accepts.

use std::fmt;
use std::io::{Read, Write};

use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use text::DecodePolicy;
use tracing::debug;

use crate::error::{CodecError, CodecResult, LimitKind};

/// zlib level used for every encoded token.
pub const COMPRESSION_LEVEL: u32 = 6;

/// Stream format the payload was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Container {
    /// RFC 1950 zlib stream.
    Zlib,
    /// RFC 1951 deflate stream without a wrapper.
    RawDeflate,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Zlib => "zlib",
            Self::RawDeflate => "raw deflate",
        };
        write!(f, "{name}")
    }
}

/// An inflated payload and how it was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inflated {
    pub bytes: Vec<u8>,
    pub container: Container,
    /// `true` if deflating `bytes` again gives back the input stream.
    pub canonical: bool,
}

/// Compresses a payload the way every encoded token is compressed.
pub fn deflate(payload: &[u8]) -> CodecResult<Vec<u8>> {
    let deflate_err = |err: std::io::Error| CodecError::Deflate {
        reason: err.to_string(),
    };
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(payload.len() / 2 + 16),
        Compression::new(COMPRESSION_LEVEL),
    );
    encoder.write_all(payload).map_err(deflate_err)?;
    encoder.finish().map_err(deflate_err)
}

fn read_bounded<R: Read>(reader: R, limit: usize) -> std::io::Result<Vec<u8>> {
    // one byte past the limit is enough to tell that it was exceeded
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let mut out = Vec::new();
    reader.take(cap).read_to_end(&mut out)?;
    Ok(out)
}

fn check_len(bytes: &[u8], limit: usize) -> CodecResult<()> {
    if bytes.len() > limit {
        return Err(CodecError::LimitsExceeded {
            kind: LimitKind::PayloadBytes,
            limit,
            actual: bytes.len(),
        });
    }
    Ok(())
}

/// Inflates a compressed payload of at most `max_payload_bytes`.
///
/// Strict decoding only accepts the exact zlib stream [`deflate`] would
/// produce for the result. Lenient decoding accepts any zlib stream and
/// falls back to raw deflate.
pub fn inflate(data: &[u8], policy: DecodePolicy, max_payload_bytes: usize) -> CodecResult<Inflated> {
    let zlib_err = match read_bounded(ZlibDecoder::new(data), max_payload_bytes) {
        Ok(bytes) => {
            check_len(&bytes, max_payload_bytes)?;
            let canonical = deflate(&bytes)? == data;
            if !canonical {
                if policy.is_strict() {
                    return Err(CodecError::NonCanonicalCompression {
                        container: Container::Zlib,
                    });
                }
                debug!(
                    compressed = data.len(),
                    "accepting zlib stream that does not re-deflate identically"
                );
            }
            return Ok(Inflated {
                bytes,
                container: Container::Zlib,
                canonical,
            });
        }
        Err(err) => err,
    };

    match read_bounded(DeflateDecoder::new(data), max_payload_bytes) {
        Ok(bytes) => {
            check_len(&bytes, max_payload_bytes)?;
            if policy.is_strict() {
                return Err(CodecError::NonCanonicalCompression {
                    container: Container::RawDeflate,
                });
            }
            debug!(
                compressed = data.len(),
                inflated = bytes.len(),
                "recovered legacy raw deflate stream"
            );
            Ok(Inflated {
                bytes,
                container: Container::RawDeflate,
                canonical: false,
            })
        }
        Err(_) => Err(CodecError::Inflate {
            reason: zlib_err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::DeflateEncoder;

    fn raw_deflate(payload: &[u8]) -> Vec<u8> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(COMPRESSION_LEVEL));
        encoder.write_all(payload).unwrap();
        encoder.finish().unwrap()
    }

    fn sample_payload() -> Vec<u8> {
        (0..200u8).flat_map(|i| [i, 0, i % 7, 0]).collect()
    }

    #[test]
    fn deflate_writes_zlib_header() {
        let compressed = deflate(b"strategy").unwrap();
        assert_eq!(compressed[0], 0x78);
        assert_eq!((u16::from(compressed[0]) << 8 | u16::from(compressed[1])) % 31, 0);
    }

    #[test]
    fn roundtrip_is_canonical() {
        let payload = sample_payload();
        let compressed = deflate(&payload).unwrap();
        let inflated = inflate(&compressed, DecodePolicy::Strict, 1 << 16).unwrap();
        assert_eq!(inflated.bytes, payload);
        assert_eq!(inflated.container, Container::Zlib);
        assert!(inflated.canonical);
    }

    #[test]
    fn raw_deflate_is_lenient_only() {
        let payload = sample_payload();
        let legacy = raw_deflate(&payload);

        assert_eq!(
            inflate(&legacy, DecodePolicy::Strict, 1 << 16),
            Err(CodecError::NonCanonicalCompression {
                container: Container::RawDeflate
            })
        );

        let inflated = inflate(&legacy, DecodePolicy::Lenient, 1 << 16).unwrap();
        assert_eq!(inflated.bytes, payload);
        assert_eq!(inflated.container, Container::RawDeflate);
        assert!(!inflated.canonical);
    }

    #[test]
    fn other_zlib_levels_are_lenient_only() {
        let payload = sample_payload();
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::none());
        encoder.write_all(&payload).unwrap();
        let stored = encoder.finish().unwrap();

        assert!(matches!(
            inflate(&stored, DecodePolicy::Strict, 1 << 16),
            Err(CodecError::NonCanonicalCompression {
                container: Container::Zlib
            })
        ));
        let inflated = inflate(&stored, DecodePolicy::Lenient, 1 << 16).unwrap();
        assert_eq!(inflated.bytes, payload);
        assert!(!inflated.canonical);
    }

    #[test]
    fn garbage_fails_both_ways() {
        for policy in [DecodePolicy::Strict, DecodePolicy::Lenient] {
            assert!(matches!(
                inflate(&[0xFF; 8], policy, 1 << 16),
                Err(CodecError::Inflate { .. })
            ));
        }
    }

    #[test]
    fn inflate_is_bounded() {
        let payload = vec![0u8; 10_000];
        let compressed = deflate(&payload).unwrap();
        assert!(compressed.len() < 100);
        assert_eq!(
            inflate(&compressed, DecodePolicy::Lenient, 4096),
            Err(CodecError::LimitsExceeded {
                kind: LimitKind::PayloadBytes,
                limit: 4096,
                actual: 4097
            })
        );
    }
}
