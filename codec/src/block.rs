//! Typed blocks and their body codecs.

use std::borrow::Cow;

use tracing::trace;
use wire::{tags, Section, WireBlock};

use crate::angle::AngleBlock;
use crate::array::{decode_array, encode_array};
use crate::error::{CodecError, CodecResult, ModelFault};
use crate::types::{ObjectKind, ParamSlot, Point, Rgba};

/// Length-prefixed text, kept as the exact bytes the game wrote.
///
/// The game NUL-pads titles so that the blocks after them start on a
/// 4-byte boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextBlock {
    bytes: Vec<u8>,
}

impl TextBlock {
    /// Wraps raw text bytes, padding included.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Encodes `text` as UTF-8 with at least one trailing NUL, padded to a
    /// multiple of four bytes.
    #[must_use]
    pub fn padded(text: &str) -> Self {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        while bytes.len() % 4 != 0 {
            bytes.push(0);
        }
        Self { bytes }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The text without trailing NULs. Invalid UTF-8 is replaced.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        let end = self
            .bytes
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |last| last + 1);
        String::from_utf8_lossy(&self.bytes[..end])
    }

    fn decode(tag: u16, body: &[u8]) -> CodecResult<Self> {
        let len = match body {
            [lo, hi, ..] => usize::from(u16::from_le_bytes([*lo, *hi])),
            _ => {
                return Err(CodecError::BodyLength {
                    tag,
                    expected: 2,
                    actual: body.len(),
                })
            }
        };
        if body.len() != 2 + len {
            return Err(CodecError::BodyLength {
                tag,
                expected: 2 + len,
                actual: body.len(),
            });
        }
        Ok(Self::from_bytes(body[2..].to_vec()))
    }

    fn encode(&self, tag: u16, out: &mut Vec<u8>) -> CodecResult<()> {
        let len = u16::try_from(self.bytes.len()).map_err(|_| ModelFault::TooLong {
            tag,
            len: self.bytes.len(),
        })?;
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&self.bytes);
        Ok(())
    }
}

/// Per-object sizes (percent) with the pad byte the array may carry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeBlock {
    pub sizes: Vec<u8>,
    /// Written after an odd number of sizes.
    pub pad: u8,
}

/// A block with a framing rule but no typed decoder, kept byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpaqueBlock {
    pub tag: u16,
    pub section: Section,
    pub body: Vec<u8>,
}

/// One block of the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "block", rename_all = "snake_case"))]
pub enum Block {
    Title(TextBlock),
    Object { kind: ObjectKind },
    Label(TextBlock),
    Trailer { values: Vec<u16> },
    Layers { layers: Vec<u16> },
    Positions { positions: Vec<Point> },
    Angles(AngleBlock),
    Sizes(SizeBlock),
    Colors { colors: Vec<Rgba> },
    Params { slot: ParamSlot, values: Vec<u16> },
    Opaque(OpaqueBlock),
}

impl Block {
    /// The tag this block is written with.
    #[must_use]
    pub const fn tag(&self) -> u16 {
        match self {
            Self::Title(_) => tags::TITLE,
            Self::Object { .. } => tags::OBJECT,
            Self::Label(_) => tags::LABEL,
            Self::Trailer { .. } => tags::TRAILER,
            Self::Layers { .. } => tags::LAYERS,
            Self::Positions { .. } => tags::POSITIONS,
            Self::Angles(_) => tags::ANGLES,
            Self::Sizes(_) => tags::SIZES,
            Self::Colors { .. } => tags::COLORS,
            Self::Params { slot, .. } => slot.tag(),
            Self::Opaque(opaque) => opaque.tag,
        }
    }

    /// The section this block belongs to.
    #[must_use]
    pub const fn section(&self) -> Section {
        match self {
            Self::Title(_) | Self::Object { .. } | Self::Label(_) => Section::Objects,
            Self::Opaque(opaque) => opaque.section,
            _ => Section::Parameters,
        }
    }

    /// A short lowercase name for reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Title(_) => "title",
            Self::Object { .. } => "object",
            Self::Label(_) => "label",
            Self::Trailer { .. } => "trailer",
            Self::Layers { .. } => "layers",
            Self::Positions { .. } => "positions",
            Self::Angles(_) => "angles",
            Self::Sizes(_) => "sizes",
            Self::Colors { .. } => "colors",
            Self::Params { .. } => "params",
            Self::Opaque(_) => "opaque",
        }
    }

    fn opaque(block: &WireBlock<'_>) -> Self {
        Self::Opaque(OpaqueBlock {
            tag: block.tag,
            section: block.section,
            body: block.body.to_vec(),
        })
    }

    /// Decodes a framed block into its typed form.
    ///
    /// Blocks the registry can frame but that have no typed layout here are
    /// kept as [`Block::Opaque`].
    pub fn decode(block: &WireBlock<'_>) -> CodecResult<Self> {
        let WireBlock {
            tag, section, body, ..
        } = *block;
        trace!(tag, %section, offset = block.offset, len = body.len(), "decoding block");

        let decoded = match (section, tag) {
            (Section::Objects, tags::TITLE) => Self::Title(TextBlock::decode(tag, body)?),
            (Section::Objects, tags::OBJECT) => match body {
                [lo, hi] => Self::Object {
                    kind: ObjectKind::new(u16::from_le_bytes([*lo, *hi])),
                },
                _ => {
                    return Err(CodecError::BodyLength {
                        tag,
                        expected: 2,
                        actual: body.len(),
                    })
                }
            },
            (Section::Objects, tags::LABEL) => Self::Label(TextBlock::decode(tag, body)?),
            (Section::Parameters, tags::TRAILER) => Self::Trailer {
                values: decode_array(tag, body)?.values,
            },
            (Section::Parameters, tags::LAYERS) => Self::Layers {
                layers: decode_array(tag, body)?.values,
            },
            (Section::Parameters, tags::POSITIONS) => Self::Positions {
                positions: decode_array(tag, body)?.values,
            },
            (Section::Parameters, tags::ANGLES) => Self::Angles(AngleBlock::decode(body)?),
            (Section::Parameters, tags::SIZES) => {
                let array = decode_array(tag, body)?;
                Self::Sizes(SizeBlock {
                    sizes: array.values,
                    pad: array.pad.unwrap_or(0),
                })
            }
            (Section::Parameters, tags::COLORS) => Self::Colors {
                colors: decode_array(tag, body)?.values,
            },
            (Section::Parameters, _) => match ParamSlot::from_tag(tag) {
                Some(slot) => Self::Params {
                    slot,
                    values: decode_array(tag, body)?.values,
                },
                None => Self::opaque(block),
            },
            _ => Self::opaque(block),
        };
        Ok(decoded)
    }

    /// Appends the encoded body (without the tag) to `out`.
    pub fn encode_body(&self, out: &mut Vec<u8>) -> CodecResult<()> {
        let tag = self.tag();
        match self {
            Self::Title(text) | Self::Label(text) => text.encode(tag, out),
            Self::Object { kind } => {
                out.extend_from_slice(&kind.raw().to_le_bytes());
                Ok(())
            }
            Self::Trailer { values } | Self::Layers { layers: values } | Self::Params { values, .. } => {
                encode_array(tag, values, 0, out)
            }
            Self::Positions { positions } => encode_array(tag, positions, 0, out),
            Self::Angles(angles) => angles.encode(out),
            Self::Sizes(sizes) => encode_array(tag, &sizes.sizes, sizes.pad, out),
            Self::Colors { colors } => encode_array(tag, colors, 0, out),
            Self::Opaque(opaque) => {
                out.extend_from_slice(&opaque.body);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_block(tag: u16, section: Section, body: &[u8]) -> WireBlock<'_> {
        WireBlock {
            tag,
            section,
            offset: 0,
            body,
        }
    }

    fn reencode(block: &Block) -> Vec<u8> {
        let mut out = Vec::new();
        block.encode_body(&mut out).unwrap();
        out
    }

    #[test]
    fn padded_title_matches_generator() {
        // (28 + len) % 4 == 0 with at least one NUL
        let title = TextBlock::padded("Test");
        assert_eq!(title.as_bytes(), b"Test\0\0\0\0");
        let title = TextBlock::padded("abc");
        assert_eq!(title.as_bytes(), b"abc\0");
        assert_eq!(title.text(), "abc");
    }

    #[test]
    fn text_keeps_interior_nul_but_trims_trailing() {
        let text = TextBlock::from_bytes(b"a\0b\0\0".to_vec());
        assert_eq!(text.text(), "a\0b");
        assert_eq!(TextBlock::from_bytes(vec![0, 0]).text(), "");
    }

    #[test]
    fn title_roundtrip() {
        let body = [0x04, 0x00, b'P', b'1', 0, 0];
        let block = Block::decode(&wire_block(tags::TITLE, Section::Objects, &body)).unwrap();
        assert!(matches!(&block, Block::Title(t) if t.text() == "P1"));
        assert_eq!(reencode(&block), body);
    }

    #[test]
    fn title_length_mismatch() {
        let body = [0x08, 0x00, b'P', b'1'];
        assert_eq!(
            Block::decode(&wire_block(tags::TITLE, Section::Objects, &body)).unwrap_err(),
            CodecError::BodyLength {
                tag: tags::TITLE,
                expected: 10,
                actual: 4
            }
        );
    }

    #[test]
    fn object_block() {
        let block =
            Block::decode(&wire_block(tags::OBJECT, Section::Objects, &[0x2F, 0x00])).unwrap();
        assert_eq!(
            block,
            Block::Object {
                kind: ObjectKind::new(0x2F)
            }
        );
        assert_eq!(block.section(), Section::Objects);
        assert!(Block::decode(&wire_block(tags::OBJECT, Section::Objects, &[0x2F])).is_err());
    }

    #[test]
    fn tag_three_by_section() {
        let label = Block::decode(&wire_block(3, Section::Objects, &[0x01, 0x00, b'x'])).unwrap();
        assert_eq!(label.name(), "label");

        let body = [0x01, 0x00, 0x01, 0x00, 0x01, 0x00];
        let trailer = Block::decode(&wire_block(3, Section::Parameters, &body)).unwrap();
        assert_eq!(trailer, Block::Trailer { values: vec![1] });
        assert_eq!(reencode(&trailer), body);
    }

    #[test]
    fn params_blocks() {
        let body = [0x01, 0x00, 0x02, 0x00, 0x05, 0x00, 0x06, 0x00];
        let block = Block::decode(&wire_block(0x000B, Section::Parameters, &body)).unwrap();
        assert_eq!(
            block,
            Block::Params {
                slot: ParamSlot::B,
                values: vec![5, 6]
            }
        );
        assert_eq!(block.tag(), 0x000B);
        assert_eq!(reencode(&block), body);
    }

    #[test]
    fn sizes_keep_pad() {
        let body = [0x00, 0x00, 0x01, 0x00, 0x64, 0xEC];
        let block = Block::decode(&wire_block(tags::SIZES, Section::Parameters, &body)).unwrap();
        assert_eq!(
            block,
            Block::Sizes(SizeBlock {
                sizes: vec![100],
                pad: 0xEC
            })
        );
        assert_eq!(reencode(&block), body);
    }

    #[test]
    fn angle_mismatch_surfaces() {
        let body = [0x01, 0x00, 0x02, 0x00, 0x5A, 0x00];
        assert_eq!(
            Block::decode(&wire_block(tags::ANGLES, Section::Parameters, &body)).unwrap_err(),
            CodecError::AngleCountMismatch {
                count: 2,
                available: 1
            }
        );
    }

    #[test]
    fn unknown_typed_pair_is_opaque() {
        let body = [0x01, 0x00, 0x00, 0x00];
        let block = Block::decode(&wire_block(0x0009, Section::Parameters, &body)).unwrap();
        assert_eq!(
            block,
            Block::Opaque(OpaqueBlock {
                tag: 0x0009,
                section: Section::Parameters,
                body: body.to_vec()
            })
        );
        assert_eq!(block.section(), Section::Parameters);
        assert_eq!(reencode(&block), body);
    }

    #[test]
    fn oversized_array_is_model_error() {
        let block = Block::Layers {
            layers: vec![1; 70_000],
        };
        let mut out = Vec::new();
        assert_eq!(
            block.encode_body(&mut out),
            Err(CodecError::InvalidModel(ModelFault::TooLong {
                tag: tags::LAYERS,
                len: 70_000
            }))
        );
    }
}
