//! The strategy model produced and consumed by the codec.

use std::borrow::Cow;

use text::Symbol;
use wire::{BlockRegistry, PayloadHeader, Section};

use crate::angle::AngleBlock;
use crate::block::{Block, OpaqueBlock};
use crate::error::{CodecResult, ModelFault};
use crate::types::{ObjectKind, Point, Rgba};

/// A decoded strategy board.
///
/// `key` and `header` are carried so that re-encoding an unedited strategy
/// reproduces the token it came from. Header length fields are recomputed
/// on encode.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Strategy {
    pub key: Symbol,
    pub header: PayloadHeader,
    pub blocks: Vec<Block>,
}

impl Default for Strategy {
    fn default() -> Self {
        Self {
            key: Symbol::DEFAULT_KEY,
            header: PayloadHeader::default(),
            blocks: Vec::new(),
        }
    }
}

impl Strategy {
    /// Creates an empty strategy with the default key.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a strategy from blocks with the default key and header.
    #[must_use]
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Self::default()
        }
    }

    /// The board title, if there is a title block.
    #[must_use]
    pub fn title(&self) -> Option<Cow<'_, str>> {
        self.blocks.iter().find_map(|block| match block {
            Block::Title(text) => Some(text.text()),
            _ => None,
        })
    }

    /// Object kinds in board order.
    pub fn objects(&self) -> impl Iterator<Item = ObjectKind> + '_ {
        self.blocks.iter().filter_map(|block| match block {
            Block::Object { kind } => Some(*kind),
            _ => None,
        })
    }

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects().count()
    }

    /// Label text for each object, `None` where an object has no label.
    #[must_use]
    pub fn labels(&self) -> Vec<Option<Cow<'_, str>>> {
        let mut labels: Vec<Option<Cow<'_, str>>> = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Object { .. } => labels.push(None),
                Block::Label(text) => {
                    if let Some(slot) = labels.last_mut() {
                        *slot = Some(text.text());
                    }
                }
                _ => {}
            }
        }
        labels
    }

    #[must_use]
    pub fn angles(&self) -> Option<&AngleBlock> {
        self.blocks.iter().find_map(|block| match block {
            Block::Angles(angles) => Some(angles),
            _ => None,
        })
    }

    #[must_use]
    pub fn positions(&self) -> Option<&[Point]> {
        self.blocks.iter().find_map(|block| match block {
            Block::Positions { positions } => Some(positions.as_slice()),
            _ => None,
        })
    }

    #[must_use]
    pub fn sizes(&self) -> Option<&[u8]> {
        self.blocks.iter().find_map(|block| match block {
            Block::Sizes(sizes) => Some(sizes.sizes.as_slice()),
            _ => None,
        })
    }

    #[must_use]
    pub fn colors(&self) -> Option<&[Rgba]> {
        self.blocks.iter().find_map(|block| match block {
            Block::Colors { colors } => Some(colors.as_slice()),
            _ => None,
        })
    }

    /// Checks that the block order frames back to the same blocks.
    ///
    /// Objects-section blocks must all come first, and the block that opens
    /// the parameters section must not carry a tag the objects section also
    /// claims. Opaque blocks need a rule in `registry` where they sit, a
    /// body that rule frames exactly, and a tag with no typed decoder.
    pub fn validate(&self, registry: &BlockRegistry) -> CodecResult<()> {
        let mut section = Section::Objects;
        for (index, block) in self.blocks.iter().enumerate() {
            let tag = block.tag();
            match (section, block.section()) {
                (Section::Parameters, Section::Objects) => {
                    return Err(ModelFault::ObjectAfterParameters { index }.into());
                }
                (Section::Objects, Section::Parameters) => {
                    let opens = registry
                        .lookup(Section::Objects, tag)
                        .is_some_and(|rule| rule.section == Section::Parameters);
                    if !opens {
                        return Err(ModelFault::AmbiguousSectionStart { index, tag }.into());
                    }
                    section = Section::Parameters;
                }
                _ => {}
            }

            if let Block::Opaque(opaque) = block {
                check_opaque(index, opaque, section, registry)?;
            }
        }
        Ok(())
    }
}

fn check_opaque(
    index: usize,
    opaque: &OpaqueBlock,
    section: Section,
    registry: &BlockRegistry,
) -> CodecResult<()> {
    let tag = opaque.tag;
    let typed = BlockRegistry::STANDARD
        .lookup(opaque.section, tag)
        .is_some_and(|rule| rule.section == opaque.section);
    if typed {
        return Err(ModelFault::TypedOpaque { index, tag }.into());
    }

    let rule = registry
        .lookup(section, tag)
        .filter(|rule| rule.section == opaque.section)
        .ok_or(ModelFault::UnframedOpaque {
            index,
            tag,
            section: opaque.section,
        })?;
    let expected = rule.layout.measure(&opaque.body);
    if expected != Some(opaque.body.len()) {
        return Err(ModelFault::OpaqueLayout {
            index,
            tag,
            len: opaque.body.len(),
            expected,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::TextBlock;
    use crate::limits::DecodeOptions;
    use crate::payload::{decode_payload_with, encode_payload_with};
    use crate::error::CodecError;

    fn object(kind: u16) -> Block {
        Block::Object {
            kind: ObjectKind::new(kind),
        }
    }

    #[test]
    fn accessors() {
        let strategy = Strategy::from_blocks(vec![
            Block::Title(TextBlock::padded("Raid")),
            object(0x2F),
            object(0x64),
            Block::Label(TextBlock::padded("stack")),
            Block::Positions {
                positions: vec![Point::new(0, 0), Point::new(10, -10)],
            },
            Block::Angles(AngleBlock::new(vec![0, -90])),
        ]);
        assert_eq!(strategy.title().as_deref(), Some("Raid"));
        assert_eq!(strategy.object_count(), 2);
        assert_eq!(
            strategy.objects().collect::<Vec<_>>(),
            vec![ObjectKind::new(0x2F), ObjectKind::TEXT]
        );
        assert_eq!(strategy.labels(), vec![None, Some(Cow::from("stack"))]);
        assert_eq!(strategy.angles().unwrap().angles, vec![0, -90]);
        assert_eq!(strategy.positions().unwrap().len(), 2);
        assert!(strategy.sizes().is_none());
        assert!(strategy.colors().is_none());
    }

    #[test]
    fn empty_strategy_is_valid() {
        let strategy = Strategy::new();
        assert!(strategy.title().is_none());
        assert!(strategy.validate(&BlockRegistry::STANDARD).is_ok());
        assert_eq!(strategy.key, Symbol::DEFAULT_KEY);
    }

    #[test]
    fn object_after_parameters() {
        let strategy = Strategy::from_blocks(vec![
            Block::Layers { layers: vec![1] },
            object(1),
        ]);
        assert_eq!(
            strategy.validate(&BlockRegistry::STANDARD),
            Err(CodecError::InvalidModel(ModelFault::ObjectAfterParameters {
                index: 1
            }))
        );
    }

    #[test]
    fn trailer_cannot_open_parameters() {
        let strategy = Strategy::from_blocks(vec![
            object(1),
            Block::Trailer { values: vec![1] },
        ]);
        assert_eq!(
            strategy.validate(&BlockRegistry::STANDARD),
            Err(CodecError::InvalidModel(ModelFault::AmbiguousSectionStart {
                index: 1,
                tag: 3
            }))
        );

        let fine = Strategy::from_blocks(vec![
            object(1),
            Block::Layers { layers: vec![1] },
            Block::Trailer { values: vec![1] },
        ]);
        assert!(fine.validate(&BlockRegistry::STANDARD).is_ok());
    }

    #[test]
    fn opaque_needs_a_rule() {
        let strategy = Strategy::from_blocks(vec![
            Block::Layers { layers: vec![] },
            Block::Opaque(OpaqueBlock {
                tag: 0x0009,
                section: Section::Parameters,
                body: vec![1, 0, 0, 0],
            }),
        ]);
        assert!(matches!(
            strategy.validate(&BlockRegistry::STANDARD),
            Err(CodecError::InvalidModel(ModelFault::UnframedOpaque { tag: 9, .. }))
        ));

        static EXTRA: &[wire::BlockRule] = &[wire::BlockRule::new(
            0x0009,
            Section::Parameters,
            wire::Layout::Array,
            "param_x",
        )];
        assert!(strategy
            .validate(&BlockRegistry::extended(EXTRA))
            .is_ok());
    }

    static PARAM_X: &[wire::BlockRule] = &[wire::BlockRule::new(
        0x0009,
        Section::Parameters,
        wire::Layout::Array,
        "param_x",
    )];

    fn with_opaque(tag: u16, section: Section, body: Vec<u8>) -> Strategy {
        let mut blocks = vec![object(1)];
        if section == Section::Parameters {
            blocks.push(Block::Layers { layers: vec![1] });
        }
        blocks.push(Block::Opaque(OpaqueBlock { tag, section, body }));
        Strategy::from_blocks(blocks)
    }

    #[test]
    fn opaque_body_must_match_its_layout() {
        let registry = BlockRegistry::extended(PARAM_X);
        // claims five words but carries none
        let short = with_opaque(0x0009, Section::Parameters, vec![1, 0, 5, 0]);
        assert_eq!(
            short.validate(&registry),
            Err(CodecError::InvalidModel(ModelFault::OpaqueLayout {
                index: 2,
                tag: 9,
                len: 4,
                expected: Some(14),
            }))
        );
        assert!(encode_payload_with(&short, &registry).is_err());

        let headless = with_opaque(0x0009, Section::Parameters, vec![1, 0]);
        assert!(matches!(
            headless.validate(&registry),
            Err(CodecError::InvalidModel(ModelFault::OpaqueLayout { expected: None, .. }))
        ));
    }

    #[test]
    fn opaque_cannot_stand_in_for_a_typed_block() {
        let title = with_opaque(wire::tags::TITLE, Section::Objects, vec![2, 0, b'h', b'i']);
        assert_eq!(
            title.validate(&BlockRegistry::STANDARD),
            Err(CodecError::InvalidModel(ModelFault::TypedOpaque { index: 1, tag: 1 }))
        );

        let layers = with_opaque(wire::tags::LAYERS, Section::Parameters, vec![1, 0, 0, 0]);
        assert!(matches!(
            layers.validate(&BlockRegistry::extended(PARAM_X)),
            Err(CodecError::InvalidModel(ModelFault::TypedOpaque { tag: 4, .. }))
        ));
    }

    #[test]
    fn valid_opaque_survives_a_payload_roundtrip() {
        let registry = BlockRegistry::extended(PARAM_X);
        let strategy = with_opaque(0x0009, Section::Parameters, vec![1, 0, 2, 0, 5, 0, 6, 0]);
        strategy.validate(&registry).unwrap();

        let payload = encode_payload_with(&strategy, &registry).unwrap();
        let options = DecodeOptions::strict().with_registry(registry);
        let decoded = decode_payload_with(&payload, &options).unwrap();
        assert_eq!(decoded.blocks, strategy.blocks);
    }
}
