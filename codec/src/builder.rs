//! Building new boards in the layout the game writes.

use text::Symbol;

use crate::angle::AngleBlock;
use crate::block::{Block, SizeBlock, TextBlock};
use crate::strategy::Strategy;
use crate::types::{ObjectKind, ParamSlot, Point, Rgba};

/// Size the game gives a newly placed object, in percent.
pub const DEFAULT_SIZE: u8 = 100;

/// One object to place on a new board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedObject {
    pub kind: ObjectKind,
    pub position: Point,
    pub angle: i16,
    pub size: u8,
    pub color: Rgba,
    /// Text shown by a [`ObjectKind::TEXT`] object.
    pub label: Option<String>,
}

impl PlacedObject {
    /// An unrotated, full-size white object.
    #[must_use]
    pub const fn new(kind: ObjectKind, position: Point) -> Self {
        Self {
            kind,
            position,
            angle: 0,
            size: DEFAULT_SIZE,
            color: Rgba::WHITE,
            label: None,
        }
    }

    /// A text object showing `label`.
    #[must_use]
    pub fn text(label: impl Into<String>, position: Point) -> Self {
        Self::new(ObjectKind::TEXT, position).with_label(label)
    }

    #[must_use]
    pub const fn with_angle(mut self, angle: i16) -> Self {
        self.angle = angle;
        self
    }

    #[must_use]
    pub const fn with_size(mut self, size: u8) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub const fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Assembles a [`Strategy`] block by block.
///
/// The block order matches boards saved by the game: title, one object
/// block per object (each text object followed by its label), then the
/// parameter arrays and the trailer.
#[derive(Debug, Clone)]
pub struct StrategyBuilder {
    title: String,
    key: Symbol,
    objects: Vec<PlacedObject>,
}

impl StrategyBuilder {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            key: Symbol::DEFAULT_KEY,
            objects: Vec::new(),
        }
    }

    /// Sets the key symbol the token is written with.
    #[must_use]
    pub const fn key(mut self, key: Symbol) -> Self {
        self.key = key;
        self
    }

    #[must_use]
    pub fn object(mut self, object: PlacedObject) -> Self {
        self.objects.push(object);
        self
    }

    #[must_use]
    pub fn objects(mut self, objects: impl IntoIterator<Item = PlacedObject>) -> Self {
        self.objects.extend(objects);
        self
    }

    #[must_use]
    pub fn build(self) -> Strategy {
        let count = self.objects.len();
        let mut blocks = Vec::with_capacity(count * 2 + 11);
        blocks.push(Block::Title(TextBlock::padded(&self.title)));
        for object in &self.objects {
            blocks.push(Block::Object { kind: object.kind });
            if let Some(label) = &object.label {
                blocks.push(Block::Label(TextBlock::padded(label)));
            }
        }

        blocks.push(Block::Layers {
            layers: vec![1; count],
        });
        blocks.push(Block::Positions {
            positions: self.objects.iter().map(|o| o.position).collect(),
        });
        blocks.push(Block::Angles(AngleBlock::new(
            self.objects.iter().map(|o| o.angle).collect(),
        )));
        blocks.push(Block::Sizes(SizeBlock {
            sizes: self.objects.iter().map(|o| o.size).collect(),
            pad: 0,
        }));
        blocks.push(Block::Colors {
            colors: self.objects.iter().map(|o| o.color).collect(),
        });
        for slot in ParamSlot::ALL {
            blocks.push(Block::Params {
                slot,
                values: vec![0; count],
            });
        }
        blocks.push(Block::Trailer { values: vec![1] });

        Strategy {
            key: self.key,
            blocks,
            ..Strategy::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::encode_payload;
    use std::borrow::Cow;
    use wire::BlockRegistry;

    #[test]
    fn one_tank_matches_generator_layout() {
        let strategy = StrategyBuilder::new("Test 1 Tank")
            .object(PlacedObject::new(ObjectKind::new(0x2F), Point::new(0, 0)))
            .build();
        let bytes = encode_payload(&strategy).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&2u32.to_le_bytes());
        expected.extend_from_slice(&0u32.to_le_bytes()); // patched below
        expected.extend_from_slice(&[0; 10]);
        expected.extend_from_slice(&0u16.to_le_bytes()); // patched below
        expected.extend_from_slice(&[0; 4]);
        expected.extend_from_slice(&[0x01, 0x00, 0x0C, 0x00]);
        expected.extend_from_slice(b"Test 1 Tank\0");
        expected.extend_from_slice(&[0x02, 0x00, 0x2F, 0x00]);
        expected.extend_from_slice(&[0x04, 0x00, 0x01, 0x00, 0x01, 0x00, 0x01, 0x00]);
        expected.extend_from_slice(&[0x05, 0x00, 0x03, 0x00, 0x01, 0x00, 0, 0, 0, 0]);
        expected.extend_from_slice(&[0x06, 0x00, 0x01, 0x00, 0x01, 0x00, 0, 0]);
        expected.extend_from_slice(&[0x07, 0x00, 0x00, 0x00, 0x01, 0x00, 0x64, 0x00]);
        expected.extend_from_slice(&[0x08, 0x00, 0x02, 0x00, 0x01, 0x00, 255, 255, 255, 0]);
        for tag in [0x0A, 0x0B, 0x0C] {
            expected.extend_from_slice(&[tag, 0x00, 0x01, 0x00, 0x01, 0x00, 0, 0]);
        }
        expected.extend_from_slice(&[0x03, 0x00, 0x01, 0x00, 0x01, 0x00, 0x01, 0x00]);
        let total = expected.len();
        expected[4..8].copy_from_slice(&(total as u32 - 16).to_le_bytes());
        expected[18..20].copy_from_slice(&(total as u16 - 28).to_le_bytes());

        assert_eq!(bytes, expected);
    }

    #[test]
    fn text_objects_get_labels() {
        let strategy = StrategyBuilder::new("Notes")
            .object(PlacedObject::text("stack here", Point::new(100, 100)))
            .object(PlacedObject::new(ObjectKind::new(0x35), Point::new(-50, 20)).with_angle(-45))
            .build();
        assert_eq!(strategy.title().as_deref(), Some("Notes"));
        assert_eq!(strategy.labels(), vec![Some(Cow::from("stack here")), None]);
        assert_eq!(strategy.angles().unwrap().angles, vec![0, -45]);
        assert_eq!(strategy.sizes(), Some(&[100, 100][..]));
        assert!(strategy.validate(&BlockRegistry::STANDARD).is_ok());
    }

    #[test]
    fn empty_board_is_valid() {
        let strategy = StrategyBuilder::new("").build();
        assert_eq!(strategy.object_count(), 0);
        assert!(strategy.validate(&BlockRegistry::STANDARD).is_ok());
        assert!(encode_payload(&strategy).is_ok());
    }

    #[test]
    fn custom_key_and_styles() {
        let key = Symbol::from_char('Z').unwrap();
        let strategy = StrategyBuilder::new("x")
            .key(key)
            .objects([
                PlacedObject::new(ObjectKind::new(0x09), Point::from_units(25.6, 19.2))
                    .with_size(150)
                    .with_color(Rgba::rgb(255, 18, 45)),
            ])
            .build();
        assert_eq!(strategy.key, key);
        assert_eq!(strategy.colors(), Some(&[Rgba::rgb(255, 18, 45)][..]));
        assert_eq!(strategy.positions(), Some(&[Point::new(256, 192)][..]));
    }
}
