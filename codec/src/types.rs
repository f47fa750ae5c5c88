//! Core value types for the block model.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The object type id carried by an object block.
///
/// Ids are assigned by the game (waymarks, job icons, AoE shapes, ...). The
/// codec does not interpret them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ObjectKind(u16);

impl ObjectKind {
    /// The free-text object; its text follows in a label block.
    pub const TEXT: Self = Self(0x64);

    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the raw type id.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl From<u16> for ObjectKind {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl From<ObjectKind> for u16 {
    fn from(kind: ObjectKind) -> Self {
        kind.0
    }
}

/// A board position in tenths of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    #[must_use]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Converts board units to tenths, truncating toward zero and
    /// saturating at the `i16` range.
    #[must_use]
    pub fn from_units(x: f32, y: f32) -> Self {
        Self::new((x * 10.0) as i16, (y * 10.0) as i16)
    }

    /// Returns the position in board units.
    #[must_use]
    pub fn to_units(self) -> (f32, f32) {
        (f32::from(self.x) / 10.0, f32::from(self.y) / 10.0)
    }
}

/// An object colour. The game writes alpha as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0 }
    }
}

/// Which of the three per-object parameter arrays a block holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParamSlot {
    A,
    B,
    C,
}

impl ParamSlot {
    pub const ALL: [Self; 3] = [Self::A, Self::B, Self::C];

    #[must_use]
    pub const fn tag(self) -> u16 {
        match self {
            Self::A => wire::tags::PARAM_A,
            Self::B => wire::tags::PARAM_B,
            Self::C => wire::tags::PARAM_C,
        }
    }

    #[must_use]
    pub const fn from_tag(tag: u16) -> Option<Self> {
        match tag {
            wire::tags::PARAM_A => Some(Self::A),
            wire::tags::PARAM_B => Some(Self::B),
            wire::tags::PARAM_C => Some(Self::C),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_kind_conversions() {
        let kind = ObjectKind::from(0x2F);
        assert_eq!(kind.raw(), 0x2F);
        assert_eq!(u16::from(kind), 0x2F);
        assert_eq!(ObjectKind::TEXT.raw(), 0x64);
    }

    #[test]
    fn point_units() {
        assert_eq!(Point::new(125, -40).to_units(), (12.5, -4.0));
        assert_eq!(Point::from_units(51.2, -0.05), Point::new(512, 0));
        assert_eq!(Point::from_units(1e6, -1e6), Point::new(i16::MAX, i16::MIN));
    }

    #[test]
    fn param_slot_tags() {
        for slot in ParamSlot::ALL {
            assert_eq!(ParamSlot::from_tag(slot.tag()), Some(slot));
        }
        assert_eq!(ParamSlot::from_tag(0x0009), None);
    }
}
