//! Block tags, framing rules and the tag registry.
//!
//! The same tag can mean different things depending on where it appears, so
//! every rule belongs to a [`Section`]. Payloads start in
//! [`Section::Objects`]; the first block whose rule lives in
//! [`Section::Parameters`] moves the framer there for the rest of the payload.

use std::fmt;

use crate::frame::array_body_len;
use crate::header::u16_at;

/// Tag values used by the game.
pub mod tags {
    pub const TITLE: u16 = 0x0001;
    pub const OBJECT: u16 = 0x0002;
    /// Text of the preceding text object (objects section).
    pub const LABEL: u16 = 0x0003;
    /// Closing array (parameters section).
    pub const TRAILER: u16 = 0x0003;
    pub const LAYERS: u16 = 0x0004;
    pub const POSITIONS: u16 = 0x0005;
    pub const ANGLES: u16 = 0x0006;
    pub const SIZES: u16 = 0x0007;
    pub const COLORS: u16 = 0x0008;
    pub const PARAM_A: u16 = 0x000A;
    pub const PARAM_B: u16 = 0x000B;
    pub const PARAM_C: u16 = 0x000C;
}

/// Framing context that selects the rule for a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Section {
    Objects,
    Parameters,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Objects => "objects",
            Self::Parameters => "parameters",
        };
        write!(f, "{name}")
    }
}

/// Element kinds of array blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum ElementKind {
    /// One byte per element.
    Byte = 0,
    /// One little-endian 16-bit word per element.
    Word = 1,
    /// Four bytes per element (a colour quad).
    Quad = 2,
    /// Two little-endian 16-bit words per element (a coordinate pair).
    Point = 3,
}

impl ElementKind {
    /// Parses an element kind from its raw value.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            0 => Some(Self::Byte),
            1 => Some(Self::Word),
            2 => Some(Self::Quad),
            3 => Some(Self::Point),
            _ => None,
        }
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self as u16
    }

    /// Size of one element in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Word => 2,
            Self::Quad | Self::Point => 4,
        }
    }
}

/// How the length of a block body is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// A body of exactly this many bytes.
    Fixed(usize),
    /// `len:u16` followed by `len` bytes.
    LengthPrefixed,
    /// `kind:u16, count:u16`, `count` elements, then one pad byte if the
    /// element bytes are odd.
    Array,
}

impl Layout {
    /// Length this layout gives a body that starts at `body[0]`.
    ///
    /// Returns `None` when the length field or array head is missing, or the
    /// array element kind is unknown.
    #[must_use]
    pub fn measure(self, body: &[u8]) -> Option<usize> {
        match self {
            Self::Fixed(len) => Some(len),
            Self::LengthPrefixed => u16_at(body, 0).map(|len| 2 + usize::from(len)),
            Self::Array => {
                let kind = ElementKind::from_raw(u16_at(body, 0)?)?;
                let count = u16_at(body, 2)?;
                Some(array_body_len(kind, usize::from(count)))
            }
        }
    }
}

/// The framing rule for one tag in one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRule {
    pub tag: u16,
    pub section: Section,
    pub layout: Layout,
    pub name: &'static str,
}

impl BlockRule {
    #[must_use]
    pub const fn new(tag: u16, section: Section, layout: Layout, name: &'static str) -> Self {
        Self {
            tag,
            section,
            layout,
            name,
        }
    }
}

/// Rules for every block the game writes.
pub const STANDARD_RULES: &[BlockRule] = &[
    BlockRule::new(tags::TITLE, Section::Objects, Layout::LengthPrefixed, "title"),
    BlockRule::new(tags::OBJECT, Section::Objects, Layout::Fixed(2), "object"),
    BlockRule::new(tags::LABEL, Section::Objects, Layout::LengthPrefixed, "label"),
    BlockRule::new(tags::TRAILER, Section::Parameters, Layout::Array, "trailer"),
    BlockRule::new(tags::LAYERS, Section::Parameters, Layout::Array, "layers"),
    BlockRule::new(tags::POSITIONS, Section::Parameters, Layout::Array, "positions"),
    BlockRule::new(tags::ANGLES, Section::Parameters, Layout::Array, "angles"),
    BlockRule::new(tags::SIZES, Section::Parameters, Layout::Array, "sizes"),
    BlockRule::new(tags::COLORS, Section::Parameters, Layout::Array, "colors"),
    BlockRule::new(tags::PARAM_A, Section::Parameters, Layout::Array, "param_a"),
    BlockRule::new(tags::PARAM_B, Section::Parameters, Layout::Array, "param_b"),
    BlockRule::new(tags::PARAM_C, Section::Parameters, Layout::Array, "param_c"),
];

/// An immutable table of framing rules.
///
/// Standard rules are consulted first. A registry built with
/// [`BlockRegistry::extended`] adds tags; an extra rule for a section and
/// tag the game already uses is never reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRegistry {
    standard: &'static [BlockRule],
    extra: &'static [BlockRule],
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl BlockRegistry {
    /// The rules the game uses.
    pub const STANDARD: Self = Self {
        standard: STANDARD_RULES,
        extra: &[],
    };

    /// The standard rules plus `extra`.
    #[must_use]
    pub const fn extended(extra: &'static [BlockRule]) -> Self {
        Self {
            standard: STANDARD_RULES,
            extra,
        }
    }

    /// Iterates every rule, standard rules first.
    pub fn rules(&self) -> impl Iterator<Item = &'static BlockRule> {
        let (standard, extra) = (self.standard, self.extra);
        standard.iter().chain(extra.iter())
    }

    fn find(&self, section: Section, tag: u16) -> Option<&'static BlockRule> {
        self.rules()
            .find(|rule| rule.section == section && rule.tag == tag)
    }

    /// Finds the rule for `tag` when the framer is in `section`.
    ///
    /// From the objects section a parameters rule also matches; the
    /// returned rule's section is the section the framer is in afterwards.
    #[must_use]
    pub fn lookup(&self, section: Section, tag: u16) -> Option<&'static BlockRule> {
        match section {
            Section::Objects => self
                .find(Section::Objects, tag)
                .or_else(|| self.find(Section::Parameters, tag)),
            Section::Parameters => self.find(Section::Parameters, tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_sizes() {
        assert_eq!(ElementKind::Byte.size(), 1);
        assert_eq!(ElementKind::Word.size(), 2);
        assert_eq!(ElementKind::Quad.size(), 4);
        assert_eq!(ElementKind::Point.size(), 4);
    }

    #[test]
    fn element_kind_raw_roundtrip() {
        for raw in 0..4 {
            assert_eq!(ElementKind::from_raw(raw).unwrap().raw(), raw);
        }
        assert_eq!(ElementKind::from_raw(4), None);
    }

    #[test]
    fn tag_three_depends_on_section() {
        let registry = BlockRegistry::STANDARD;
        let label = registry.lookup(Section::Objects, 3).unwrap();
        assert_eq!(label.name, "label");
        assert_eq!(label.layout, Layout::LengthPrefixed);

        let trailer = registry.lookup(Section::Parameters, 3).unwrap();
        assert_eq!(trailer.name, "trailer");
        assert_eq!(trailer.layout, Layout::Array);
    }

    #[test]
    fn objects_section_enters_parameters() {
        let rule = BlockRegistry::STANDARD
            .lookup(Section::Objects, tags::LAYERS)
            .unwrap();
        assert_eq!(rule.section, Section::Parameters);
    }

    #[test]
    fn parameters_section_does_not_go_back() {
        let registry = BlockRegistry::STANDARD;
        assert!(registry.lookup(Section::Parameters, tags::TITLE).is_none());
        assert!(registry.lookup(Section::Parameters, tags::OBJECT).is_none());
    }

    #[test]
    fn unknown_tags_have_no_rule() {
        let registry = BlockRegistry::default();
        assert!(registry.lookup(Section::Objects, 0x0009).is_none());
        assert!(registry.lookup(Section::Parameters, 0xFFFF).is_none());
    }

    #[test]
    fn extended_registry_adds_but_never_overrides() {
        static EXTRA: &[BlockRule] = &[
            BlockRule::new(0x0009, Section::Parameters, Layout::Array, "param_x"),
            BlockRule::new(tags::OBJECT, Section::Objects, Layout::Fixed(6), "object_wide"),
        ];
        let registry = BlockRegistry::extended(EXTRA);
        assert_eq!(
            registry.lookup(Section::Parameters, 0x0009).unwrap().name,
            "param_x"
        );
        let object = registry.lookup(Section::Objects, tags::OBJECT).unwrap();
        assert_eq!(object.name, "object");
        assert_eq!(object.layout, Layout::Fixed(2));
        assert_eq!(registry.rules().count(), STANDARD_RULES.len() + 2);
    }

    #[test]
    fn layouts_measure_bodies() {
        assert_eq!(Layout::Fixed(2).measure(&[]), Some(2));
        assert_eq!(Layout::LengthPrefixed.measure(&[3, 0, b'a']), Some(5));
        assert_eq!(Layout::LengthPrefixed.measure(&[3]), None);
        // five words plus the head
        assert_eq!(Layout::Array.measure(&[1, 0, 5, 0]), Some(14));
        // three bytes plus the head and a pad byte
        assert_eq!(Layout::Array.measure(&[0, 0, 3, 0]), Some(8));
        assert_eq!(Layout::Array.measure(&[9, 0, 1, 0]), None);
        assert_eq!(Layout::Array.measure(&[1, 0, 1]), None);
    }

    #[test]
    fn standard_rules_are_unique_per_section() {
        for (i, a) in STANDARD_RULES.iter().enumerate() {
            for b in &STANDARD_RULES[i + 1..] {
                assert!(
                    a.tag != b.tag || a.section != b.section,
                    "duplicate rule for 0x{:04X}",
                    a.tag
                );
            }
        }
    }
}
