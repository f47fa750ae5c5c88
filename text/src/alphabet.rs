//! The 64-symbol alphabet used inside strategy tokens.

/// Symbols in value order: `A`-`Z` are 0-25, `a`-`z` 26-51, `0`-`9` 52-61,
/// then `+` and `-`.
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+-";

/// Number of bits carried by one symbol.
pub const SYMBOL_BITS: u8 = 6;

const NO_SYMBOL: u8 = 0xFF;

static DECODE_TABLE: [u8; 256] = build_decode_table();

const fn build_decode_table() -> [u8; 256] {
    let mut table = [NO_SYMBOL; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// A single alphabet symbol, holding its 6-bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u8);

impl Symbol {
    /// Key symbol used for newly encoded tokens.
    pub const DEFAULT_KEY: Self = Self(26); // 'a'

    /// Creates a symbol from its value, if it is below 64.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value < 64 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Creates a symbol from the low six bits of `bits`.
    #[must_use]
    pub const fn from_low_bits(bits: u8) -> Self {
        Self(bits & 0x3F)
    }

    /// Looks up the symbol for a character.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        if !c.is_ascii() {
            return None;
        }
        match DECODE_TABLE[c as usize] {
            NO_SYMBOL => None,
            value => Some(Self(value)),
        }
    }

    /// Returns the 6-bit value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the character for this symbol.
    #[must_use]
    pub const fn to_char(self) -> char {
        ALPHABET[self.0 as usize] as char
    }

    /// Adds `by` modulo 64.
    #[must_use]
    pub const fn rotate(self, by: u8) -> Self {
        Self(self.0.wrapping_add(by) & 0x3F)
    }

    /// Subtracts `by` modulo 64.
    #[must_use]
    pub const fn unrotate(self, by: u8) -> Self {
        Self(self.0.wrapping_sub(by) & 0x3F)
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self::DEFAULT_KEY
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Symbols serialize as their character, e.g. `"a"`.
#[cfg(feature = "serde")]
impl serde::Serialize for Symbol {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.to_char())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Symbol {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let c = <char as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_char(c)
            .ok_or_else(|| serde::de::Error::custom(format!("{c:?} is not a strategy symbol")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_is_a_bijection() {
        for (value, &byte) in ALPHABET.iter().enumerate() {
            let symbol = Symbol::from_char(byte as char).unwrap();
            assert_eq!(symbol.value() as usize, value);
            assert_eq!(symbol.to_char(), byte as char);
        }
    }

    #[test]
    fn default_key_is_lowercase_a() {
        assert_eq!(Symbol::DEFAULT_KEY.to_char(), 'a');
        assert_eq!(Symbol::default(), Symbol::from_char('a').unwrap());
    }

    #[test]
    fn rejects_characters_outside_alphabet() {
        for c in ['/', '_', '=', ' ', '\n', ']', '[', ':', 'é', '０'] {
            assert_eq!(Symbol::from_char(c), None, "{c:?} must not be a symbol");
        }
    }

    #[test]
    fn plus_and_minus_are_the_last_symbols() {
        assert_eq!(Symbol::from_char('+').unwrap().value(), 62);
        assert_eq!(Symbol::from_char('-').unwrap().value(), 63);
    }

    #[test]
    fn new_rejects_values_past_63() {
        assert!(Symbol::new(63).is_some());
        assert!(Symbol::new(64).is_none());
    }

    #[test]
    fn from_low_bits_masks() {
        assert_eq!(Symbol::from_low_bits(0xFF).value(), 63);
        assert_eq!(Symbol::from_low_bits(64).value(), 0);
    }

    #[test]
    fn rotate_wraps_modulo_64() {
        let minus = Symbol::new(63).unwrap();
        assert_eq!(minus.rotate(1).value(), 0);
        assert_eq!(Symbol::new(0).unwrap().unrotate(1).value(), 63);
        for by in 0..=255u8 {
            assert_eq!(minus.rotate(by).unrotate(by), minus);
        }
    }
}
