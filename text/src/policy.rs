//! Decode policy shared by every layer of the codec.

/// How strictly non-canonical input is treated.
///
/// `Lenient` accepts tokens produced by older or third-party encoders:
/// a dangling final symbol, stray padding bits and non-canonical
/// compression are tolerated. `Strict` rejects all of them, so every
/// accepted token re-encodes to itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DecodePolicy {
    Strict,
    #[default]
    Lenient,
}

impl DecodePolicy {
    #[must_use]
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_lenient() {
        assert_eq!(DecodePolicy::default(), DecodePolicy::Lenient);
        assert!(!DecodePolicy::default().is_strict());
        assert!(DecodePolicy::Strict.is_strict());
    }
}
