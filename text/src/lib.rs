//! Text layer of the stgy strategy-code codec.
//!
//! A strategy token looks like `[stgy:aXyZ...]`. This crate handles
//! everything between the string and the compressed byte stream it carries:
//!
//! - [`envelope`] strips and adds the `[stgy:` / `]` markers.
//! - [`alphabet`] maps characters to 6-bit [`Symbol`] values.
//! - [`transcode`] turns the key symbol plus data symbols into bytes and back.
//!
//! # Design Principles
//!
//! - **Byte agnostic** - Payload bytes are opaque here; compression and
//!   block structure live in higher layers.
//! - **Policy driven** - Non-canonical text is either rejected or reported,
//!   depending on [`DecodePolicy`].
//! - **Positions in errors** - Every invalid character is reported with its
//!   index inside the payload.
//!
//! # Example
//!
//! ```
//! use text::{decode_token, encode_token, DecodePolicy, Symbol};
//!
//! let token = encode_token(b"Man", Symbol::DEFAULT_KEY);
//! assert_eq!(token, "[stgy:auyiM]");
//!
//! let decoded = decode_token(&token, DecodePolicy::Strict).unwrap();
//! assert_eq!(decoded.bytes, b"Man");
//! ```

pub mod alphabet;
pub mod envelope;
mod error;
mod policy;
pub mod transcode;

pub use alphabet::{Symbol, ALPHABET, SYMBOL_BITS};
pub use envelope::{find_tokens, unwrap, wrap, PREFIX, SUFFIX};
pub use error::{EnvelopeFault, TextError, TextResult};
pub use policy::DecodePolicy;
pub use transcode::{decode_text, encode_text, DecodedText, TextQuirks};

/// Encodes bytes into a complete `[stgy:...]` token.
#[must_use]
pub fn encode_token(bytes: &[u8], key: Symbol) -> String {
    wrap(&encode_text(bytes, key))
}

/// Decodes a complete `[stgy:...]` token into its key and bytes.
///
/// # Errors
///
/// Returns any envelope or transcoding error; see [`unwrap`] and
/// [`decode_text`].
pub fn decode_token(token: &str, policy: DecodePolicy) -> TextResult<DecodedText> {
    decode_text(unwrap(token)?, policy)
}
