//! Strategy-code encoding and decoding.
//!
//! This is the main codec crate that ties together text, compression and
//! wire framing to convert between a `[stgy:...]` token and a typed
//! [`Strategy`].
//!
//! ```
//! use codec::{decode_strategy, encode_strategy, ObjectKind, PlacedObject, Point, StrategyBuilder};
//!
//! let board = StrategyBuilder::new("Adds")
//!     .object(PlacedObject::new(ObjectKind::new(0x2F), Point::new(0, 0)))
//!     .build();
//! let token = encode_strategy(&board).unwrap();
//! assert!(token.starts_with("[stgy:a"));
//!
//! let decoded = decode_strategy(&token).unwrap();
//! assert_eq!(decoded.blocks, board.blocks);
//! ```
//!
//! # Features
//!
//! - Typed blocks for every tag the game writes, opaque blocks for the rest
//! - Strict (canonical only) and lenient (legacy encoder) decoding
//! - Bounded decoding: token, compressed and payload sizes are capped
//! - Optional `serde` support for the model
//!
//! # Design Principles
//!
//! - **Exact round trip** - A strictly decoded token re-encodes to itself.
//! - **Fail closed** - Any stage failure aborts the call; no partial model.
//! - **Deterministic** - Same inputs produce same outputs.

mod angle;
mod array;
mod block;
mod builder;
mod compress;
mod error;
mod limits;
mod payload;
mod strategy;
mod token;
mod types;

pub use angle::{decode_angle, encode_angle, AngleBlock};
pub use block::{Block, OpaqueBlock, SizeBlock, TextBlock};
pub use builder::{PlacedObject, StrategyBuilder, DEFAULT_SIZE};
pub use compress::{deflate, inflate, Container, Inflated, COMPRESSION_LEVEL};
pub use error::{CodecError, CodecResult, ErrorKind, LimitKind, ModelFault};
pub use limits::{CodecLimits, DecodeOptions};
pub use payload::{decode_payload, decode_payload_with, encode_payload, encode_payload_with};
pub use strategy::Strategy;
pub use text::{DecodePolicy, Symbol};
pub use token::{decode_strategy, decode_strategy_with, encode_strategy, encode_strategy_with};
pub use types::{ObjectKind, ParamSlot, Point, Rgba};
pub use wire::{BlockRegistry, Limits as WireLimits, PayloadHeader};
