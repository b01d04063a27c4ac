//! Wire protocol for Tessera's command stream.
//!
//! Every state mutation travels as one line of text — over the network
//! to peers, and into the game log on disk. This crate converts between
//! [`Command`](tessera_piece::Command) values and that line form, both
//! directions, symmetrically: decoding a line and re-encoding the result
//! reproduces the original bytes.
//!
//! The format is frozen. Logs recorded years apart must still decode,
//! so the prefixes, the field orders, and even the warts (the `"null"`
//! sentinel collision) are locked down by tests and must not drift.
//!
//! # Architecture
//!
//! ```text
//! tessera-codec (fields) → tessera-proto (command lines) → relay / log
//! ```
//!
//! The codec never learns concrete piece types: add-piece validation
//! goes through the [`PieceRegistry`](tessera_piece::PieceRegistry), the
//! extension point shared with everything else.

mod error;
mod identity;
mod wire;

pub use error::ProtoError;
pub use identity::{FixedIdentity, PlayerIdSource};
pub use wire::{CommandCodec, PARAM_SEPARATOR};
