//! Field-sequence codec for Tessera.
//!
//! Every wire string in the engine — command lines, piece type strings,
//! piece state strings — is a flat list of text fields joined over a
//! single separator character. This crate owns that one job:
//!
//! - **Join/split** ([`join`], [`split`]) — exact inverses for any field
//!   list. Separator characters inside a field are escaped, so splitting
//!   always recovers the original fields.
//! - **Writer/reader** ([`SequenceWriter`], [`SequenceReader`]) — the
//!   streaming form used by the command codec: append fields one by one,
//!   read them back one by one with defaults for trailing optional
//!   fields.
//! - **Absent-field sentinel** ([`NULL_TOKEN`], [`wrap_null`],
//!   [`unwrap_null`]) — the literal token `null` stands in for a field
//!   that is logically absent. This is a caller-side convention layered
//!   on top of the codec, distinct from escaping.
//!
//! The crate is deliberately dependency-light and synchronous: these are
//! pure string transformations, called from both the network path and
//! the game-log replay path.

mod error;
mod sequence;

pub use error::CodecError;
pub use sequence::{
    join, split, unwrap_null, wrap_null, SequenceReader, SequenceWriter,
    NULL_TOKEN,
};
