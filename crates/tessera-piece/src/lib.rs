//! Piece composition model for Tessera.
//!
//! A board token — a *piece* — is assembled from one leaf entity wrapped
//! by zero or more trait layers. Each layer owns the piece beneath it
//! exclusively, adds one behavior, and delegates everything else inward,
//! so external code only ever talks to the flat [`GamePiece`] capability
//! interface of the outermost layer.
//!
//! Construction is driven entirely by a piece's *type string*: the outer
//! layer's segment, a TAB, then the full type of what it wraps, recursed
//! down to the leaf. The [`PieceRegistry`] maps segment prefixes to
//! constructors and rebuilds a whole chain from such a string — this is
//! the extension point for new kinds of pieces, and the reason the wire
//! codec never needs to know a trait's concrete type.
//!
//! ```text
//! "mark;side=axis\trotate;6;ctrl+R;ctrl+L\tpiece;inf.png;Infantry"
//!   └ Marker ────── └ Rotate ──────────── └ BasicPiece
//! ```
//!
//! The crate also defines [`Command`], the closed set of state mutations
//! a game can broadcast; the wire form lives in `tessera-proto`.

mod basic;
mod command;
mod geometry;
mod keystroke;
mod layer;
mod marker;
mod moved;
mod piece;
mod registry;
mod rotate;
mod stack;

pub use basic::BasicPiece;
pub use command::{Command, MovePiece};
pub use geometry::{Bounds, Point, Shape};
pub use keystroke::{KeyStroke, ParseKeyStrokeError};
pub use layer::Layer;
pub use marker::Marker;
pub use moved::MoveMark;
pub use piece::{GamePiece, PieceId, CHAIN_DELIM};
pub use registry::{prefix_of, Notifier, PieceRegistry, SilentNotifier};
pub use rotate::Rotate;
pub use stack::StackPiece;
