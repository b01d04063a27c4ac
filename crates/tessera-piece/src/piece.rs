//! The piece capability interface.
//!
//! [`GamePiece`] is the one contract every token-like entity satisfies,
//! leaf or trait layer alike. External code — the board view, the
//! editor, rules evaluation — depends only on this trait plus property
//! lookup by name, never on a concrete piece type. That is what lets a
//! module add new trait kinds without touching any consumer.

use std::fmt;

use crate::{Bounds, Command, KeyStroke, Point, Shape};

/// Delimiter between a trait layer's own segment and the full
/// type/state of the piece it wraps.
///
/// Distinct from the `/` used between command fields and the `;` used
/// inside a single segment: one character per nesting level keeps the
/// escaping shallow. Frozen — changing it breaks every recorded type
/// string.
pub const CHAIN_DELIM: char = '\t';

/// A process-unique piece identifier.
///
/// Assigned once when a piece enters the game and stable for the
/// piece's lifetime; commands correlate across peers by this id. A
/// newtype rather than a bare `String` so ids cannot be confused with
/// the many other strings flowing through the codec.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(String);

impl PieceId {
    /// Wraps a raw id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw wire form of the id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PieceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PieceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The capability set of a board token.
///
/// Trait layers implement this by delegating inward (see
/// [`Layer`](crate::Layer)); leaves implement it directly. Whoever holds
/// a piece always holds the *outermost* layer, so calling any method
/// here traverses the chain outer→inner — the canonical order.
///
/// # Type vs. state
///
/// `piece_type()` is immutable and fully determines construction: the
/// leaf kind, the trait layers, and each layer's fixed configuration.
/// `state()` is everything that changes during play and is re-derivable
/// by each layer's own state handling; between layers it is an opaque
/// payload that must be carried faithfully.
pub trait GamePiece: Send {
    /// The unique id, if one has been assigned yet.
    ///
    /// Pieces built from a type string have no id until the game state
    /// assigns one; pieces arriving in an add-piece command carry
    /// theirs.
    fn id(&self) -> Option<&PieceId>;

    /// Assigns the unique id. Effective once: later calls on a piece
    /// that already has an id are ignored.
    fn set_id(&mut self, id: PieceId);

    /// The immutable type string this piece was (or could be) built
    /// from. Reconstructible: building a piece from `t` and reading
    /// this back yields `t` again.
    fn piece_type(&self) -> String;

    /// The mutable state string: everything not implied by type.
    fn state(&self) -> String;

    /// Restores state captured by [`state`](Self::state).
    fn set_state(&mut self, state: &str);

    /// Human-readable piece name, for chat reports and the editor.
    fn name(&self) -> String;

    /// Current position on the owning surface.
    fn position(&self) -> Point;

    /// Moves the piece. Trait layers may observe this (a movement
    /// marker sets its flag here) but must pass it inward.
    fn set_position(&mut self, pos: Point);

    /// The area the piece occupies when drawn at the origin.
    fn bounding_box(&self) -> Bounds;

    /// The fine-grained hit-test outline, origin-relative.
    fn shape(&self) -> Shape;

    /// The enclosing group (stack) this piece belongs to, if any.
    /// A back-reference only — the group never owns its members.
    fn parent(&self) -> Option<&PieceId>;

    /// Sets or clears the enclosing-group reference.
    fn set_parent(&mut self, parent: Option<PieceId>);

    /// Offers a keystroke to the chain: each layer either claims it
    /// (mutating its own flags and returning `true`) or passes it
    /// inward. Returns `false` if nothing claimed it.
    ///
    /// This is the claim-or-delegate hook behind
    /// [`key_event`](Self::key_event); call that instead from outside
    /// the chain.
    fn handle_key(&mut self, stroke: KeyStroke) -> bool;

    /// Looks up a named property, delegating down the chain until a
    /// layer claims the key or the leaf returns its default. Used by
    /// rules evaluation that must not know the chain's composition.
    fn property(&self, key: &str) -> Option<String>;

    /// Accepts a keystroke and returns a command that replays the
    /// resulting effect on any peer — or [`Command::Noop`] if the
    /// stroke was not handled (or the piece has no id yet, in which
    /// case there is nothing for a peer to correlate).
    ///
    /// The default implementation snapshots the full chain state
    /// before and after [`handle_key`](Self::handle_key); because
    /// callers always hold the outermost layer, the snapshot covers
    /// every layer's contribution.
    fn key_event(&mut self, stroke: KeyStroke) -> Command {
        let before = self.state();
        if !self.handle_key(stroke) {
            return Command::Noop;
        }
        let after = self.state();
        match self.id() {
            Some(id) => Command::Change {
                id: id.clone(),
                new_state: after,
                old_state: Some(before),
            },
            None => Command::Noop,
        }
    }
}
