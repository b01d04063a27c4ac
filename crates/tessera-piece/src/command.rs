//! The command model: every state mutation a game can broadcast.
//!
//! A [`Command`] is an immutable description of one mutation. It is
//! produced once (by a key event, a drag, a decode), may be executed
//! locally, and is independently encodable — it carries only the ids,
//! strings, and coordinates needed to replay the mutation, never a
//! handle into live engine state.
//!
//! The set is deliberately **closed**: the wire codec matches
//! exhaustively, so adding a variant here refuses to compile until the
//! codec handles it.

use crate::{PieceId, Point};

/// One replayable state mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Nothing. Encodes to the empty string; an empty line decodes to
    /// this.
    Noop,

    /// Introduce a piece. `id` is absent when the sender lets the
    /// receiver assign one; `piece_type` drives reconstruction through
    /// the registry; `state` is applied to the rebuilt piece verbatim.
    Add {
        id: Option<PieceId>,
        piece_type: String,
        state: String,
    },

    /// Take a piece off the game. Carries only the id so it can be
    /// applied even when (or before) the piece is known locally.
    Remove { id: PieceId },

    /// Replace a piece's state string. `old_state` is recorded when
    /// available so the change can be undone; senders that do not know
    /// it omit the field entirely on the wire.
    Change {
        id: PieceId,
        new_state: String,
        old_state: Option<String>,
    },

    /// Relocate a piece between surfaces/positions. See [`MovePiece`].
    Move(MovePiece),

    /// Play a named audio clip on every peer. Playback itself is an
    /// external concern; the engine only transports the name.
    PlayClip { clip: String },
}

/// The payload of [`Command::Move`]: both endpoints of a relocation,
/// plus the acting player.
///
/// Old-side fields let peers animate or undo the move; `new_under` /
/// `old_under` name the piece this one was placed beneath within a
/// stack, when any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePiece {
    pub id: Option<PieceId>,
    pub new_group: Option<String>,
    pub new_position: Point,
    pub new_under: Option<PieceId>,
    pub old_group: Option<String>,
    pub old_position: Point,
    pub old_under: Option<PieceId>,
    /// Who performed the move. Filled from the local player identity
    /// when the wire form omits it.
    pub player: String,
}

impl MovePiece {
    /// The same relocation run backwards: endpoints swapped, same
    /// acting player.
    pub fn reversed(&self) -> MovePiece {
        MovePiece {
            id: self.id.clone(),
            new_group: self.old_group.clone(),
            new_position: self.old_position,
            new_under: self.old_under.clone(),
            old_group: self.new_group.clone(),
            old_position: self.new_position,
            old_under: self.new_under.clone(),
            player: self.player.clone(),
        }
    }
}

impl Command {
    /// `true` for [`Command::Noop`].
    pub fn is_noop(&self) -> bool {
        matches!(self, Command::Noop)
    }

    /// Derives the command that reverses this one, where that is
    /// possible from the data carried:
    ///
    /// - a change undoes by swapping new/old state — but only when the
    ///   old state was recorded;
    /// - a move undoes by swapping its endpoints;
    /// - an add with a known id undoes by removing that id;
    /// - a remove is not derivable (the removed piece's type and state
    ///   are gone), nor is a played clip.
    pub fn undo(&self) -> Option<Command> {
        match self {
            Command::Noop => Some(Command::Noop),
            Command::Add { id: Some(id), .. } => {
                Some(Command::Remove { id: id.clone() })
            }
            Command::Add { id: None, .. } => None,
            Command::Remove { .. } => None,
            Command::Change {
                id,
                new_state,
                old_state: Some(old),
            } => Some(Command::Change {
                id: id.clone(),
                new_state: old.clone(),
                old_state: Some(new_state.clone()),
            }),
            Command::Change {
                old_state: None, ..
            } => None,
            Command::Move(mv) => Some(Command::Move(mv.reversed())),
            Command::PlayClip { .. } => None,
        }
    }
}
