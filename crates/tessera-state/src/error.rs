//! Error types for the state layer.

use tessera_piece::PieceId;

/// Errors that can occur while applying a command to the game state.
///
/// Like decode errors, each is fatal to that command only; the caller
/// reports it and continues with the next command in the stream.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The command targets an id with no live piece. Remove commands
    /// are exempt (they apply silently for deferred delivery); change
    /// and move are not, because mutating a piece that is not there
    /// has no meaningful outcome.
    #[error("no piece with id {0} in the game")]
    UnknownPiece(PieceId),

    /// A move command arrived without a piece id to act on.
    #[error("move command carries no piece id")]
    MissingMoveId,

    /// An add command's piece type cannot be rebuilt by the registry.
    #[error("cannot rebuild piece of type {piece_type:?}")]
    UnbuildablePiece { piece_type: String },
}
