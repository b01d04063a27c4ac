//! Error type for the engine facade.

use tessera_proto::ProtoError;
use tessera_state::StateError;

/// Anything that can go wrong while driving a [`GameModule`].
///
/// Wire and state errors stay per-command (report, skip, continue);
/// I/O errors come from the game log and usually deserve a retry or a
/// user-facing complaint.
///
/// [`GameModule`]: crate::GameModule
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A command line failed to decode.
    #[error(transparent)]
    Proto(#[from] ProtoError),

    /// A command failed to apply to the live table.
    #[error(transparent)]
    State(#[from] StateError),

    /// A locally requested piece type has no registered constructor.
    #[error("piece type {piece_type:?} cannot be built")]
    UnbuildablePiece { piece_type: String },

    /// Reading or writing the game log failed.
    #[error("game log I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
