//! Error types for the wire codec.

use tessera_codec::CodecError;

/// Errors that can occur while decoding a command line.
///
/// Each value is fatal to *that command only*: callers processing a
/// stream (the relay inbound loop, the log replayer) report the bad
/// line and continue with the next. Encoding is total and has no error
/// type.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// The line starts with no known command prefix.
    #[error("command has no recognized prefix: {0:?}")]
    UnknownCommand(String),

    /// A required field is missing or a numeric field did not parse.
    #[error("malformed command field: {0}")]
    Malformed(#[from] CodecError),

    /// An add-piece command names a piece whose leaf kind has no
    /// registered constructor; the command cannot be applied anywhere
    /// in this process and is discarded.
    #[error("no registered leaf for piece type {piece_type:?}")]
    MissingLeaf { piece_type: String },
}
