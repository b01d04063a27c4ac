//! Encode/decode between [`Command`] values and command lines.
//!
//! Each variant owns a fixed literal prefix that selects its decode
//! branch:
//!
//! | line                         | command            |
//! |------------------------------|--------------------|
//! | `+/<id>/<type>/<state>`      | add-piece          |
//! | `-/<id>`                     | remove-piece       |
//! | `D/<id>/<new>[/<old>]`       | change-piece-state |
//! | `M/<ten fields>`             | move-piece         |
//! | `AUDIO<TAB><clip>`           | play-audio-clip    |
//! | (empty line)                 | no-op              |
//!
//! Two distinct optionality mechanisms, never conflated: fields that
//! are *always present but may be logically absent* are wrap-null'd
//! (written as the literal `null`); the change command's old-state is
//! instead *omitted entirely* when unknown. Remove-piece is the odd one
//! out historically: its id rides as the raw unescaped tail of the
//! line, both directions.

use std::sync::Arc;

use tessera_codec::{unwrap_null, SequenceReader, SequenceWriter};
use tessera_piece::{Command, MovePiece, PieceId, PieceRegistry, Point};

use crate::{FixedIdentity, PlayerIdSource, ProtoError};

/// Separator between the fields of one command line.
pub const PARAM_SEPARATOR: char = '/';

const ADD: &str = "+/";
const REMOVE: &str = "-/";
const CHANGE: &str = "D/";
const MOVE: &str = "M/";

/// The audio command is self-describing: a tag field plus the clip
/// name, joined over TAB rather than the command separator.
const CLIP_TAG: &str = "AUDIO";
const CLIP_DELIM: char = '\t';

/// Symmetric encoder/decoder for the command stream.
///
/// Holds the piece registry (to validate add-piece buildability at
/// decode time) and the local player identity (to default the acting
/// player of moves whose sender omitted it). Both are read-only here,
/// so a codec can be shared freely once built.
pub struct CommandCodec {
    registry: Arc<PieceRegistry>,
    identity: Arc<dyn PlayerIdSource>,
}

impl CommandCodec {
    /// Creates a codec over the given registry with an anonymous local
    /// identity.
    pub fn new(registry: Arc<PieceRegistry>) -> Self {
        Self {
            registry,
            identity: Arc::new(FixedIdentity::anonymous()),
        }
    }

    /// Replaces the local player identity source.
    pub fn with_identity(mut self, identity: Arc<dyn PlayerIdSource>) -> Self {
        self.identity = identity;
        self
    }

    /// The registry this codec validates piece types against.
    pub fn registry(&self) -> &Arc<PieceRegistry> {
        &self.registry
    }

    /// Encodes a command into its line form.
    ///
    /// Total: every variant of the closed set has exactly one wire
    /// form. The `match` below is exhaustive on purpose — adding a
    /// command variant will not compile until it gets a branch here
    /// *and* in [`decode`](Self::decode).
    pub fn encode(&self, command: &Command) -> String {
        match command {
            Command::Noop => String::new(),

            Command::Add {
                id,
                piece_type,
                state,
            } => {
                let body = SequenceWriter::new(PARAM_SEPARATOR)
                    .append_opt(id.as_ref().map(PieceId::as_str))
                    .append(piece_type)
                    .append(state)
                    .finish();
                format!("{ADD}{body}")
            }

            // historical exception: the id is the raw tail, unescaped
            Command::Remove { id } => format!("{REMOVE}{}", id.as_str()),

            Command::Change {
                id,
                new_state,
                old_state,
            } => {
                let mut writer = SequenceWriter::new(PARAM_SEPARATOR)
                    .append(id.as_str())
                    .append(new_state);
                if let Some(old) = old_state {
                    writer = writer.append(old);
                }
                format!("{CHANGE}{}", writer.finish())
            }

            Command::Move(mv) => {
                let body = SequenceWriter::new(PARAM_SEPARATOR)
                    .append_opt(mv.id.as_ref().map(PieceId::as_str))
                    .append_opt(mv.new_group.as_deref())
                    .append_int(mv.new_position.x)
                    .append_int(mv.new_position.y)
                    .append_opt(mv.new_under.as_ref().map(PieceId::as_str))
                    .append_opt(mv.old_group.as_deref())
                    .append_int(mv.old_position.x)
                    .append_int(mv.old_position.y)
                    .append_opt(mv.old_under.as_ref().map(PieceId::as_str))
                    .append(&mv.player)
                    .finish();
                format!("{MOVE}{body}")
            }

            Command::PlayClip { clip } => SequenceWriter::new(CLIP_DELIM)
                .append(CLIP_TAG)
                .append(clip)
                .finish(),
        }
    }

    /// Decodes one command line.
    ///
    /// Dispatches strictly on the literal prefix; an empty line is a
    /// no-op. Errors are fatal to this command only — stream consumers
    /// skip the line and keep going.
    pub fn decode(&self, line: &str) -> Result<Command, ProtoError> {
        if line.is_empty() {
            return Ok(Command::Noop);
        }

        if let Some(body) = line.strip_prefix(ADD) {
            self.decode_add(body)
        } else if let Some(id) = line.strip_prefix(REMOVE) {
            Ok(Command::Remove {
                id: PieceId::from(id),
            })
        } else if let Some(body) = line.strip_prefix(CHANGE) {
            Self::decode_change(body)
        } else if let Some(body) = line.strip_prefix(MOVE) {
            self.decode_move(body)
        } else {
            self.decode_clip(line)
        }
    }

    fn decode_add(&self, body: &str) -> Result<Command, ProtoError> {
        let mut reader = SequenceReader::new(body, PARAM_SEPARATOR);
        let id_field = reader.next_field()?;
        let id = unwrap_null(&id_field).map(PieceId::from);
        let piece_type = reader.next_field()?;
        let state = reader.next_field()?;

        // The type must be buildable here, or the command can never be
        // applied; validating at decode lets the caller discard it as
        // one bad command instead of failing mid-application.
        if self.registry.build_piece(&piece_type).is_none() {
            tracing::debug!(piece_type = %piece_type, "discarding add command for unbuildable piece");
            return Err(ProtoError::MissingLeaf { piece_type });
        }

        Ok(Command::Add {
            id,
            piece_type,
            state,
        })
    }

    fn decode_change(body: &str) -> Result<Command, ProtoError> {
        let mut reader = SequenceReader::new(body, PARAM_SEPARATOR);
        let id = PieceId::from(reader.next_field()?);
        let new_state = reader.next_field()?;
        let old_state = if reader.has_more() {
            Some(reader.next_field()?)
        } else {
            None
        };
        Ok(Command::Change {
            id,
            new_state,
            old_state,
        })
    }

    fn decode_move(&self, body: &str) -> Result<Command, ProtoError> {
        let mut reader = SequenceReader::new(body, PARAM_SEPARATOR);

        let id = unwrap_null(&reader.next_field()?).map(PieceId::from);
        let new_group = unwrap_null(&reader.next_field()?).map(str::to_owned);
        let new_x = reader.next_int()?;
        let new_y = reader.next_int()?;
        let new_under = unwrap_null(&reader.next_field()?).map(PieceId::from);
        let old_group = unwrap_null(&reader.next_field()?).map(str::to_owned);
        let old_x = reader.next_int()?;
        let old_y = reader.next_int()?;
        let old_under = unwrap_null(&reader.next_field()?).map(PieceId::from);
        let player = reader.next_or(&self.identity.player_id());

        Ok(Command::Move(MovePiece {
            id,
            new_group,
            new_position: Point::new(new_x, new_y),
            new_under,
            old_group,
            old_position: Point::new(old_x, old_y),
            old_under,
            player,
        }))
    }

    fn decode_clip(&self, line: &str) -> Result<Command, ProtoError> {
        let mut reader = SequenceReader::new(line, CLIP_DELIM);
        match reader.next_field() {
            Ok(tag) if tag == CLIP_TAG => {
                let clip = reader.next_field()?;
                Ok(Command::PlayClip { clip })
            }
            _ => Err(ProtoError::UnknownCommand(line.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_piece::{BasicPiece, GamePiece};

    fn codec() -> CommandCodec {
        CommandCodec::new(Arc::new(PieceRegistry::with_defaults()))
    }

    #[test]
    fn test_add_encodes_wrap_null_id() {
        let cmd = Command::Add {
            id: None,
            piece_type: "stack".to_owned(),
            state: "null;0;0;".to_owned(),
        };
        assert_eq!(codec().encode(&cmd), "+/null/stack/null;0;0;");
    }

    #[test]
    fn test_add_escapes_separator_in_state() {
        let piece = BasicPiece::new("inf.png", "Infantry");
        let cmd = Command::Add {
            id: Some(PieceId::new("p1")),
            piece_type: piece.piece_type(),
            state: piece.state(),
        };
        let line = codec().encode(&cmd);
        // the type's own `;` fields pass through, `/` would be escaped
        assert_eq!(line, "+/p1/piece;inf.png;Infantry/null;0;0");
        let decoded = codec().decode(&line).unwrap();
        assert_eq!(decoded, cmd);
    }

    #[test]
    fn test_change_omits_absent_old_state_entirely() {
        let cmd = Command::Change {
            id: PieceId::new("p1"),
            new_state: "S2".to_owned(),
            old_state: None,
        };
        assert_eq!(codec().encode(&cmd), "D/p1/S2");
    }

    #[test]
    fn test_change_appends_present_old_state() {
        let cmd = Command::Change {
            id: PieceId::new("p1"),
            new_state: "S2".to_owned(),
            old_state: Some("S1".to_owned()),
        };
        assert_eq!(codec().encode(&cmd), "D/p1/S2/S1");
    }

    #[test]
    fn test_move_with_absent_fields_embeds_null_sentinels() {
        let cmd = Command::Move(MovePiece {
            id: Some(PieceId::new("p3")),
            new_group: None,
            new_position: Point::new(10, 20),
            new_under: None,
            old_group: Some("board".to_owned()),
            old_position: Point::new(-1, -2),
            old_under: None,
            player: "alice".to_owned(),
        });
        let line = codec().encode(&cmd);
        assert_eq!(line, "M/p3/null/10/20/null/board/-1/-2/null/alice");

        // decoding recovers real absence, not the string "null"
        let Command::Move(mv) = codec().decode(&line).unwrap() else {
            panic!("expected a move");
        };
        assert_eq!(mv.new_group, None);
        assert_eq!(mv.new_under, None);
        assert_eq!(mv.old_group.as_deref(), Some("board"));
    }

    #[test]
    fn test_move_missing_player_defaults_from_identity() {
        let codec = CommandCodec::new(Arc::new(PieceRegistry::with_defaults()))
            .with_identity(Arc::new(FixedIdentity::new("local-player")));
        let line = "M/p3/null/10/20/null/null/0/0/null";
        let Command::Move(mv) = codec.decode(line).unwrap() else {
            panic!("expected a move");
        };
        assert_eq!(mv.player, "local-player");
    }

    #[test]
    fn test_move_bad_coordinate_is_a_hard_error() {
        let line = "M/p3/null/ten/20/null/null/0/0/null/alice";
        let err = codec().decode(line).unwrap_err();
        assert!(matches!(err, ProtoError::Malformed(_)));
    }

    #[test]
    fn test_clip_round_trip() {
        let cmd = Command::PlayClip {
            clip: "sounds/dice.wav".to_owned(),
        };
        let line = codec().encode(&cmd);
        assert_eq!(line, "AUDIO\tsounds/dice.wav");
        assert_eq!(codec().decode(&line).unwrap(), cmd);
    }

    #[test]
    fn test_unknown_prefix_is_an_error() {
        let err = codec().decode("Z/huh").unwrap_err();
        assert!(matches!(err, ProtoError::UnknownCommand(_)));
    }

    #[test]
    fn test_add_with_unregistered_leaf_fails_decode() {
        let err = codec()
            .decode("+/p1/hologram;x/some-state")
            .unwrap_err();
        match err {
            ProtoError::MissingLeaf { piece_type } => {
                assert_eq!(piece_type, "hologram;x");
            }
            other => panic!("expected MissingLeaf, got {other:?}"),
        }
    }

    #[test]
    fn test_remove_id_rides_raw() {
        // the historical raw tail: even separator characters pass
        // through untouched in a remove id
        let cmd = Command::Remove {
            id: PieceId::new("odd/id"),
        };
        let line = codec().encode(&cmd);
        assert_eq!(line, "-/odd/id");
        assert_eq!(codec().decode(&line).unwrap(), cmd);
    }
}
