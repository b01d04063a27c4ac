//! The live token table.

use std::collections::HashMap;
use std::sync::Arc;

use tessera_piece::{
    Command, GamePiece, KeyStroke, PieceId, PieceRegistry,
};

use crate::{NullSound, SoundSink, StateError};

/// All live pieces of one running game, keyed by id.
///
/// Owns the outermost layer of every chain (and therefore, through the
/// ownership links, every chain completely). External consumers — the
/// wire codec, the board view — borrow pieces through
/// [`lookup`](Self::lookup) and never hold them.
pub struct GameState {
    registry: Arc<PieceRegistry>,
    pieces: HashMap<PieceId, Box<dyn GamePiece>>,
    next_id: u64,
    sound: Arc<dyn SoundSink>,
}

impl GameState {
    /// Creates an empty game over the given registry.
    pub fn new(registry: Arc<PieceRegistry>) -> Self {
        Self {
            registry,
            pieces: HashMap::new(),
            next_id: 1,
            sound: Arc::new(NullSound),
        }
    }

    /// Replaces the audio hook.
    pub fn with_sound(mut self, sound: Arc<dyn SoundSink>) -> Self {
        self.sound = sound;
        self
    }

    /// The registry used to materialize incoming pieces.
    pub fn registry(&self) -> &Arc<PieceRegistry> {
        &self.registry
    }

    /// Looks up a live piece by id.
    pub fn lookup(&self, id: &PieceId) -> Option<&dyn GamePiece> {
        self.pieces.get(id).map(|piece| piece.as_ref())
    }

    /// Mutable lookup, for callers applying local edits.
    pub fn lookup_mut(&mut self, id: &PieceId) -> Option<&mut (dyn GamePiece + 'static)> {
        self.pieces.get_mut(id).map(|piece| piece.as_mut())
    }

    /// Number of live pieces.
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Ids of all live pieces, in no particular order.
    pub fn piece_ids(&self) -> Vec<PieceId> {
        self.pieces.keys().cloned().collect()
    }

    /// Allocates the next process-unique piece id.
    pub fn next_piece_id(&mut self) -> PieceId {
        let id = PieceId::new(format!("p{}", self.next_id));
        self.next_id += 1;
        id
    }

    /// Takes ownership of a locally created piece, assigning it an id
    /// if it has none yet. Returns the id it is now tracked under.
    ///
    /// This is the local-creation path; pieces arriving from peers come
    /// through [`apply`](Self::apply) with an add command instead.
    pub fn add_piece(&mut self, mut piece: Box<dyn GamePiece>) -> PieceId {
        let id = match piece.id() {
            Some(id) => id.clone(),
            None => {
                let id = self.next_piece_id();
                piece.set_id(id.clone());
                id
            }
        };
        self.pieces.insert(id.clone(), piece);
        id
    }

    /// Applies one command to the table.
    ///
    /// Errors are fatal to this command only; the table is unchanged
    /// when an error is returned.
    pub fn apply(&mut self, command: &Command) -> Result<(), StateError> {
        match command {
            Command::Noop => Ok(()),

            Command::Add {
                id,
                piece_type,
                state,
            } => self.apply_add(id.as_ref(), piece_type, state),

            Command::Remove { id } => {
                if self.pieces.remove(id).is_none() {
                    // deferred/out-of-order delivery: the piece may
                    // never have existed here, and that is fine
                    tracing::debug!(%id, "remove for unknown piece, ignoring");
                }
                Ok(())
            }

            Command::Change { id, new_state, .. } => {
                let piece = self
                    .lookup_mut(id)
                    .ok_or_else(|| StateError::UnknownPiece(id.clone()))?;
                piece.set_state(new_state);
                Ok(())
            }

            Command::Move(mv) => {
                let id = mv.id.as_ref().ok_or(StateError::MissingMoveId)?;
                let piece = self
                    .lookup_mut(id)
                    .ok_or_else(|| StateError::UnknownPiece(id.clone()))?;
                piece.set_position(mv.new_position);
                // surface/stack placement belongs to the out-of-scope
                // board management; the groups ride along for it
                tracing::trace!(
                    %id,
                    new_group = mv.new_group.as_deref().unwrap_or("-"),
                    "piece moved"
                );
                Ok(())
            }

            Command::PlayClip { clip } => {
                self.sound.play(clip);
                Ok(())
            }
        }
    }

    fn apply_add(
        &mut self,
        id: Option<&PieceId>,
        piece_type: &str,
        state: &str,
    ) -> Result<(), StateError> {
        let mut piece = self.registry.build_piece(piece_type).ok_or_else(
            || StateError::UnbuildablePiece {
                piece_type: piece_type.to_owned(),
            },
        )?;

        let id = match id {
            Some(id) => id.clone(),
            // sender left assignment to us; local ids stay unique
            None => self.next_piece_id(),
        };
        piece.set_id(id.clone());
        piece.set_state(state);

        if self.pieces.insert(id.clone(), piece).is_some() {
            tracing::warn!(%id, "add replaced an existing piece with the same id");
        }
        Ok(())
    }

    /// Routes a keystroke to a piece and returns the command that
    /// replays whatever it did. The local mutation has already
    /// happened when this returns; encode the command and send it.
    pub fn key_event(
        &mut self,
        id: &PieceId,
        stroke: KeyStroke,
    ) -> Result<Command, StateError> {
        let piece = self
            .lookup_mut(id)
            .ok_or_else(|| StateError::UnknownPiece(id.clone()))?;
        Ok(piece.key_event(stroke))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tessera_piece::{BasicPiece, KeyStroke, Point, Rotate};

    fn state() -> GameState {
        GameState::new(Arc::new(PieceRegistry::with_defaults()))
    }

    fn infantry() -> Box<dyn GamePiece> {
        Box::new(BasicPiece::new("inf.png", "Infantry"))
    }

    #[test]
    fn test_next_piece_id_is_sequential_and_unique() {
        let mut state = state();
        let a = state.next_piece_id();
        let b = state.next_piece_id();
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "p1");
        assert_eq!(b.as_str(), "p2");
    }

    #[test]
    fn test_add_piece_assigns_and_tracks() {
        let mut state = state();
        let id = state.add_piece(infantry());
        assert_eq!(state.piece_count(), 1);
        let piece = state.lookup(&id).unwrap();
        assert_eq!(piece.id(), Some(&id));
        assert_eq!(piece.name(), "Infantry");
    }

    #[test]
    fn test_apply_add_builds_from_type() {
        let mut state = state();
        let cmd = Command::Add {
            id: Some(PieceId::new("p7")),
            piece_type: "piece;inf.png;Infantry".to_owned(),
            state: "board;3;4".to_owned(),
        };
        state.apply(&cmd).unwrap();

        let piece = state.lookup(&PieceId::new("p7")).unwrap();
        assert_eq!(piece.position(), Point::new(3, 4));
        assert_eq!(piece.state(), "board;3;4");
    }

    #[test]
    fn test_apply_add_unbuildable_type_fails_that_command() {
        let mut state = state();
        let cmd = Command::Add {
            id: Some(PieceId::new("p7")),
            piece_type: "hologram;x".to_owned(),
            state: String::new(),
        };
        let err = state.apply(&cmd).unwrap_err();
        assert!(matches!(err, StateError::UnbuildablePiece { .. }));
        assert_eq!(state.piece_count(), 0);
    }

    #[test]
    fn test_apply_remove_unknown_id_is_silent() {
        let mut state = state();
        state
            .apply(&Command::Remove {
                id: PieceId::new("ghost"),
            })
            .unwrap();
    }

    #[test]
    fn test_apply_remove_drops_piece() {
        let mut state = state();
        let id = state.add_piece(infantry());
        state.apply(&Command::Remove { id: id.clone() }).unwrap();
        assert!(state.lookup(&id).is_none());
    }

    #[test]
    fn test_apply_change_unknown_id_fails() {
        let mut state = state();
        let err = state
            .apply(&Command::Change {
                id: PieceId::new("ghost"),
                new_state: "s".to_owned(),
                old_state: None,
            })
            .unwrap_err();
        assert!(matches!(err, StateError::UnknownPiece(_)));
    }

    #[test]
    fn test_key_event_round_trip_between_two_states() {
        // peer A presses a key; peer B applies the resulting command
        // and converges on the same state
        let rotated = || -> Box<dyn GamePiece> {
            Box::new(Rotate::new(
                6,
                KeyStroke::ctrl('R'),
                KeyStroke::ctrl('L'),
                Box::new(BasicPiece::new("inf.png", "Infantry")),
            ))
        };

        let mut peer_a = state();
        let mut peer_b = state();
        let mut piece_b = rotated();
        piece_b.set_id(PieceId::new("p1"));
        let mut piece_a = rotated();
        piece_a.set_id(PieceId::new("p1"));
        peer_a.add_piece(piece_a);
        peer_b.add_piece(piece_b);

        let cmd = peer_a
            .key_event(&PieceId::new("p1"), KeyStroke::ctrl('R'))
            .unwrap();
        assert!(!cmd.is_noop());
        peer_b.apply(&cmd).unwrap();

        let a = peer_a.lookup(&PieceId::new("p1")).unwrap().state();
        let b = peer_b.lookup(&PieceId::new("p1")).unwrap().state();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unhandled_key_event_is_noop() {
        let mut state = state();
        let id = state.add_piece(infantry());
        let cmd = state.key_event(&id, KeyStroke::ctrl('Q')).unwrap();
        assert!(cmd.is_noop());
    }

    #[test]
    fn test_apply_move_relocates() {
        let mut state = state();
        let id = state.add_piece(infantry());
        let cmd = Command::Move(tessera_piece::MovePiece {
            id: Some(id.clone()),
            new_group: Some("board".to_owned()),
            new_position: Point::new(9, 9),
            new_under: None,
            old_group: None,
            old_position: Point::new(0, 0),
            old_under: None,
            player: "alice".to_owned(),
        });
        state.apply(&cmd).unwrap();
        assert_eq!(state.lookup(&id).unwrap().position(), Point::new(9, 9));
    }

    #[test]
    fn test_apply_move_without_id_fails() {
        let mut state = state();
        let cmd = Command::Move(tessera_piece::MovePiece {
            id: None,
            new_group: None,
            new_position: Point::new(1, 1),
            new_under: None,
            old_group: None,
            old_position: Point::new(0, 0),
            old_under: None,
            player: String::new(),
        });
        assert!(matches!(
            state.apply(&cmd).unwrap_err(),
            StateError::MissingMoveId
        ));
    }

    #[test]
    fn test_play_clip_reaches_the_sink() {
        struct Recorder(Mutex<Vec<String>>);
        impl SoundSink for Recorder {
            fn play(&self, clip: &str) {
                self.0.lock().unwrap().push(clip.to_owned());
            }
        }

        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let mut state = GameState::new(Arc::new(PieceRegistry::with_defaults()))
            .with_sound(recorder.clone());
        state
            .apply(&Command::PlayClip {
                clip: "dice".to_owned(),
            })
            .unwrap();
        assert_eq!(*recorder.0.lock().unwrap(), vec!["dice".to_owned()]);
    }

    #[test]
    fn test_undo_of_applied_change_restores_state() {
        let mut state = state();
        let mut piece: Box<dyn GamePiece> = Box::new(Rotate::new(
            6,
            KeyStroke::ctrl('R'),
            KeyStroke::ctrl('L'),
            Box::new(BasicPiece::new("inf.png", "Infantry")),
        ));
        piece.set_id(PieceId::new("p1"));
        let id = state.add_piece(piece);
        let before = state.lookup(&id).unwrap().state();

        let cmd = state.key_event(&id, KeyStroke::ctrl('R')).unwrap();
        let undo = cmd.undo().expect("change with old state undoes");
        state.apply(&undo).unwrap();

        assert_eq!(state.lookup(&id).unwrap().state(), before);
    }
}
