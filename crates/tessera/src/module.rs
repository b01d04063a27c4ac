//! The game module: everything one table needs, wired together.
//!
//! A [`GameModule`] owns the registry, the wire codec, the live token
//! table, and (optionally) the game log. Frontends drive it with local
//! actions and feed it the lines peers send; it hands back the lines
//! to broadcast. What it deliberately does not own: sockets (the relay
//! crate), rendering, and module discovery/launching.

use std::path::PathBuf;
use std::sync::Arc;

use tessera_piece::{
    Command, GamePiece, KeyStroke, Notifier, PieceId, PieceRegistry,
};
use tessera_proto::{CommandCodec, PlayerIdSource};
use tessera_state::{GameState, SoundSink};

use crate::{EngineError, GameLog, GuestIdentity};

/// Builder for a [`GameModule`].
///
/// Registration happens here, before the registry freezes: once
/// [`build`](Self::build) runs, the constructor tables are read-only
/// for the life of the module.
pub struct GameModuleBuilder {
    name: String,
    registry: PieceRegistry,
    identity: Arc<dyn PlayerIdSource>,
    notifier: Option<Arc<dyn Notifier>>,
    sound: Option<Arc<dyn SoundSink>>,
    log_path: Option<PathBuf>,
}

impl GameModuleBuilder {
    /// Starts a builder with the built-in piece kinds and a random
    /// guest identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registry: PieceRegistry::with_defaults(),
            identity: Arc::new(GuestIdentity::new()),
            notifier: None,
            sound: None,
            log_path: None,
        }
    }

    /// Registers a module-specific leaf kind.
    pub fn register_leaf(
        mut self,
        prefix: &str,
        ctor: impl Fn(&str) -> Box<dyn GamePiece> + Send + Sync + 'static,
    ) -> Self {
        self.registry.register_leaf(prefix, ctor);
        self
    }

    /// Registers a module-specific trait-layer kind.
    pub fn register_layer(
        mut self,
        prefix: &str,
        ctor: impl Fn(&str, Box<dyn GamePiece>) -> Box<dyn GamePiece>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.registry.register_layer(prefix, ctor);
        self
    }

    /// Sets the local player identity (defaults to a guest id).
    pub fn identity(mut self, identity: Arc<dyn PlayerIdSource>) -> Self {
        self.identity = identity;
        self
    }

    /// Sets the user-visible warning channel.
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Sets the audio sink for play-clip commands.
    pub fn sound(mut self, sound: Arc<dyn SoundSink>) -> Self {
        self.sound = Some(sound);
        self
    }

    /// Records every emitted and received command line to a log file.
    pub fn log_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Freezes the registry and assembles the module.
    pub fn build(self) -> Result<GameModule, EngineError> {
        let mut registry = self.registry;
        if let Some(notifier) = self.notifier {
            registry.set_notifier(notifier);
        }
        let registry = Arc::new(registry);

        let codec =
            CommandCodec::new(registry.clone()).with_identity(self.identity);
        let mut state = GameState::new(registry.clone());
        if let Some(sound) = self.sound {
            state = state.with_sound(sound);
        }
        let log = self.log_path.map(GameLog::create).transpose()?;

        tracing::info!(module = %self.name, "game module assembled");
        Ok(GameModule {
            name: self.name,
            registry,
            codec,
            state,
            log,
        })
    }
}

/// One synchronized table: registry + codec + live state + log.
pub struct GameModule {
    name: String,
    registry: Arc<PieceRegistry>,
    codec: CommandCodec,
    state: GameState,
    log: Option<GameLog>,
}

impl GameModule {
    /// Starts a [`GameModuleBuilder`].
    pub fn builder(name: impl Into<String>) -> GameModuleBuilder {
        GameModuleBuilder::new(name)
    }

    /// The module's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The frozen constructor registry.
    pub fn registry(&self) -> &Arc<PieceRegistry> {
        &self.registry
    }

    /// The wire codec (shares this module's registry and identity).
    pub fn codec(&self) -> &CommandCodec {
        &self.codec
    }

    /// The live token table.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access to the live token table, for local editing.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Builds a piece from a type string and adds it to the table with
    /// a fresh id.
    pub fn create_piece(
        &mut self,
        piece_type: &str,
    ) -> Result<PieceId, EngineError> {
        let piece = self.registry.build_piece(piece_type).ok_or_else(|| {
            EngineError::UnbuildablePiece {
                piece_type: piece_type.to_owned(),
            }
        })?;
        Ok(self.state.add_piece(piece))
    }

    /// The add command that reproduces a live piece on a peer —
    /// what a host sends for each piece when someone joins late.
    pub fn add_command_for(
        &self,
        id: &PieceId,
    ) -> Result<Command, EngineError> {
        let piece = self
            .state
            .lookup(id)
            .ok_or_else(|| tessera_state::StateError::UnknownPiece(id.clone()))?;
        Ok(Command::Add {
            id: Some(id.clone()),
            piece_type: piece.piece_type(),
            state: piece.state(),
        })
    }

    /// Encodes a command, recording the line in the game log.
    pub fn emit(&mut self, command: &Command) -> Result<String, EngineError> {
        let line = self.codec.encode(command);
        if let Some(log) = &mut self.log {
            log.record(&line)?;
        }
        Ok(line)
    }

    /// Routes a keystroke to a live piece, applies the effect locally,
    /// and returns the encoded line to broadcast (empty for an
    /// unhandled stroke — still a valid, if pointless, thing to send).
    pub fn press_key(
        &mut self,
        id: &PieceId,
        stroke: KeyStroke,
    ) -> Result<String, EngineError> {
        let command = self.state.key_event(id, stroke)?;
        self.emit(&command)
    }

    /// Decodes one received line, applies it, and records it.
    ///
    /// Errors are per-command: report and continue with the next line.
    pub fn receive_line(
        &mut self,
        line: &str,
    ) -> Result<Command, EngineError> {
        let command = self.codec.decode(line)?;
        self.state.apply(&command)?;
        if let Some(log) = &mut self.log {
            log.record(line)?;
        }
        Ok(command)
    }

    /// Replays a recorded transcript into this module's state.
    ///
    /// Returns how many commands applied. Undecodable lines and
    /// commands that fail to apply are logged and skipped, never
    /// fatal — the point of a replayable log is surviving its own
    /// scars.
    pub fn replay_log(
        &mut self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<usize, EngineError> {
        let replay = GameLog::replay(path, &self.codec)?;
        let mut applied = 0;
        for command in &replay.commands {
            match self.state.apply(command) {
                Ok(()) => applied += 1,
                Err(error) => {
                    tracing::warn!(%error, "skipping unapplicable replayed command");
                }
            }
        }
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_piece::Point;

    fn module(name: &str) -> GameModule {
        GameModule::builder(name).build().unwrap()
    }

    #[test]
    fn test_create_piece_and_lookup() {
        let mut module = module("demo");
        let id = module.create_piece("piece;inf.png;Infantry").unwrap();
        assert_eq!(module.state().lookup(&id).unwrap().name(), "Infantry");
    }

    #[test]
    fn test_create_piece_unknown_type_fails() {
        let mut module = module("demo");
        let err = module.create_piece("hologram;x").unwrap_err();
        assert!(matches!(err, EngineError::UnbuildablePiece { .. }));
    }

    #[test]
    fn test_two_modules_converge_over_lines() {
        let mut host = module("demo");
        let mut guest = module("demo");

        // host creates a rotated piece and ships it over
        let id = host
            .create_piece("rotate;6;ctrl+R;ctrl+L\tpiece;inf.png;Infantry")
            .unwrap();
        let add = host.add_command_for(&id).unwrap();
        let line = host.emit(&add).unwrap();
        guest.receive_line(&line).unwrap();

        // host rotates; guest applies the resulting line
        let line = host.press_key(&id, KeyStroke::ctrl('R')).unwrap();
        guest.receive_line(&line).unwrap();

        let host_state = host.state().lookup(&id).unwrap().state();
        let guest_state = guest.state().lookup(&id).unwrap().state();
        assert_eq!(host_state, guest_state);
        assert_eq!(
            guest.state().lookup(&id).unwrap().property("Facing"),
            Some("1".to_owned())
        );
    }

    #[test]
    fn test_unhandled_key_emits_empty_line() {
        let mut module = module("demo");
        let id = module.create_piece("piece;inf.png;Infantry").unwrap();
        let line = module.press_key(&id, KeyStroke::ctrl('Z')).unwrap();
        assert_eq!(line, "");
    }

    #[test]
    fn test_custom_layer_registration_round_trips() {
        let mut host = GameModule::builder("demo")
            .register_layer("banner;", |ty, inner| {
                Box::new(tessera_piece::Marker::from_type(ty, inner))
            })
            .build()
            .unwrap();

        let id = host
            .create_piece("banner;\tpiece;flag.png;Standard")
            .unwrap();
        let add = host.add_command_for(&id).unwrap();
        let line = host.emit(&add).unwrap();

        // a module without the registration still copes: the layer
        // degrades to a pass-through and the type string survives
        let mut plain = module("demo");
        plain.receive_line(&line).unwrap();
        assert_eq!(
            plain.state().lookup(&id).unwrap().piece_type(),
            "banner;\tpiece;flag.png;Standard"
        );
    }

    #[test]
    fn test_log_records_and_replays_a_session() {
        let path = std::env::temp_dir().join(format!(
            "tessera-module-{}-session.vlog",
            std::process::id()
        ));

        let mut host = GameModule::builder("demo")
            .log_to(&path)
            .build()
            .unwrap();
        let id = host.create_piece("piece;inf.png;Infantry").unwrap();
        let add = host.add_command_for(&id).unwrap();
        host.emit(&add).unwrap();
        host.state_mut()
            .lookup_mut(&id)
            .unwrap()
            .set_position(Point::new(5, 5));
        let change = Command::Change {
            id: id.clone(),
            new_state: host.state().lookup(&id).unwrap().state(),
            old_state: None,
        };
        host.emit(&change).unwrap();
        drop(host);

        let mut revived = module("demo");
        let applied = revived.replay_log(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(applied, 2);
        let piece = revived.state().lookup(&id).unwrap();
        assert_eq!(piece.position(), Point::new(5, 5));
    }
}
