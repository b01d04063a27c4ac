//! Live game state for Tessera: the token table and command application.
//!
//! One [`GameState`] per running game holds every live piece keyed by
//! id. Commands flow through it in both directions:
//!
//! - outbound, a local action ([`GameState::key_event`]) mutates a
//!   piece and yields the command that replays the mutation elsewhere;
//! - inbound, a decoded command is handed to [`GameState::apply`],
//!   which performs the same mutation here.
//!
//! Application is single-threaded by design: exactly one thread applies
//! commands at a time, which is the discipline the rest of the engine
//! (and the log replayer) already follows. The table itself never
//! decodes anything — wire concerns stay in `tessera-proto`.

mod error;
mod sound;
mod table;

pub use error::StateError;
pub use sound::{NullSound, SoundSink};
pub use table::GameState;
