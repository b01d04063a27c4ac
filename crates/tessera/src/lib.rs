//! # Tessera
//!
//! A networked tabletop-game engine core. Every player runs the same
//! game module; Tessera keeps their copies synchronized by exchanging
//! compact one-line descriptions of state changes.
//!
//! The moving parts, bottom up:
//!
//! - `tessera-codec` — reversible field sequences, the atoms of every
//!   wire string;
//! - `tessera-piece` — pieces composed from trait layers, rebuilt from
//!   type strings through a constructor registry;
//! - `tessera-proto` — the symmetric command line codec;
//! - `tessera-state` — the live token table that commands mutate;
//! - `tessera-relay` — async peer links carrying command lines.
//!
//! This crate wires them into a [`GameModule`]: one object a frontend
//! drives to create pieces, route key commands, and feed the lines a
//! peer sent.
//!
//! ## Quick start
//!
//! ```
//! use tessera::prelude::*;
//!
//! let mut module = GameModule::builder("demo").build().unwrap();
//! let id = module.create_piece("piece;inf.png;Infantry").unwrap();
//!
//! // a local action produces the line to send to peers
//! let line = module.press_key(&id, KeyStroke::ctrl('M')).unwrap();
//!
//! // a peer feeds received lines back in
//! let mut peer = GameModule::builder("demo").build().unwrap();
//! let add = module.add_command_for(&id).unwrap();
//! peer.receive_line(&module.emit(&add).unwrap()).unwrap();
//! peer.receive_line(&line).unwrap();
//! ```

mod config;
mod error;
mod identity;
mod logbook;
mod module;

pub use config::EngineConfig;
pub use error::EngineError;
pub use identity::GuestIdentity;
pub use logbook::{GameLog, Replay};
pub use module::{GameModule, GameModuleBuilder};

// The underlying layers, for applications that need more than the
// facade — custom trait layers use `codec` for their own segments.
pub use tessera_codec as codec;
pub use tessera_piece as piece;
pub use tessera_proto as proto;
pub use tessera_relay as relay;
pub use tessera_state as state;

/// Initializes tracing with the `RUST_LOG` env filter, defaulting to
/// `info`. Call once from a binary; safe to call twice (the second
/// call is ignored).
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

/// One-stop imports for applications embedding the engine.
pub mod prelude {
    pub use crate::{
        init_tracing, EngineConfig, EngineError, GameLog, GameModule,
        GameModuleBuilder, GuestIdentity, Replay,
    };
    pub use tessera_codec::{SequenceReader, SequenceWriter};
    pub use tessera_piece::{
        BasicPiece, Bounds, Command, GamePiece, KeyStroke, Layer, Marker,
        MoveMark, MovePiece, Notifier, PieceId, PieceRegistry, Point, Rotate,
        Shape, StackPiece,
    };
    pub use tessera_proto::{
        CommandCodec, FixedIdentity, PlayerIdSource, ProtoError,
    };
    pub use tessera_relay::{
        run_dispatcher, Link, Outbound, PeerId, TcpLink, TcpRelay,
    };
    pub use tessera_state::{GameState, NullSound, SoundSink, StateError};
}
