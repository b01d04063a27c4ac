//! Factory registry and piece builder.
//!
//! Type strings are how pieces travel: a serialized chain is rebuilt by
//! looking up each segment's *prefix token* in a registry of
//! constructors. The registry is the sole extension point for new leaf
//! and trait kinds — game modules register constructors at startup and
//! the wire codec never learns about concrete types.
//!
//! # Lifecycle
//!
//! Populate the registry completely before the first build. After that
//! it is a read-only table: building borrows it immutably, so it can be
//! shared behind an `Arc` and consulted from any thread.
//!
//! # Degradation
//!
//! Rebuilding must survive type strings written by modules this process
//! has never seen. One corrupt token must not block a whole game-state
//! load, so the caller gets a usable piece or an explicit `None`, never
//! a panic:
//!
//! - an unknown *trait* prefix becomes a pass-through [`Marker`]
//!   carrying the foreign segment verbatim, with a warning;
//! - an unknown *leaf* prefix is the one unrecoverable case — there is
//!   no meaningful default leaf — and fails the whole chain with a
//!   user-visible warning through the [`Notifier`] plus a log entry
//!   naming the prefix. Callers loading many pieces skip the failed one
//!   and keep going.

use std::collections::HashMap;
use std::sync::Arc;

use tessera_codec::SequenceReader;

use crate::{
    BasicPiece, GamePiece, Marker, MoveMark, Rotate, StackPiece,
    CHAIN_DELIM,
};

/// Returns the dispatch key of a type segment: the substring up to and
/// including the first `;`, or the entire segment when it carries no
/// `;`.
///
/// This exact rule is frozen: registered prefixes like `piece;` keep
/// variable-length configuration behind the delimiter, while bare kinds
/// like `stack` dispatch on the whole token. Any divergence breaks
/// decoding of existing type strings.
pub fn prefix_of(segment: &str) -> &str {
    match segment.find(';') {
        Some(i) => &segment[..=i],
        None => segment,
    }
}

/// Strips a known kind prefix from a segment, leaving its
/// configuration fields. Returns the segment unchanged when the prefix
/// does not match (tolerant parsing for substitutes).
pub(crate) fn strip_prefix<'a>(segment: &'a str, prefix: &str) -> &'a str {
    segment.strip_prefix(prefix).unwrap_or(segment)
}

/// Channel for warnings that must reach the player, not just the log.
///
/// The chat/notification panel lives outside this crate; it plugs in
/// here. The default [`SilentNotifier`] drops messages — the structured
/// log entries are emitted regardless.
pub trait Notifier: Send + Sync {
    /// Surfaces a warning to the local player.
    fn notify(&self, message: &str);
}

/// A [`Notifier`] that discards all messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _message: &str) {}
}

type LeafCtor = Box<dyn Fn(&str) -> Box<dyn GamePiece> + Send + Sync>;
type LayerCtor =
    Box<dyn Fn(&str, Box<dyn GamePiece>) -> Box<dyn GamePiece> + Send + Sync>;

/// Prefix-token → constructor tables for leaves and trait layers.
pub struct PieceRegistry {
    leaves: HashMap<String, LeafCtor>,
    layers: HashMap<String, LayerCtor>,
    notifier: Arc<dyn Notifier>,
}

impl PieceRegistry {
    /// An empty registry. Useful in tests; real modules start from
    /// [`with_defaults`](Self::with_defaults).
    pub fn new() -> Self {
        Self {
            leaves: HashMap::new(),
            layers: HashMap::new(),
            notifier: Arc::new(SilentNotifier),
        }
    }

    /// A registry pre-populated with the built-in kinds: `piece;` and
    /// `stack` leaves; `mark;`, `rotate;` and `moved;` layers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_leaf(BasicPiece::PREFIX, |ty| {
            Box::new(BasicPiece::from_type(ty))
        });
        registry
            .register_leaf(StackPiece::PREFIX, |_| Box::new(StackPiece::new()));
        registry.register_layer(Marker::PREFIX, |ty, inner| {
            Box::new(Marker::from_type(ty, inner))
        });
        registry.register_layer(Rotate::PREFIX, |ty, inner| {
            Box::new(Rotate::from_type(ty, inner))
        });
        registry.register_layer(MoveMark::PREFIX, |ty, inner| {
            Box::new(MoveMark::from_type(ty, inner))
        });
        registry
    }

    /// Registers a leaf constructor under a prefix token.
    ///
    /// The constructor receives the full type segment and must return a
    /// piece whose `piece_type()` reproduces it.
    pub fn register_leaf(
        &mut self,
        prefix: &str,
        ctor: impl Fn(&str) -> Box<dyn GamePiece> + Send + Sync + 'static,
    ) {
        self.leaves.insert(prefix.to_owned(), Box::new(ctor));
    }

    /// Registers a trait-layer constructor under a prefix token.
    ///
    /// The constructor receives the full outer segment and the already
    /// built inner piece, which it takes ownership of.
    pub fn register_layer(
        &mut self,
        prefix: &str,
        ctor: impl Fn(&str, Box<dyn GamePiece>) -> Box<dyn GamePiece>
            + Send
            + Sync
            + 'static,
    ) {
        self.layers.insert(prefix.to_owned(), Box::new(ctor));
    }

    /// Replaces the warning channel. Call during startup, alongside
    /// registration.
    pub fn set_notifier(&mut self, notifier: Arc<dyn Notifier>) {
        self.notifier = notifier;
    }

    /// Rebuilds a full piece chain from a type string, inside-out.
    ///
    /// Returns `None` only when the chain's *leaf* prefix has no
    /// registered constructor; an unknown trait prefix degrades to a
    /// pass-through layer instead (see the module docs), so that one
    /// unprovided trait never takes down a game-state load.
    pub fn build_piece(&self, piece_type: &str) -> Option<Box<dyn GamePiece>> {
        let mut reader = SequenceReader::new(piece_type, CHAIN_DELIM);
        let outer = reader.next_field().ok()?;
        let inner_type = if reader.has_more() {
            reader.next_field().ok()
        } else {
            None
        };

        match inner_type {
            Some(inner_type) => match self.build_piece(&inner_type) {
                Some(inner) => Some(self.build_layer(&outer, inner)),
                None => {
                    // the leaf-level warning already fired; add the
                    // failing chain for context and propagate
                    tracing::debug!(
                        piece_type = %inner_type,
                        outer_segment = %outer,
                        "discarding trait layer whose inner piece failed to build"
                    );
                    None
                }
            },
            None => self.build_leaf(&outer),
        }
    }

    /// Builds one trait layer around an already built inner piece.
    fn build_layer(
        &self,
        segment: &str,
        inner: Box<dyn GamePiece>,
    ) -> Box<dyn GamePiece> {
        match self.layers.get(prefix_of(segment)) {
            Some(ctor) => ctor(segment, inner),
            None => {
                tracing::warn!(
                    segment,
                    "unknown trait prefix, substituting a pass-through layer"
                );
                self.notifier.notify(
                    "This game uses a piece trait this module does not \
                     provide; the piece will work without it.",
                );
                Box::new(Marker::passthrough(segment, inner))
            }
        }
    }

    /// Builds a leaf. `None` when the prefix is unregistered — the one
    /// failure that propagates, because no default leaf is meaningful.
    fn build_leaf(&self, segment: &str) -> Option<Box<dyn GamePiece>> {
        match self.leaves.get(prefix_of(segment)) {
            Some(ctor) => Some(ctor(segment)),
            None => {
                tracing::warn!(
                    prefix = prefix_of(segment),
                    "no leaf constructor registered for piece type"
                );
                self.notifier.notify(
                    "A piece in this game could not be rebuilt and was \
                     discarded. See the log for details.",
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_of_stops_after_first_semicolon() {
        assert_eq!(prefix_of("piece;img;name"), "piece;");
        assert_eq!(prefix_of("rotate;6;ctrl+R;ctrl+L"), "rotate;");
    }

    #[test]
    fn test_prefix_of_whole_string_without_semicolon() {
        assert_eq!(prefix_of("stack"), "stack");
        assert_eq!(prefix_of(""), "");
    }

    #[test]
    fn test_empty_registry_builds_nothing() {
        let registry = PieceRegistry::new();
        assert!(registry.build_piece("piece;img;name").is_none());
    }

    #[test]
    fn test_custom_leaf_registration() {
        let mut registry = PieceRegistry::new();
        registry.register_leaf("card;", |ty| {
            Box::new(BasicPiece::from_type(ty))
        });
        assert!(registry.build_piece("card;back.png;Ace").is_some());
        assert!(registry.build_piece("piece;img;name").is_none());
    }
}
