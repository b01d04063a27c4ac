//! Trait-layer plumbing: ownership chain and capability delegation.
//!
//! A trait layer wraps exactly one inner piece and owns it exclusively —
//! dropping the layer drops the whole chain beneath it. The chain is
//! therefore a singly-linked ownership sequence, outermost first, ending
//! in exactly one leaf; no cycles are constructible because ownership is
//! by value.
//!
//! Implementing the full [`GamePiece`] surface for every layer kind
//! would repeat the same inward delegation over and over, so layer kinds
//! implement the narrower [`Layer`] contract instead: their own type
//! segment, their own slice of state, and the hooks they actually want
//! to intercept. The blanket impl below turns any [`Layer`] into a
//! [`GamePiece`], writing the delegation once.

use tessera_codec::{SequenceReader, SequenceWriter};

use crate::{
    Bounds, GamePiece, KeyStroke, PieceId, Point, Shape, CHAIN_DELIM,
};

/// One behavior layer in a piece chain.
///
/// Required: access to the owned inner piece, the layer's own type
/// segment, and the layer's own state slice. Optional hooks default to
/// "don't intercept":
///
/// - [`claim_key`](Self::claim_key) — handle a keystroke instead of
///   passing it inward;
/// - [`claim_property`](Self::claim_property) — answer a property
///   lookup instead of delegating it;
/// - [`position_moved`](Self::position_moved) — observe position
///   changes flowing through the chain.
pub trait Layer: Send {
    /// The piece this layer wraps.
    fn inner(&self) -> &dyn GamePiece;

    /// Mutable access to the wrapped piece.
    fn inner_mut(&mut self) -> &mut dyn GamePiece;

    /// This layer's own type segment (prefix plus fixed configuration),
    /// without the inner piece's type.
    fn own_type(&self) -> String;

    /// This layer's own mutable state slice, without the inner piece's
    /// state.
    fn own_state(&self) -> String;

    /// Restores the slice written by [`own_state`](Self::own_state).
    fn set_own_state(&mut self, state: &str);

    /// Claims a keystroke. Return `true` after mutating this layer's
    /// flags; return `false` (the default) to pass the stroke inward.
    fn claim_key(&mut self, _stroke: KeyStroke) -> bool {
        false
    }

    /// Claims a property lookup. Return `Some` to answer it here;
    /// `None` (the default) delegates to the inner piece.
    fn claim_property(&self, _key: &str) -> Option<String> {
        None
    }

    /// Called after a position change has been applied to the chain.
    fn position_moved(&mut self) {}
}

impl<L: Layer> GamePiece for L {
    fn id(&self) -> Option<&PieceId> {
        self.inner().id()
    }

    fn set_id(&mut self, id: PieceId) {
        self.inner_mut().set_id(id);
    }

    fn piece_type(&self) -> String {
        SequenceWriter::new(CHAIN_DELIM)
            .append(&self.own_type())
            .append(&self.inner().piece_type())
            .finish()
    }

    fn state(&self) -> String {
        SequenceWriter::new(CHAIN_DELIM)
            .append(&self.own_state())
            .append(&self.inner().state())
            .finish()
    }

    fn set_state(&mut self, state: &str) {
        let mut reader = SequenceReader::new(state, CHAIN_DELIM);
        if let Ok(own) = reader.next_field() {
            self.set_own_state(&own);
        }
        if let Ok(inner_state) = reader.next_field() {
            self.inner_mut().set_state(&inner_state);
        }
    }

    fn name(&self) -> String {
        self.inner().name()
    }

    fn position(&self) -> Point {
        self.inner().position()
    }

    fn set_position(&mut self, pos: Point) {
        self.inner_mut().set_position(pos);
        self.position_moved();
    }

    fn bounding_box(&self) -> Bounds {
        self.inner().bounding_box()
    }

    fn shape(&self) -> Shape {
        self.inner().shape()
    }

    fn parent(&self) -> Option<&PieceId> {
        self.inner().parent()
    }

    fn set_parent(&mut self, parent: Option<PieceId>) {
        self.inner_mut().set_parent(parent);
    }

    fn handle_key(&mut self, stroke: KeyStroke) -> bool {
        if self.claim_key(stroke) {
            true
        } else {
            self.inner_mut().handle_key(stroke)
        }
    }

    fn property(&self, key: &str) -> Option<String> {
        self.claim_property(key)
            .or_else(|| self.inner().property(key))
    }
}
