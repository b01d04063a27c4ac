//! Movement-marker layer: flags a piece that has moved this turn.

use tessera_codec::{SequenceReader, SequenceWriter};

use crate::{registry::strip_prefix, GamePiece, KeyStroke, Layer};

/// A trait layer that raises a flag whenever the piece's position
/// changes, and clears it on a bound key command (typically at end of
/// turn).
///
/// Type segment: `moved;<clear key>`. State: `true`/`false`.
pub struct MoveMark {
    clear_key: KeyStroke,
    moved: bool,
    inner: Box<dyn GamePiece>,
}

impl MoveMark {
    /// Registry prefix for this kind.
    pub const PREFIX: &'static str = "moved;";

    /// Creates the layer with the given clear binding.
    pub fn new(clear_key: KeyStroke, inner: Box<dyn GamePiece>) -> Self {
        Self {
            clear_key,
            moved: false,
            inner,
        }
    }

    /// Rebuilds the layer from its type segment.
    pub fn from_type(segment: &str, inner: Box<dyn GamePiece>) -> Self {
        let mut reader =
            SequenceReader::new(strip_prefix(segment, Self::PREFIX), ';');
        let clear_key = reader
            .next_or("ctrl+M")
            .parse()
            .unwrap_or(KeyStroke::ctrl('M'));
        Self::new(clear_key, inner)
    }

    /// Whether the piece has moved since the flag was last cleared.
    pub fn has_moved(&self) -> bool {
        self.moved
    }
}

impl Layer for MoveMark {
    fn inner(&self) -> &dyn GamePiece {
        &*self.inner
    }

    fn inner_mut(&mut self) -> &mut dyn GamePiece {
        &mut *self.inner
    }

    fn own_type(&self) -> String {
        SequenceWriter::new(';')
            .append("moved")
            .append(&self.clear_key.to_string())
            .finish()
    }

    fn own_state(&self) -> String {
        self.moved.to_string()
    }

    fn set_own_state(&mut self, state: &str) {
        self.moved = state == "true";
    }

    fn claim_key(&mut self, stroke: KeyStroke) -> bool {
        if stroke == self.clear_key {
            self.moved = false;
            true
        } else {
            false
        }
    }

    fn claim_property(&self, key: &str) -> Option<String> {
        match key {
            "Moved" => Some(self.moved.to_string()),
            _ => None,
        }
    }

    fn position_moved(&mut self) {
        self.moved = true;
    }
}
