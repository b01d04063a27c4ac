//! Rotate layer: discrete facings stepped by key commands.

use tessera_codec::{SequenceReader, SequenceWriter};

use crate::{
    registry::strip_prefix, GamePiece, KeyStroke, Layer,
};

/// A trait layer giving a piece `facings` discrete orientations.
///
/// Type segment: `rotate;<facings>;<cw key>;<ccw key>`. State: the
/// current facing index, `0..facings`.
pub struct Rotate {
    facings: u32,
    cw: KeyStroke,
    ccw: KeyStroke,
    facing: u32,
    inner: Box<dyn GamePiece>,
}

impl Rotate {
    /// Registry prefix for this kind.
    pub const PREFIX: &'static str = "rotate;";

    /// Creates a rotation layer with the given facing count and key
    /// bindings.
    pub fn new(
        facings: u32,
        cw: KeyStroke,
        ccw: KeyStroke,
        inner: Box<dyn GamePiece>,
    ) -> Self {
        Self {
            facings: facings.max(1),
            cw,
            ccw,
            facing: 0,
            inner,
        }
    }

    /// Rebuilds the layer from its type segment. Unreadable fields
    /// fall back to a six-facing `ctrl+R`/`ctrl+L` binding, logged.
    pub fn from_type(segment: &str, inner: Box<dyn GamePiece>) -> Self {
        let mut reader =
            SequenceReader::new(strip_prefix(segment, Self::PREFIX), ';');
        let facings = match reader.next_int() {
            Ok(n) if n > 0 => n as u32,
            _ => {
                tracing::debug!(segment, "unreadable facing count, defaulting to 6");
                6
            }
        };
        let cw = reader
            .next_or("ctrl+R")
            .parse()
            .unwrap_or(KeyStroke::ctrl('R'));
        let ccw = reader
            .next_or("ctrl+L")
            .parse()
            .unwrap_or(KeyStroke::ctrl('L'));
        Self::new(facings, cw, ccw, inner)
    }

    /// The current facing index.
    pub fn facing(&self) -> u32 {
        self.facing
    }
}

impl Layer for Rotate {
    fn inner(&self) -> &dyn GamePiece {
        &*self.inner
    }

    fn inner_mut(&mut self) -> &mut dyn GamePiece {
        &mut *self.inner
    }

    fn own_type(&self) -> String {
        SequenceWriter::new(';')
            .append("rotate")
            .append_int(self.facings as i32)
            .append(&self.cw.to_string())
            .append(&self.ccw.to_string())
            .finish()
    }

    fn own_state(&self) -> String {
        self.facing.to_string()
    }

    fn set_own_state(&mut self, state: &str) {
        match state.parse::<u32>() {
            Ok(facing) => self.facing = facing % self.facings,
            Err(_) => {
                tracing::warn!(state, "unreadable facing in state, keeping current");
            }
        }
    }

    fn claim_key(&mut self, stroke: KeyStroke) -> bool {
        if stroke == self.cw {
            self.facing = (self.facing + 1) % self.facings;
            true
        } else if stroke == self.ccw {
            self.facing = (self.facing + self.facings - 1) % self.facings;
            true
        } else {
            false
        }
    }

    fn claim_property(&self, key: &str) -> Option<String> {
        match key {
            "Facing" => Some(self.facing.to_string()),
            _ => None,
        }
    }
}
