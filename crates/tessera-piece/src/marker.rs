//! Marker layer: static named properties, and the neutral substitute.
//!
//! A marker contributes no behavior and no mutable state — it only
//! answers property lookups from its fixed `key=value` configuration.
//! That makes it the natural stand-in when a type string names a trait
//! kind this process has no constructor for: wrapped in a marker, the
//! inner piece keeps working, and the unknown segment rides along
//! untouched so the chain still re-encodes its original type.

use tessera_codec::{split, SequenceWriter};

use crate::{GamePiece, Layer};

/// A property-bag trait layer.
///
/// Type segment: `mark;<k>=<v>;<k>=<v>;...`. No state.
pub struct Marker {
    /// The full own-type segment, kept verbatim. For markers built
    /// from a registered `mark;` type this equals the re-encoded
    /// pairs; for pass-through substitutes it is the foreign segment.
    segment: String,
    pairs: Vec<(String, String)>,
    inner: Box<dyn GamePiece>,
}

impl Marker {
    /// Registry prefix for this kind.
    pub const PREFIX: &'static str = "mark;";

    /// Creates a marker with the given property pairs.
    pub fn new(
        pairs: Vec<(String, String)>,
        inner: Box<dyn GamePiece>,
    ) -> Self {
        let mut writer = SequenceWriter::new(';').append("mark");
        for (key, value) in &pairs {
            writer = writer.append(&format!("{key}={value}"));
        }
        Self {
            segment: writer.finish(),
            pairs,
            inner,
        }
    }

    /// Rebuilds a marker from its type segment.
    pub fn from_type(segment: &str, inner: Box<dyn GamePiece>) -> Self {
        let pairs = match segment.strip_prefix(Self::PREFIX) {
            Some(rest) if !rest.is_empty() => split(rest, ';')
                .into_iter()
                .map(|field| match field.split_once('=') {
                    Some((k, v)) => (k.to_owned(), v.to_owned()),
                    None => (field, String::new()),
                })
                .collect(),
            _ => Vec::new(),
        };
        Self {
            segment: segment.to_owned(),
            pairs,
            inner,
        }
    }

    /// Wraps `inner` in a do-nothing layer that carries a segment this
    /// process cannot interpret. Used by the piece builder when no
    /// constructor is registered for a trait prefix.
    pub fn passthrough(segment: &str, inner: Box<dyn GamePiece>) -> Self {
        Self {
            segment: segment.to_owned(),
            pairs: Vec::new(),
            inner,
        }
    }

    /// The configured property pairs.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl Layer for Marker {
    fn inner(&self) -> &dyn GamePiece {
        &*self.inner
    }

    fn inner_mut(&mut self) -> &mut dyn GamePiece {
        &mut *self.inner
    }

    fn own_type(&self) -> String {
        self.segment.clone()
    }

    fn own_state(&self) -> String {
        String::new()
    }

    fn set_own_state(&mut self, _state: &str) {}

    fn claim_property(&self, key: &str) -> Option<String> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}
