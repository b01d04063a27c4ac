//! Join/split of field lists over a configurable separator.
//!
//! The escape character is `\`. Inside a field, both the separator and
//! the escape character itself are preceded by `\`, so the split side
//! can always tell a separator *between* fields from a separator *inside*
//! one. This gives the round-trip law the rest of the engine leans on:
//! `split(join(fields, sep), sep) == fields` for every field list.
//!
//! Peers that recorded a game log years ago must still be able to read
//! it, so the escape scheme is frozen: do not change it.

use crate::CodecError;

/// The escape character used inside fields.
const ESCAPE: char = '\\';

/// The literal token standing in for an absent/optional field.
///
/// Callers wrap fields that may be logically absent with [`wrap_null`]
/// before joining and [`unwrap_null`] after splitting. A legitimate
/// field whose value happens to be the literal text `null` therefore
/// reads back as absent. That collision is a known, frozen wart of the
/// wire format: existing logs depend on it, so it stays.
pub const NULL_TOKEN: &str = "null";

/// Wraps an optional field into its wire form.
///
/// `None` becomes the literal [`NULL_TOKEN`]; `Some(s)` passes through.
pub fn wrap_null(field: Option<&str>) -> &str {
    field.unwrap_or(NULL_TOKEN)
}

/// Unwraps the wire form of an optional field.
///
/// The literal [`NULL_TOKEN`] becomes `None`; anything else passes
/// through. See [`NULL_TOKEN`] for the sentinel-collision caveat.
pub fn unwrap_null(field: &str) -> Option<&str> {
    if field == NULL_TOKEN {
        None
    } else {
        Some(field)
    }
}

/// Joins a list of fields into one string over `sep`.
///
/// Occurrences of `sep` and of the escape character inside a field are
/// escaped, so [`split`] recovers the original list exactly.
pub fn join(fields: &[&str], sep: char) -> String {
    let mut writer = SequenceWriter::new(sep);
    for field in fields {
        writer = writer.append(field);
    }
    writer.finish()
}

/// Splits a string produced by [`join`] back into its fields.
///
/// The inverse of [`join`]: every unescaped `sep` ends a field, and
/// escape sequences collapse back to their literal character.
///
/// An empty input yields a single empty field — the codec cannot
/// distinguish `join(&[])` from `join(&[""])`, and callers never ask it
/// to (command bodies always carry at least one field).
pub fn split(s: &str, sep: char) -> Vec<String> {
    let mut reader = SequenceReader::new(s, sep);
    let mut fields = Vec::new();
    while reader.has_more() {
        // next_field cannot fail while has_more is true
        fields.push(reader.next_field().unwrap_or_default());
    }
    fields
}

// ---------------------------------------------------------------------------
// SequenceWriter
// ---------------------------------------------------------------------------

/// Streaming writer for a field sequence.
///
/// Chainable append calls, then [`finish`](Self::finish) to take the
/// joined string:
///
/// ```
/// use tessera_codec::SequenceWriter;
///
/// let line = SequenceWriter::new('/')
///     .append("p42")
///     .append("a/b")      // embedded separator is escaped
///     .append_int(-3)
///     .finish();
/// assert_eq!(line, r"p42/a\/b/-3");
/// ```
#[derive(Debug, Clone)]
pub struct SequenceWriter {
    sep: char,
    buf: String,
    started: bool,
}

impl SequenceWriter {
    /// Creates a writer joining fields over `sep`.
    pub fn new(sep: char) -> Self {
        Self {
            sep,
            buf: String::new(),
            started: false,
        }
    }

    /// Appends one field, escaping as needed.
    pub fn append(mut self, field: &str) -> Self {
        if self.started {
            self.buf.push(self.sep);
        }
        self.started = true;
        for c in field.chars() {
            if c == self.sep || c == ESCAPE {
                self.buf.push(ESCAPE);
            }
            self.buf.push(c);
        }
        self
    }

    /// Appends an optional field in wrap-null form.
    ///
    /// `None` is written as the literal [`NULL_TOKEN`].
    pub fn append_opt(self, field: Option<&str>) -> Self {
        let wire = wrap_null(field).to_owned();
        self.append(&wire)
    }

    /// Appends an integer field in base-10 form.
    pub fn append_int(self, value: i32) -> Self {
        self.append(&value.to_string())
    }

    /// Consumes the writer and returns the joined string.
    pub fn finish(self) -> String {
        self.buf
    }
}

// ---------------------------------------------------------------------------
// SequenceReader
// ---------------------------------------------------------------------------

/// Streaming reader over a field sequence.
///
/// Mirrors [`SequenceWriter`]: call [`next_field`](Self::next_field)
/// once per field, in order. [`next_or`](Self::next_or) reads a trailing
/// optional field, substituting a default when the sequence has already
/// ended — the command codec uses this for fields that older peers did
/// not write.
#[derive(Debug)]
pub struct SequenceReader<'a> {
    sep: char,
    /// The unread tail. `None` once the sequence is exhausted; note that
    /// `Some("")` is a real (empty) pending field, not exhaustion.
    rest: Option<&'a str>,
}

impl<'a> SequenceReader<'a> {
    /// Creates a reader over `s` with separator `sep`.
    pub fn new(s: &'a str, sep: char) -> Self {
        Self { sep, rest: Some(s) }
    }

    /// Returns `true` while at least one field remains.
    pub fn has_more(&self) -> bool {
        self.rest.is_some()
    }

    /// Reads the next field, collapsing escape sequences.
    ///
    /// # Errors
    /// Returns [`CodecError::MissingField`] once the sequence is
    /// exhausted.
    pub fn next_field(&mut self) -> Result<String, CodecError> {
        let rest = self.rest.ok_or(CodecError::MissingField)?;

        let mut field = String::new();
        let mut chars = rest.char_indices();
        while let Some((i, c)) = chars.next() {
            if c == ESCAPE {
                match chars.next() {
                    Some((_, escaped)) => field.push(escaped),
                    // dangling escape at end of input: keep it literal
                    None => field.push(ESCAPE),
                }
            } else if c == self.sep {
                self.rest = Some(&rest[i + c.len_utf8()..]);
                return Ok(field);
            } else {
                field.push(c);
            }
        }

        self.rest = None;
        Ok(field)
    }

    /// Reads the next field, or returns `default` if the sequence has
    /// ended.
    pub fn next_or(&mut self, default: &str) -> String {
        self.next_field().unwrap_or_else(|_| default.to_owned())
    }

    /// Reads the next field as a base-10 integer.
    ///
    /// # Errors
    /// [`CodecError::MissingField`] if exhausted, [`CodecError::BadInt`]
    /// if the field is present but not an integer.
    pub fn next_int(&mut self) -> Result<i32, CodecError> {
        let field = self.next_field()?;
        field
            .parse()
            .map_err(|source| CodecError::BadInt { field, source })
    }
}
