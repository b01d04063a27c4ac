//! Error types for the sequence codec.

/// Errors that can occur while reading a field sequence.
///
/// Writing never fails — any string can be escaped. Reading fails when
/// the input has fewer fields than the caller expects, or when a field
/// that must be numeric is not.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The caller asked for another field but the sequence is exhausted.
    #[error("expected another field in the sequence")]
    MissingField,

    /// A field that must be a base-10 integer did not parse as one.
    #[error("field {field:?} is not a base-10 integer")]
    BadInt {
        /// The offending field text.
        field: String,
        #[source]
        source: std::num::ParseIntError,
    },
}
