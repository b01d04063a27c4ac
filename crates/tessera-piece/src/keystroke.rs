//! Key/command triggers in a transmissible textual form.
//!
//! Trait layers bind their behaviors to keystrokes, and those bindings
//! live inside type strings (`"rotate;6;ctrl+R;ctrl+L"`), so a keystroke
//! needs a stable parse/print form. The UI layer (out of scope here)
//! translates real input events into [`KeyStroke`] values; everything in
//! this crate only compares and (de)serializes them.

use std::fmt;
use std::str::FromStr;

/// A key press with modifier flags.
///
/// Printed and parsed as `"ctrl+shift+alt+X"` with modifiers in that
/// fixed order and at most one key character at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyStroke {
    pub key: char,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyStroke {
    /// A bare key press with no modifiers.
    pub const fn plain(key: char) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
            alt: false,
        }
    }

    /// A `ctrl+key` press, the conventional binding for piece commands.
    pub const fn ctrl(key: char) -> Self {
        Self {
            key,
            ctrl: true,
            shift: false,
            alt: false,
        }
    }

    /// Adds the shift modifier.
    pub const fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Adds the alt modifier.
    pub const fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

impl fmt::Display for KeyStroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "ctrl+")?;
        }
        if self.shift {
            write!(f, "shift+")?;
        }
        if self.alt {
            write!(f, "alt+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// Failure to parse the textual form of a [`KeyStroke`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseKeyStrokeError {
    /// The string was empty or ended on a `+`.
    #[error("keystroke is missing its key character")]
    MissingKey,
    /// The final segment was not a single character.
    #[error("{0:?} is not a single key character")]
    BadKey(String),
    /// A segment before the key was not a known modifier.
    #[error("{0:?} is not a recognized modifier")]
    BadModifier(String),
}

impl FromStr for KeyStroke {
    type Err = ParseKeyStrokeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('+').collect::<Vec<_>>();
        let key_part = parts.pop().ok_or(ParseKeyStrokeError::MissingKey)?;
        let mut chars = key_part.chars();
        let key = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(if key_part.is_empty() {
                    ParseKeyStrokeError::MissingKey
                } else {
                    ParseKeyStrokeError::BadKey(key_part.to_owned())
                });
            }
        };

        let mut stroke = KeyStroke::plain(key);
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" => stroke.ctrl = true,
                "shift" => stroke.shift = true,
                "alt" => stroke.alt = true,
                _ => {
                    return Err(ParseKeyStrokeError::BadModifier(
                        part.to_owned(),
                    ));
                }
            }
        }
        Ok(stroke)
    }
}
