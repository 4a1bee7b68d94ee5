//! Recoverable problems reported alongside results

use serde::Serialize;
use std::fmt;

/// Something went wrong but rendering carried on.
///
/// Warnings are logged where they arise and also handed back to the caller
/// (on the [`System`](crate::System) for load-time problems, on the
/// [`Document`](crate::document::Document) for render-time ones).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A whole dictionary was not supplied and is treated as empty
    MissingDictionary { dictionary: String },
    /// A rule regex did not compile; the rule is skipped
    InvalidRule { name: String, message: String },
    /// A mode pattern did not compile; the mode is never matched
    InvalidMode { name: String, message: String },
    /// A rule selected for a render does not exist
    UnknownRule { name: String },
    /// A mode selected for a render does not exist
    UnknownMode { name: String },
    /// Part of a word has no glyph, mode or phrase and was drawn as a marker
    UnmappedText { word: String, text: String },
    /// A phrase placeholder had nothing to stand for
    MissingPhrase { phrase: Option<String> },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDictionary { dictionary } => {
                write!(f, "dictionary '{dictionary}' missing, using an empty one")
            },
            Self::InvalidRule { name, message } => {
                write!(f, "rule '{name}' skipped: {message}")
            },
            Self::InvalidMode { name, message } => {
                write!(f, "mode '{name}' skipped: {message}")
            },
            Self::UnknownRule { name } => write!(f, "unknown rule '{name}'"),
            Self::UnknownMode { name } => write!(f, "unknown mode '{name}'"),
            Self::UnmappedText { word, text } => {
                write!(f, "no glyph for '{text}' in '{word}'")
            },
            Self::MissingPhrase { phrase: Some(phrase) } => {
                write!(f, "phrase '{phrase}' is not in the system")
            },
            Self::MissingPhrase { phrase: None } => {
                write!(f, "phrase placeholder without a recorded phrase")
            },
        }
    }
}
