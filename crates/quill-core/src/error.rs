//! Error types for Quill

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuillError>;

/// Main error type for Quill
#[derive(Debug, Error)]
pub enum QuillError {
    #[error("Invalid system: {0}")]
    System(#[from] SystemError),

    #[error("Text processing failed: {0}")]
    Text(#[from] TextError),

    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

/// Problems in system data that make it unusable for rendering.
///
/// These are raised while the system is built, never mid-render.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SystemError {
    #[error("{kind} '{key}' has no strokes")]
    EmptyGeometry { kind: EntryKind, key: String },

    #[error("{kind} '{key}' stroke {stroke} has no points")]
    EmptyStroke {
        kind: EntryKind,
        key: String,
        stroke: usize,
    },

    #[error("{kind} '{key}' stroke {stroke} point {point} is not finite")]
    NonFiniteCoordinate {
        kind: EntryKind,
        key: String,
        stroke: usize,
        point: usize,
    },

    #[error("{kind} with an empty key")]
    EmptyKey { kind: EntryKind },

    #[error("Malformed system data: {0}")]
    Malformed(String),
}

/// Which dictionary an entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Glyph,
    Mode,
    Phrase,
    Rule,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Glyph => "glyph",
            Self::Mode => "mode",
            Self::Phrase => "phrase",
            Self::Rule => "rule",
        })
    }
}

/// Text normalization errors
#[derive(Debug, Error)]
pub enum TextError {
    #[error("Phrase matcher could not be built: {0}")]
    PhraseMatcher(String),
}

/// Layout errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Scale must be positive and finite, got {0}")]
    InvalidScale(f64),

    #[error("{name} spacing must be non-negative, got {value}")]
    InvalidSpacing { name: &'static str, value: f64 },

    #[error("Page {width}x{height} leaves no room inside its margins")]
    PageTooSmall { width: f64, height: f64 },
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),
}
