//! Quill Core: from plain text to shorthand pen strokes
//!
//! A shorthand *system* maps letters, letter groups, regex-described
//! constructs and whole phrases to stroke geometry. This crate holds the
//! data model and the pipeline that turns text into a placed [`Document`].
//!
//! ## The Pipeline
//!
//! 1. **Normalize** - Clean the text, pull out phrases, apply rewrite rules
//! 2. **Tokenize** - Split each word into the best run of glyphs and modes
//! 3. **Compose** - Join tokens into word paths, wrap lines, interpolate
//! 4. **Export** - Hand the document to whoever draws it
//!
//! ## Build Your First Pipeline
//!
//! ```rust,no_run
//! use quill_core::{LayoutParams, Pipeline, RenderRequest, System, SystemSource};
//! use std::sync::Arc;
//!
//! # use quill_core::traits::*;
//! # use quill_core::types::*;
//! # use quill_core::document::Document;
//! # struct MyNormalizer;
//! # impl Normalizer for MyNormalizer {
//! #     fn name(&self) -> &'static str { "test" }
//! #     fn normalize(&self, _: &str, _: &System, _: &quill_core::Selection, _: &quill_core::RenderFlags)
//! #         -> quill_core::Result<NormalizedText> { unimplemented!() }
//! # }
//! # struct MyTokenizer;
//! # impl Tokenizer for MyTokenizer {
//! #     fn name(&self) -> &'static str { "test" }
//! #     fn tokenize(&self, _: &str, _: &System, _: &quill_core::Selection)
//! #         -> quill_core::Result<Vec<Token>> { unimplemented!() }
//! # }
//! # struct MyCompositor;
//! # impl Compositor for MyCompositor {
//! #     fn name(&self) -> &'static str { "test" }
//! #     fn compose(&self, _: &[Vec<Word>], _: &LayoutParams, _: &quill_core::RenderFlags)
//! #         -> quill_core::Result<Document> { unimplemented!() }
//! # }
//! let pipeline = Pipeline::builder()
//!     .normalizer(Arc::new(MyNormalizer))
//!     .tokenizer(Arc::new(MyTokenizer))
//!     .compositor(Arc::new(MyCompositor))
//!     .build()?;
//!
//! let system = System::from_source(SystemSource::empty())?;
//! let document = pipeline.render(
//!     &RenderRequest::new("of the people"),
//!     &system,
//!     &LayoutParams::default(),
//! )?;
//! # Ok::<(), quill_core::QuillError>(())
//! ```
//!
//! Backends implement [`Normalizer`], [`Tokenizer`], [`Compositor`] and
//! [`Exporter`]; the values passed between them live in [`types`].

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

pub mod document;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod source;
pub mod system;
pub mod token_cache;
pub mod traits;
pub mod warning;

pub use document::Document;
pub use error::{QuillError, Result};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use source::SystemSource;
pub use system::{System, SystemOptions, TieBreak};
pub use traits::{Compositor, Exporter, Normalizer, Tokenizer};
pub use warning::Warning;

/// Stands in for an extracted phrase in normalized text
pub const PLACEHOLDER: char = '§';

/// The values handed from one stage to the next
pub mod types {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Arc;

    use crate::geometry::TokenGeometry;
    use crate::warning::Warning;

    /// Which dictionary produced a token
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum TokenSource {
        Glyph,
        Mode,
        Phrase,
        /// Nothing matched; the token carries the system's sentinel geometry
        Unmapped,
    }

    /// One matched unit of a word
    #[derive(Debug, Clone, PartialEq)]
    pub struct Token {
        pub source: TokenSource,
        /// Glyph key, mode name or phrase key
        pub key: String,
        /// The text this token consumed
        pub text: String,
        pub geometry: Arc<TokenGeometry>,
    }

    impl Token {
        /// Matched length in chars
        pub fn char_len(&self) -> usize {
            self.text.chars().count()
        }

        pub fn is_unmapped(&self) -> bool {
            self.source == TokenSource::Unmapped
        }
    }

    /// A tokenized word
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Word {
        pub text: String,
        pub tokens: Vec<Token>,
    }

    impl Word {
        pub fn new(text: impl Into<String>, tokens: Vec<Token>) -> Self {
            Self {
                text: text.into(),
                tokens,
            }
        }

        /// A word that draws nothing but still takes up a gap
        pub fn empty(text: impl Into<String>) -> Self {
            Self::new(text, Vec::new())
        }

        pub fn is_empty(&self) -> bool {
            self.tokens.is_empty()
        }
    }

    /// Normalizer output
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct NormalizedText {
        /// Cleaned text, one entry per paragraph
        pub paragraphs: Vec<String>,
        /// Canonical phrase keys, in the order their placeholders appear
        pub phrase_queue: VecDeque<String>,
        /// Rule-adjusted phrase spelling to canonical key
        pub phrase_index: HashMap<String, String>,
        pub warnings: Vec<Warning>,
    }

    impl NormalizedText {
        /// All paragraphs joined by newlines
        pub fn text(&self) -> String {
            self.paragraphs.join("\n")
        }

        pub fn words(&self) -> impl Iterator<Item = &str> {
            self.paragraphs.iter().flat_map(|p| p.split_whitespace())
        }
    }
}

/// Which rules or modes a render enables
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    /// Everything the system defines
    #[default]
    All,
    /// Only these names; order does not matter
    Only(Vec<String>),
}

impl Selection {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(names.into_iter().map(Into::into).collect())
    }

    /// Nothing enabled
    pub fn none() -> Self {
        Self::Only(Vec::new())
    }

    pub fn contains(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.iter().any(|n| n == name),
        }
    }

    /// Explicitly requested names; empty for [`Selection::All`]
    pub fn names(&self) -> &[String] {
        match self {
            Self::All => &[],
            Self::Only(names) => names,
        }
    }
}

impl From<Option<Vec<String>>> for Selection {
    fn from(names: Option<Vec<String>>) -> Self {
        names.map_or(Self::All, Self::Only)
    }
}

/// Switches that change what a render produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderFlags {
    /// Keep each stroke's control points in the output
    pub show_knots: bool,
    /// Emit a guide for every line's baseline
    pub show_baselines: bool,
    /// Keep single-point dot strokes
    pub show_dots: bool,
    /// Replace known phrases with their phrase glyphs
    pub abbreviate: bool,
    /// Treat newlines in the input as paragraph breaks
    pub hard_breaks: bool,
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self {
            show_knots: false,
            show_baselines: false,
            show_dots: true,
            abbreviate: true,
            hard_breaks: false,
        }
    }
}

/// Everything a caller asks for in one render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderRequest {
    pub text: String,
    pub rules: Selection,
    pub modes: Selection,
    pub flags: RenderFlags,
}

impl RenderRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_rules(mut self, rules: Selection) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_modes(mut self, modes: Selection) -> Self {
        self.modes = modes;
        self
    }

    pub fn with_flags(mut self, flags: RenderFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// A bounded page, in document units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f64,
    /// `None` lays out one endless page
    pub height: Option<f64>,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
}

impl PageGeometry {
    /// US Letter in inches with 0.75in margins
    pub fn letter() -> Self {
        Self::with_margins(8.5, Some(11.0), 0.75)
    }

    /// ISO A4 in inches with 0.75in margins
    pub fn a4() -> Self {
        Self::with_margins(8.27, Some(11.69), 0.75)
    }

    pub fn with_margins(width: f64, height: Option<f64>, margin: f64) -> Self {
        Self {
            width,
            height,
            margin_top: margin,
            margin_right: margin,
            margin_bottom: margin,
            margin_left: margin,
        }
    }

    /// Width left for text between the side margins
    pub fn available_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }
}

/// How composed words are sized and spaced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Glyph units to document units
    pub scale: f64,
    /// Gap between words, in glyph units
    pub word_spacing: f64,
    /// Gap between one line's descent and the next line's ascent, in glyph units
    pub line_spacing: f64,
    /// Samples per interpolated stroke, at least 2
    pub sample_count: usize,
    pub page: Option<PageGeometry>,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            scale: 1.0,
            word_spacing: 0.2,
            line_spacing: 0.4,
            sample_count: 100,
            page: None,
        }
    }
}

impl LayoutParams {
    pub fn with_page(mut self, page: PageGeometry) -> Self {
        self.page = Some(page);
        self
    }

    /// Sample count with the lower bound applied
    pub fn effective_sample_count(&self) -> usize {
        self.sample_count.max(2)
    }

    /// Reject parameters no layout can honour
    pub fn validate(&self) -> std::result::Result<(), LayoutError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(LayoutError::InvalidScale(self.scale));
        }
        for (name, value) in [("word", self.word_spacing), ("line", self.line_spacing)] {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidSpacing { name, value });
            }
        }
        if let Some(page) = &self.page {
            let height = page.height.unwrap_or(f64::INFINITY);
            let available = page.available_width();
            let too_narrow = !available.is_finite() || available <= 0.0;
            let too_short = page
                .height
                .is_some_and(|h| h - page.margin_top - page.margin_bottom <= 0.0);
            if too_narrow || too_short {
                return Err(LayoutError::PageTooSmall {
                    width: page.width,
                    height,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_contains() {
        assert!(Selection::All.contains("anything"));
        let only = Selection::only(["a", "b"]);
        assert!(only.contains("b"));
        assert!(!only.contains("c"));
        assert!(!Selection::none().contains("a"));
    }

    #[test]
    fn test_selection_from_option() {
        assert_eq!(Selection::from(None), Selection::All);
        assert_eq!(
            Selection::from(Some(vec!["x".to_string()])),
            Selection::only(["x"])
        );
    }

    #[test]
    fn test_default_flags() {
        let flags = RenderFlags::default();
        assert!(flags.abbreviate);
        assert!(flags.show_dots);
        assert!(!flags.show_knots);
        assert!(!flags.hard_breaks);
    }

    #[test]
    fn test_flags_deserialize_with_defaults() {
        let flags: RenderFlags = serde_json::from_str(r#"{"show_knots": true}"#).unwrap();
        assert!(flags.show_knots);
        assert!(flags.abbreviate);
    }

    #[test]
    fn test_page_presets() {
        let letter = PageGeometry::letter();
        assert_eq!(letter.available_width(), 7.0);
        assert_eq!(letter.height, Some(11.0));
        assert_eq!(PageGeometry::a4().width, 8.27);
    }

    #[test]
    fn test_layout_params_validation() {
        assert!(LayoutParams::default().validate().is_ok());

        let bad_scale = LayoutParams {
            scale: 0.0,
            ..LayoutParams::default()
        };
        assert_eq!(bad_scale.validate(), Err(LayoutError::InvalidScale(0.0)));

        let bad_spacing = LayoutParams {
            line_spacing: -1.0,
            ..LayoutParams::default()
        };
        assert!(matches!(
            bad_spacing.validate(),
            Err(LayoutError::InvalidSpacing { name: "line", .. })
        ));

        let narrow = LayoutParams::default().with_page(PageGeometry::with_margins(1.0, None, 0.5));
        assert!(matches!(
            narrow.validate(),
            Err(LayoutError::PageTooSmall { .. })
        ));
    }

    #[test]
    fn test_sample_count_is_clamped() {
        let params = LayoutParams {
            sample_count: 0,
            ..LayoutParams::default()
        };
        assert_eq!(params.effective_sample_count(), 2);
    }

    #[test]
    fn test_normalized_text_words() {
        let normalized = types::NormalizedText {
            paragraphs: vec!["a b".into(), "c".into()],
            ..Default::default()
        };
        assert_eq!(normalized.words().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(normalized.text(), "a b\nc");
    }
}
