//! Quill - render plain text as shorthand pen strokes
//!
//! Quill reads a shorthand *system* (glyph, mode, phrase and rule
//! dictionaries) and turns text into placed, interpolated strokes:
//!
//! 1. Normalize: clean the text, extract phrases, apply rewrite rules
//! 2. Tokenize: split each word into the best run of glyphs and modes
//! 3. Compose: join tokens into words, wrap lines, paginate, interpolate
//! 4. Export: hand the [`Document`](quill_core::Document) to a renderer
//!
//! # Example
//!
//! ```
//! use quill::prelude::*;
//!
//! let source = SystemSource::empty()
//!     .with_glyph("h", vec![vec![[0.0, 0.0], [0.0, 1.0]]])
//!     .with_glyph("i", vec![vec![[0.0, 0.0], [0.5, 0.0]]]);
//! let system = System::from_source(source)?;
//!
//! let document = quill::render("Hi", &system)?;
//! assert_eq!(document.word_count(), 1);
//! # Ok::<(), QuillError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `standard` (default): all of the below, plus [`standard_pipeline`]
//! - `text`: the rule normalizer
//! - `tokenize-dp`: the dynamic programming tokenizer
//! - `layout`: the stroke compositor
//! - `export-json`: the JSON exporter

pub use quill_core::{
    document, error, geometry, source, traits, types, Document, LayoutParams, PageGeometry,
    Pipeline, PipelineBuilder, QuillError, RenderFlags, RenderRequest, Result, Selection, System,
    SystemOptions, SystemSource, TieBreak, Warning,
};

pub mod system_dir;

#[cfg(feature = "export-json")]
pub use quill_export as export;

#[cfg(feature = "layout")]
pub use quill_layout as layout;

#[cfg(feature = "text")]
pub use quill_text as text;

#[cfg(feature = "tokenize-dp")]
pub use quill_tokenize_dp as tokenize_dp;

/// Common imports for typical usage
pub mod prelude {
    pub use quill_core::{
        document::{Document, StrokeRole},
        error::{QuillError, Result},
        traits::{Compositor, Exporter, Normalizer, Tokenizer},
        types::{Token, TokenSource, Word},
        LayoutParams, PageGeometry, Pipeline, RenderFlags, RenderRequest, Selection, System,
        SystemSource, Warning,
    };
}

/// The default stack: rule normalizer, DP tokenizer with a token cache,
/// stroke compositor and JSON exporter
#[cfg(feature = "standard")]
pub fn standard_pipeline() -> Result<Pipeline> {
    use std::sync::Arc;

    Pipeline::builder()
        .normalizer(Arc::new(quill_text::RuleNormalizer::new()))
        .tokenizer(Arc::new(quill_tokenize_dp::DpTokenizer::new()))
        .compositor(Arc::new(quill_layout::StrokeCompositor::new()))
        .exporter(Arc::new(quill_export::JsonExporter::new()))
        .enable_token_cache(true)
        .build()
}

/// Render `text` with every rule and mode active and default layout
#[cfg(feature = "standard")]
pub fn render(text: &str, system: &System) -> Result<Document> {
    standard_pipeline()?.render(&RenderRequest::new(text), system, &LayoutParams::default())
}
