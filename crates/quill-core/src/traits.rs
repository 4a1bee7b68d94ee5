//! The contracts that bind every backend together
//!
//! Each trait is one stage of the pipeline. Swap an implementation and the
//! rest of the pipeline never notices.
//!
//! - [`Normalizer`] - Where raw text becomes clean words
//! - [`Tokenizer`] - Where words become glyph tokens
//! - [`Compositor`] - Where tokens become placed strokes
//! - [`Exporter`] - Where documents become bytes

use crate::{
    document::Document,
    error::Result,
    system::System,
    types::{NormalizedText, Token, Word},
    LayoutParams, RenderFlags, Selection,
};

/// Cleans raw text and applies a system's rewrite rules
pub trait Normalizer: Send + Sync {
    /// Identify yourself in logs and error messages
    fn name(&self) -> &'static str;

    /// Turn `raw` into paragraphs of space-separated words.
    ///
    /// Extracted phrases are replaced by [`PLACEHOLDER`](crate::PLACEHOLDER)
    /// and queued in order of appearance.
    fn normalize(
        &self,
        raw: &str,
        system: &System,
        rules: &Selection,
        flags: &RenderFlags,
    ) -> Result<NormalizedText>;
}

/// Splits one word into dictionary tokens
pub trait Tokenizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Tokens covering all of `word`, in order.
    ///
    /// Text nothing matches comes back as unmapped tokens, so this only
    /// fails on internal errors.
    fn tokenize(&self, word: &str, system: &System, modes: &Selection) -> Result<Vec<Token>>;

    /// Drop any memoized results
    fn clear_cache(&self) {}
}

/// Assembles words, wraps lines and interpolates strokes
pub trait Compositor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lay out `paragraphs`; each paragraph starts on a fresh line
    fn compose(
        &self,
        paragraphs: &[Vec<Word>],
        params: &LayoutParams,
        flags: &RenderFlags,
    ) -> Result<Document>;
}

/// Packages a document for a renderer collaborator
pub trait Exporter: Send + Sync {
    fn name(&self) -> &'static str;

    fn export(&self, document: &Document) -> Result<Vec<u8>>;

    /// File extension without the dot
    fn extension(&self) -> &'static str;

    fn mime_type(&self) -> &'static str;
}
