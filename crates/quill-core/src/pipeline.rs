//! The engine that drives text through normalize, tokenize and compose

// this_file: crates/quill-core/src/pipeline.rs

use crate::{
    document::Document,
    error::{QuillError, Result},
    system::System,
    token_cache::{CacheStats, SharedTokenCache, TokenCache, TokenCacheKey},
    traits::{Compositor, Exporter, Normalizer, Tokenizer},
    types::{Token, TokenSource, Word},
    warning::Warning,
    LayoutParams, RenderRequest, Selection, PLACEHOLDER,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Pipeline for shorthand rendering: Normalize → Tokenize → Compose → Export
///
/// Between tokenizing and composing the pipeline resolves phrase
/// placeholders itself: each placeholder word takes the next spelling from
/// the normalizer's phrase queue, maps it to its phrase through the phrase
/// index and becomes a single phrase token.
///
/// ```ignore
/// use quill_core::Pipeline;
///
/// let pipeline = Pipeline::builder()
///     .normalizer(Arc::new(RuleNormalizer::new()))
///     .tokenizer(Arc::new(DpTokenizer::new()))
///     .compositor(Arc::new(StrokeCompositor::new()))
///     .exporter(Arc::new(JsonExporter::new()))
///     .build()?;
///
/// let bytes = pipeline.process(&RenderRequest::new("of the people"), &system, &layout)?;
/// ```
pub struct Pipeline {
    normalizer: Option<Arc<dyn Normalizer>>,
    tokenizer: Option<Arc<dyn Tokenizer>>,
    compositor: Option<Arc<dyn Compositor>>,
    exporter: Option<Arc<dyn Exporter>>,
    token_cache: Option<SharedTokenCache>,
}

impl Pipeline {
    /// Start building a new pipeline
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Run normalize, tokenize and compose, returning the placed document
    pub fn render(
        &self,
        request: &RenderRequest,
        system: &System,
        layout: &LayoutParams,
    ) -> Result<Document> {
        let normalizer = self
            .normalizer
            .as_ref()
            .ok_or_else(|| QuillError::Config("No normalizer configured".into()))?;
        let tokenizer = self
            .tokenizer
            .as_ref()
            .ok_or_else(|| QuillError::Config("No tokenizer configured".into()))?;
        let compositor = self
            .compositor
            .as_ref()
            .ok_or_else(|| QuillError::Config("No compositor configured".into()))?;

        let mut warnings = unknown_selections(request, system);

        log::debug!("Normalizing with backend: {}", normalizer.name());
        let normalized =
            normalizer.normalize(&request.text, system, &request.rules, &request.flags)?;
        warnings.extend(normalized.warnings);

        log::debug!("Tokenizing with backend: {}", tokenizer.name());
        let mut phrases = normalized.phrase_queue;
        let index = &normalized.phrase_index;
        let mut paragraphs = Vec::with_capacity(normalized.paragraphs.len());
        for paragraph in &normalized.paragraphs {
            let mut words = Vec::new();
            for word in paragraph.split_whitespace() {
                let word = if is_placeholder(word) {
                    phrase_word(&mut phrases, index, system, &mut warnings)
                } else {
                    let tokens = tokenizer.tokenize(word, system, &request.modes)?;
                    warnings.extend(unmapped_warnings(word, &tokens));
                    Word::new(word, tokens)
                };
                words.push(word);
            }
            paragraphs.push(words);
        }
        if !phrases.is_empty() {
            log::debug!("{} queued phrases had no placeholder", phrases.len());
        }

        log::debug!("Composing with backend: {}", compositor.name());
        let mut document = compositor.compose(&paragraphs, layout, &request.flags)?;

        warnings.append(&mut document.warnings);
        document.warnings = warnings;
        Ok(document)
    }

    /// Render and hand the document to the exporter
    pub fn process(
        &self,
        request: &RenderRequest,
        system: &System,
        layout: &LayoutParams,
    ) -> Result<Vec<u8>> {
        let exporter = self
            .exporter
            .as_ref()
            .ok_or_else(|| QuillError::Config("No exporter configured".into()))?;

        let document = self.render(request, system, layout)?;

        log::debug!("Exporting with backend: {}", exporter.name());
        exporter.export(&document)
    }

    pub fn exporter(&self) -> Option<&Arc<dyn Exporter>> {
        self.exporter.as_ref()
    }

    /// Token cache statistics, if caching is enabled
    pub fn token_cache_stats(&self) -> Option<CacheStats> {
        self.token_cache.as_ref().map(|cache| cache.stats())
    }
}

/// Build pipelines piece by piece
pub struct PipelineBuilder {
    normalizer: Option<Arc<dyn Normalizer>>,
    tokenizer: Option<Arc<dyn Tokenizer>>,
    compositor: Option<Arc<dyn Compositor>>,
    exporter: Option<Arc<dyn Exporter>>,
    cache_tokens: bool,
    token_cache: Option<SharedTokenCache>,
}

impl PipelineBuilder {
    /// Start with a clean slate
    pub fn new() -> Self {
        Self {
            normalizer: None,
            tokenizer: None,
            compositor: None,
            exporter: None,
            cache_tokens: false,
            token_cache: None,
        }
    }

    pub fn normalizer(mut self, normalizer: Arc<dyn Normalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn compositor(mut self, compositor: Arc<dyn Compositor>) -> Self {
        self.compositor = Some(compositor);
        self
    }

    pub fn exporter(mut self, exporter: Arc<dyn Exporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Enable or disable the token cache (default: disabled)
    pub fn enable_token_cache(mut self, enabled: bool) -> Self {
        self.cache_tokens = enabled;
        self
    }

    /// Supply a shared token cache for reuse across pipelines; implies enabling it
    pub fn with_token_cache(mut self, cache: SharedTokenCache) -> Self {
        self.cache_tokens = true;
        self.token_cache = Some(cache);
        self
    }

    /// Create the pipeline, ready to run
    pub fn build(self) -> Result<Pipeline> {
        let token_cache = if self.cache_tokens {
            Some(
                self.token_cache
                    .unwrap_or_else(|| Arc::new(TokenCache::new())),
            )
        } else {
            None
        };

        let tokenizer = match (self.tokenizer, token_cache.as_ref()) {
            (Some(tokenizer), Some(cache)) => Some(Arc::new(CachedTokenizer::new(
                tokenizer,
                Arc::clone(cache),
            )) as Arc<dyn Tokenizer>),
            (Some(tokenizer), None) => Some(tokenizer),
            (None, _) => None,
        };

        Ok(Pipeline {
            normalizer: self.normalizer,
            tokenizer,
            compositor: self.compositor,
            exporter: self.exporter,
            token_cache,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrapper adding backend-neutral token caching
struct CachedTokenizer {
    inner: Arc<dyn Tokenizer>,
    cache: SharedTokenCache,
}

impl CachedTokenizer {
    fn new(inner: Arc<dyn Tokenizer>, cache: SharedTokenCache) -> Self {
        Self { inner, cache }
    }
}

impl Tokenizer for CachedTokenizer {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn tokenize(&self, word: &str, system: &System, modes: &Selection) -> Result<Vec<Token>> {
        let key = TokenCacheKey::new(word, system.id(), modes);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let tokens = self.inner.tokenize(word, system, modes)?;
        self.cache.insert(key, tokens.clone());
        Ok(tokens)
    }

    fn clear_cache(&self) {
        self.cache.clear();
        self.inner.clear_cache();
    }
}

fn is_placeholder(word: &str) -> bool {
    let mut chars = word.chars();
    chars.next() == Some(PLACEHOLDER) && chars.next().is_none()
}

fn phrase_word(
    phrases: &mut VecDeque<String>,
    index: &HashMap<String, String>,
    system: &System,
    warnings: &mut Vec<Warning>,
) -> Word {
    let Some(spelling) = phrases.pop_front() else {
        let warning = Warning::MissingPhrase { phrase: None };
        log::warn!("{warning}");
        warnings.push(warning);
        return Word::empty(PLACEHOLDER.to_string());
    };

    // Spellings missing from the index are taken as canonical keys
    let key = index.get(&spelling).cloned().unwrap_or_else(|| spelling.clone());
    match system.phrase(&key) {
        Some(phrase) => {
            log::trace!("Phrase token '{spelling}' -> '{key}'");
            let token = Token {
                source: TokenSource::Phrase,
                key: phrase.key.clone(),
                text: spelling,
                geometry: Arc::clone(&phrase.geometry),
            };
            Word::new(key, vec![token])
        },
        None => {
            let warning = Warning::MissingPhrase {
                phrase: Some(key.clone()),
            };
            log::warn!("{warning}");
            warnings.push(warning);
            Word::empty(key)
        },
    }
}

/// One warning per run of consecutive unmapped tokens
fn unmapped_warnings(word: &str, tokens: &[Token]) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let mut run = String::new();
    for token in tokens {
        if token.is_unmapped() {
            run.push_str(&token.text);
        } else if !run.is_empty() {
            warnings.push(std::mem::take(&mut run));
        }
    }
    if !run.is_empty() {
        warnings.push(run);
    }

    warnings
        .into_iter()
        .map(|text| {
            let warning = Warning::UnmappedText {
                word: word.to_string(),
                text,
            };
            log::warn!("{warning}");
            warning
        })
        .collect()
}

fn unknown_selections(request: &RenderRequest, system: &System) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for name in request.rules.names() {
        if !system.rules().iter().any(|rule| &rule.name == name) {
            warnings.push(Warning::UnknownRule { name: name.clone() });
        }
    }
    for name in request.modes.names() {
        if !system.modes().iter().any(|mode| &mode.name == name) {
            warnings.push(Warning::UnknownMode { name: name.clone() });
        }
    }
    for warning in &warnings {
        log::warn!("{warning}");
    }
    warnings
}
