//! Rule Normalizer - cleanup, phrase extraction and rewrite rules
//!
//! Raw text goes through a fixed sequence:
//!
//! 1. Whitespace collapsed, everything lowercased
//! 2. Apostrophes dropped, `/ \ -` turned into spaces
//! 3. Digits and punctuation isolated as their own words
//! 4. Known phrases replaced by [`PLACEHOLDER`] and queued
//! 5. Active rules applied in the system's order, then a second phrase
//!    pass with the rule-adjusted phrase spellings
//!
//! Steps 4 and 5's phrase pass only run when abbreviation is on.

use lru::LruCache;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::num::NonZeroUsize;
use std::sync::Arc;

use quill_core::{
    error::Result,
    system::{Rule, System},
    traits::Normalizer,
    types::NormalizedText,
    RenderFlags, Selection, Warning, PLACEHOLDER,
};

pub mod clean;
pub mod phrases;

#[cfg(test)]
mod proptests;

pub use clean::{clean, collapse_whitespace};
pub use phrases::PhraseMatcher;

const PHRASE_TABLE_CACHE: usize = 16;

/// Phrase matchers for one system and rule selection
#[derive(Debug)]
struct PhraseTables {
    canonical: Option<PhraseMatcher>,
    adjusted: Option<PhraseMatcher>,
    index: HashMap<String, String>,
}

/// The standard normalizer
pub struct RuleNormalizer {
    tables: Mutex<LruCache<(u64, Selection), Arc<PhraseTables>>>,
}

impl RuleNormalizer {
    pub fn new() -> Self {
        let capacity = NonZeroUsize::new(PHRASE_TABLE_CACHE).unwrap_or(NonZeroUsize::MIN);
        Self {
            tables: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Forget compiled phrase matchers
    pub fn clear_cache(&self) {
        self.tables.lock().clear();
    }

    fn phrase_tables(
        &self,
        system: &System,
        selection: &Selection,
        rules: &[&Rule],
    ) -> Result<Arc<PhraseTables>> {
        let key = (system.id(), selection.clone());
        if let Some(tables) = self.tables.lock().get(&key) {
            return Ok(Arc::clone(tables));
        }

        let canonical = PhraseMatcher::new(system.phrases().iter().map(|p| p.key.as_str()))?;

        // Canonical spellings map to themselves and are never shadowed
        let mut index: HashMap<String, String> = HashMap::with_capacity(system.phrases().len());
        for phrase in system.phrases() {
            index
                .entry(phrase.key.clone())
                .or_insert_with(|| phrase.key.clone());
        }
        // Declaration order, so the adjusted matcher breaks length ties the same way
        let mut adjusted_keys: Vec<String> = Vec::with_capacity(system.phrases().len());
        for phrase in system.phrases() {
            let adjusted = apply_rules(rules, &phrase.key);
            if !adjusted_keys.contains(&adjusted) {
                index
                    .entry(adjusted.clone())
                    .or_insert_with(|| phrase.key.clone());
                adjusted_keys.push(adjusted);
            }
        }
        let adjusted = if rules.is_empty() {
            None
        } else {
            PhraseMatcher::with_placeholders(adjusted_keys.iter().map(String::as_str))?
        };

        let tables = Arc::new(PhraseTables {
            canonical,
            adjusted,
            index,
        });
        self.tables.lock().put(key, Arc::clone(&tables));
        Ok(tables)
    }

    fn normalize_paragraph(
        &self,
        raw: &str,
        rules: &[&Rule],
        tables: Option<&PhraseTables>,
        queue: &mut VecDeque<String>,
    ) -> String {
        let mut text = clean(raw);
        let mut found = VecDeque::new();

        if let Some(matcher) = tables.and_then(|t| t.canonical.as_ref()) {
            text = matcher.extract(&text, &mut VecDeque::new(), &mut found);
        }

        text = apply_rules(rules, &text);

        if let Some(tables) = tables {
            if let Some(matcher) = &tables.adjusted {
                let mut ordered = VecDeque::with_capacity(found.len());
                text = matcher.extract(&text, &mut found, &mut ordered);
                // Placeholders a rule removed keep their keys at the end
                ordered.append(&mut found);
                found = ordered;
            }
        }

        queue.append(&mut found);
        collapse_whitespace(&text)
    }
}

impl Default for RuleNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer for RuleNormalizer {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn normalize(
        &self,
        raw: &str,
        system: &System,
        rules: &Selection,
        flags: &RenderFlags,
    ) -> Result<NormalizedText> {
        let mut warnings = Vec::new();
        let mut usable = Vec::new();
        for rule in system.active_rules(rules) {
            match rule.error() {
                Some(message) => {
                    let warning = Warning::InvalidRule {
                        name: rule.name.clone(),
                        message: message.to_string(),
                    };
                    log::warn!("{warning}");
                    warnings.push(warning);
                },
                None => usable.push(rule),
            }
        }

        let tables = if flags.abbreviate {
            Some(self.phrase_tables(system, rules, &usable)?)
        } else {
            None
        };

        let sources: Vec<&str> = if flags.hard_breaks {
            raw.lines().collect()
        } else {
            vec![raw]
        };

        let mut normalized = NormalizedText {
            warnings,
            ..NormalizedText::default()
        };
        for source in sources {
            let paragraph = self.normalize_paragraph(
                source,
                &usable,
                tables.as_deref(),
                &mut normalized.phrase_queue,
            );
            if !paragraph.is_empty() {
                normalized.paragraphs.push(paragraph);
            }
        }
        if let Some(tables) = tables {
            normalized.phrase_index = tables.index.clone();
        }

        log::debug!(
            "Normalized into {} paragraphs, {} phrases queued",
            normalized.paragraphs.len(),
            normalized.phrase_queue.len()
        );
        Ok(normalized)
    }
}

/// Run `rules` over `text` in order
fn apply_rules(rules: &[&Rule], text: &str) -> String {
    let mut text = text.to_string();
    for rule in rules {
        if let Some(rewritten) = rule.apply(&text) {
            let rewritten = rewritten.into_owned();
            if rewritten != text {
                log::trace!("Rule '{}': '{text}' -> '{rewritten}'", rule.name);
            }
            text = rewritten;
        }
    }
    text
}
