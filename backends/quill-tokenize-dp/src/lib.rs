//! DP Tokenizer - best-scoring segmentation of a word
//!
//! Every char boundary of the word gets one table entry holding the best
//! tokenization of the rest of the word and a back-pointer to the token that
//! starts it. The table is filled from the end of the word toward its start,
//! so each offset is solved exactly once.
//!
//! Candidates at an offset, in the order they are tried:
//!
//! - active modes whose regex match, searched from the offset with the whole
//!   word as context, starts exactly there and is non-empty
//! - glyphs whose key is a literal prefix of the remaining text
//! - a one-character unmapped token
//!
//! The unmapped fallback means every offset has a tokenization, so the
//! tokenizer never fails on input it cannot draw. Ranking is described on
//! [`TokenScore::cmp_rank`]; a candidate replaces the current best only if
//! it ranks strictly higher. With extra tie-breaks configured an offset keeps
//! one entry per longest-token length instead of a single best.

use std::cmp::Ordering;
use std::sync::Arc;

use quill_core::{
    error::Result,
    geometry::TokenGeometry,
    system::System,
    traits::Tokenizer,
    types::{Token, TokenSource},
    Selection, TieBreak,
};

pub mod score;

#[cfg(test)]
mod proptests;

pub use score::TokenScore;

/// The standard tokenizer
pub struct DpTokenizer;

impl DpTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DpTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// One tokenization of the text from an offset to the end
#[derive(Debug, Clone)]
struct Entry {
    score: TokenScore,
    source: TokenSource,
    key: String,
    geometry: Arc<TokenGeometry>,
    /// Byte offset where the next token starts
    end: usize,
    /// Index of the tail entry in the slot at `end`
    next: usize,
}

/// Add `candidate` to the entries kept for one offset.
///
/// Only entries with the best token counts survive. Without tie-breaks one
/// entry is enough. With them, the best entry per longest-token length is
/// kept: `longest` combines by maximum, so a tail that loses on it can still
/// win overall once a longer token is put in front.
fn offer(frontier: &mut Vec<Entry>, candidate: Entry, tie_breaks: &[TieBreak]) {
    if let Some(first) = frontier.first() {
        match candidate.score.cmp_counts(&first.score) {
            Ordering::Less => return,
            Ordering::Greater => frontier.clear(),
            Ordering::Equal => {},
        }
    }

    let longest = candidate.score.longest;
    let same_class = |entry: &&mut Entry| tie_breaks.is_empty() || entry.score.longest == longest;
    match frontier.iter_mut().find(same_class) {
        Some(current) => {
            if candidate.score.beats(&current.score, tie_breaks) {
                *current = candidate;
            }
        },
        None => frontier.push(candidate),
    }
}

/// The first entry no other entry beats
fn best_of<'a>(entries: &'a [Entry], tie_breaks: &[TieBreak]) -> Option<&'a Entry> {
    entries.iter().fold(None, |best, entry| match best {
        Some(current) if !entry.score.beats(&current.score, tie_breaks) => Some(current),
        _ => Some(entry),
    })
}

impl Tokenizer for DpTokenizer {
    fn name(&self) -> &'static str {
        "dp"
    }

    fn tokenize(&self, word: &str, system: &System, modes: &Selection) -> Result<Vec<Token>> {
        if word.is_empty() {
            return Ok(Vec::new());
        }

        let tie_breaks = &system.options().tie_breaks;
        let active_modes: Vec<_> = system.active_modes(modes).collect();

        // Byte offset of every char boundary, including the end
        let mut offsets: Vec<usize> = word.char_indices().map(|(i, _)| i).collect();
        offsets.push(word.len());
        let slot_of = |offset: usize| offsets.binary_search(&offset).ok();

        let mut table: Vec<Vec<Entry>> = vec![Vec::new(); offsets.len()];
        let last = offsets.len() - 1;
        let end_of_word = [TokenScore::empty()];

        for slot in (0..last).rev() {
            let start = offsets[slot];
            let rest = &word[start..];
            let mut frontier: Vec<Entry> = Vec::new();

            let mut consider = |end: usize,
                                source: TokenSource,
                                key: &str,
                                geometry: &Arc<TokenGeometry>,
                                pattern_len: usize| {
                let Some(end_slot) = slot_of(end) else {
                    return;
                };
                let tails: Vec<TokenScore> = if end_slot == last {
                    end_of_word.to_vec()
                } else {
                    table[end_slot].iter().map(|entry| entry.score).collect()
                };
                let chars = end_slot - slot;
                for (next, tail) in tails.into_iter().enumerate() {
                    let candidate = Entry {
                        score: tail.prepend(chars, source, pattern_len),
                        source,
                        key: key.to_string(),
                        geometry: Arc::clone(geometry),
                        end,
                        next,
                    };
                    offer(&mut frontier, candidate, tie_breaks);
                }
            };

            for mode in &active_modes {
                if let Some(found) = mode.regex().find_at(word, start) {
                    if found.start() == start && found.end() > start {
                        consider(
                            found.end(),
                            TokenSource::Mode,
                            &mode.name,
                            &mode.geometry,
                            mode.pattern_len(),
                        );
                    }
                }
            }

            if let Some(first) = rest.chars().next() {
                for glyph in system.glyphs_starting_with(first) {
                    if rest.starts_with(glyph.key.as_str()) {
                        consider(
                            start + glyph.key.len(),
                            TokenSource::Glyph,
                            &glyph.key,
                            &glyph.geometry,
                            glyph.pattern_len(),
                        );
                    }
                }
            }

            consider(
                offsets[slot + 1],
                TokenSource::Unmapped,
                "",
                &system.unmapped_geometry(),
                0,
            );

            table[slot] = frontier;
        }

        let mut tokens = Vec::new();
        let mut current = best_of(&table[0], tie_breaks);
        let mut start = 0;
        while let Some(entry) = current {
            log::trace!(
                "'{word}' [{start}..{}] -> {:?} '{}'",
                entry.end,
                entry.source,
                entry.key
            );
            tokens.push(Token {
                source: entry.source,
                key: entry.key.clone(),
                text: word[start..entry.end].to_string(),
                geometry: Arc::clone(&entry.geometry),
            });
            start = entry.end;
            current = slot_of(entry.end)
                .filter(|&next| next < last)
                .and_then(|next| table[next].get(entry.next));
        }

        Ok(tokens)
    }
}
