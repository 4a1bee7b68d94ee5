//! Ranking of competing tokenizations

use quill_core::{types::TokenSource, TieBreak};
use std::cmp::Ordering;

/// Summary of a (partial) tokenization, enough to rank it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenScore {
    /// Characters that fell back to unmapped tokens
    pub unmapped: usize,
    /// Tokens that came from modes
    pub modes: usize,
    pub tokens: usize,
    /// Char length of the longest token
    pub longest: usize,
    /// Sum of source pattern lengths
    pub pattern_len: usize,
}

impl TokenScore {
    /// Score of the empty tokenization
    pub fn empty() -> Self {
        Self::default()
    }

    /// Score after putting one more token in front
    pub fn prepend(&self, chars: usize, source: TokenSource, pattern_len: usize) -> Self {
        Self {
            unmapped: self.unmapped + if source == TokenSource::Unmapped { chars } else { 0 },
            modes: self.modes + usize::from(source == TokenSource::Mode),
            tokens: self.tokens + 1,
            longest: self.longest.max(chars),
            pattern_len: self.pattern_len + pattern_len,
        }
    }

    /// `Greater` means `self` is the better tokenization.
    ///
    /// Fewer unmapped characters first, then more mode tokens, fewer tokens
    /// and a longer longest token, then each extra criterion in order.
    pub fn cmp_rank(&self, other: &Self, tie_breaks: &[TieBreak]) -> Ordering {
        self.cmp_counts(other)
            .then(self.longest.cmp(&other.longest))
            .then_with(|| {
                tie_breaks
                    .iter()
                    .map(|tie_break| match tie_break {
                        TieBreak::PatternLength => self.pattern_len.cmp(&other.pattern_len),
                    })
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
    }

    /// Ranking on the criteria that add up token by token: unmapped
    /// characters, mode tokens and token count.
    ///
    /// A tail that loses here loses whatever is put in front of it.
    pub fn cmp_counts(&self, other: &Self) -> Ordering {
        other
            .unmapped
            .cmp(&self.unmapped)
            .then(self.modes.cmp(&other.modes))
            .then(other.tokens.cmp(&self.tokens))
    }

    pub fn beats(&self, other: &Self, tie_breaks: &[TieBreak]) -> bool {
        self.cmp_rank(other, tie_breaks) == Ordering::Greater
    }
}
