//! Whole-phrase extraction
//!
//! Every phrase key goes into one alternation, longest first, so the regex
//! engine's leftmost-first semantics give longer phrases priority at the
//! same position. The alternation is wrapped in `\b` so a phrase never
//! fires inside a longer word.

use quill_core::error::TextError;
use quill_core::PLACEHOLDER;
use regex::{Regex, RegexBuilder};
use std::collections::{HashSet, VecDeque};

const SIZE_LIMIT: usize = 64 * (1 << 20);

/// Compiled matcher for a set of phrase spellings
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    regex: Regex,
}

impl PhraseMatcher {
    /// `None` when there is nothing to match
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a str>) -> Result<Option<Self>, TextError> {
        Self::build(keys, false)
    }

    /// Like [`PhraseMatcher::new`], but also matches existing placeholders
    /// so a second pass can keep the queue in text order
    pub fn with_placeholders<'a>(
        keys: impl IntoIterator<Item = &'a str>,
    ) -> Result<Option<Self>, TextError> {
        Self::build(keys, true)
    }

    fn build<'a>(
        keys: impl IntoIterator<Item = &'a str>,
        placeholders: bool,
    ) -> Result<Option<Self>, TextError> {
        let mut seen = HashSet::new();
        let mut keys: Vec<&str> = keys
            .into_iter()
            .filter(|k| !k.trim().is_empty() && seen.insert(*k))
            .collect();
        if keys.is_empty() {
            return Ok(None);
        }
        // Stable sort keeps declaration order between equal lengths
        keys.sort_by_key(|k| std::cmp::Reverse(k.chars().count()));

        let alternation = keys
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let mut pattern = format!(r"\b(?:{alternation})\b");
        if placeholders {
            pattern = format!("{}|{pattern}", regex::escape(&PLACEHOLDER.to_string()));
        }

        let regex = RegexBuilder::new(&pattern)
            .size_limit(SIZE_LIMIT)
            .build()
            .map_err(|err| TextError::PhraseMatcher(err.to_string()))?;
        Ok(Some(Self { regex }))
    }

    /// Replace each match with a spaced placeholder and queue the matched
    /// spelling. Existing placeholders (when matched) pull their entry from
    /// `previous` instead.
    pub fn extract(
        &self,
        text: &str,
        previous: &mut VecDeque<String>,
        queue: &mut VecDeque<String>,
    ) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for found in self.regex.find_iter(text) {
            out.push_str(&text[last..found.start()]);
            let matched = found.as_str();
            if is_placeholder(matched) {
                if let Some(key) = previous.pop_front() {
                    queue.push_back(key);
                }
            } else {
                log::trace!("Phrase '{matched}' at {}", found.start());
                queue.push_back(matched.to_string());
            }
            out.push(' ');
            out.push(PLACEHOLDER);
            out.push(' ');
            last = found.end();
        }
        out.push_str(&text[last..]);
        out
    }
}

fn is_placeholder(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next() == Some(PLACEHOLDER) && chars.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(keys: &[&str], text: &str) -> (String, Vec<String>) {
        let matcher = PhraseMatcher::new(keys.iter().copied()).unwrap().unwrap();
        let mut queue = VecDeque::new();
        let out = matcher.extract(text, &mut VecDeque::new(), &mut queue);
        (out.split_whitespace().collect::<Vec<_>>().join(" "), queue.into())
    }

    #[test]
    fn test_longest_phrase_wins() {
        let (text, queue) = run(&["of the", "of the people"], "government of the people");
        assert_eq!(text, "government §");
        assert_eq!(queue, ["of the people"]);
    }

    #[test]
    fn test_matches_in_order_without_overlap() {
        let (text, queue) = run(&["in the", "the end"], "in the end in the");
        assert_eq!(text, "§ end §");
        assert_eq!(queue, ["in the", "in the"]);
    }

    #[test]
    fn test_never_fires_mid_word() {
        let (text, queue) = run(&["can not"], "icanotot ican not cannot");
        assert_eq!(text, "icanotot ican not cannot");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_no_keys_means_no_matcher() {
        assert!(PhraseMatcher::new(["", "  "]).unwrap().is_none());
    }

    #[test]
    fn test_keys_are_literal() {
        let (text, queue) = run(&["a.b"], "axb a.b");
        assert_eq!(text, "axb §");
        assert_eq!(queue, ["a.b"]);
    }

    #[test]
    fn test_placeholders_keep_queue_positional() {
        let matcher = PhraseMatcher::with_placeholders(["of da"]).unwrap().unwrap();
        let mut previous = VecDeque::from(["first".to_string(), "last".to_string()]);
        let mut queue = VecDeque::new();
        matcher.extract("§ and of da and §", &mut previous, &mut queue);
        assert_eq!(queue, ["first", "of da", "last"]);
    }
}
