use super::*;
use proptest::prelude::*;
use quill_core::{SystemSource, TieBreak};

const KEYS: [&str; 6] = ["a", "b", "ab", "ba", "aba", "bb"];

fn glyph_system() -> System {
    let source = KEYS.iter().fold(SystemSource::empty(), |source, key| {
        source.with_glyph(*key, vec![vec![[0.0, 0.0], [1.0, 0.0]]])
    });
    System::from_source(source).unwrap()
}

/// Every glyph-only segmentation of `word`, scored
fn all_scores(word: &str) -> Vec<TokenScore> {
    if word.is_empty() {
        return vec![TokenScore::empty()];
    }
    let mut scores = Vec::new();
    for key in KEYS {
        if let Some(rest) = word.strip_prefix(key) {
            for tail in all_scores(rest) {
                scores.push(tail.prepend(key.len(), TokenSource::Glyph, key.len()));
            }
        }
    }
    scores
}

fn chosen_score(tokens: &[Token]) -> TokenScore {
    tokens.iter().rev().fold(TokenScore::empty(), |score, token| {
        score.prepend(token.char_len(), token.source, 0)
    })
}

// Property: glyph-only tokenizations cover the word exactly
proptest! {
    #[test]
    fn prop_glyph_coverage(word in "[ab]{1,12}") {
        let system = glyph_system();
        let tokens = DpTokenizer::new().tokenize(&word, &system, &Selection::All).unwrap();

        let covered: usize = tokens.iter().map(Token::char_len).sum();
        prop_assert_eq!(covered, word.chars().count());
        prop_assert_eq!(tokens.iter().map(|t| t.text.as_str()).collect::<String>(), word);
        prop_assert!(tokens.iter().all(|t| t.source == TokenSource::Glyph));
    }
}

// Property: no alternative segmentation ranks higher than the chosen one
proptest! {
    #[test]
    fn prop_choice_is_optimal(word in "[ab]{1,8}") {
        let system = glyph_system();
        let tokens = DpTokenizer::new().tokenize(&word, &system, &Selection::All).unwrap();
        let chosen = chosen_score(&tokens);

        for alternative in all_scores(&word) {
            prop_assert!(
                !alternative.beats(&chosen, &[]),
                "{:?} beats chosen {:?}", alternative, chosen
            );
        }
    }
}

// Property: any text at all is fully covered, unmapped or not
proptest! {
    #[test]
    fn prop_arbitrary_text_covered(word in "\\PC{0,16}") {
        let system = glyph_system();
        let tokens = DpTokenizer::new().tokenize(&word, &system, &Selection::All).unwrap();
        prop_assert_eq!(tokens.iter().map(|t| t.text.as_str()).collect::<String>(), word);
        for token in tokens.iter().filter(|t| t.is_unmapped()) {
            prop_assert_eq!(token.char_len(), 1);
        }
    }
}

// Property: the extra tie-break never overrides the built-in criteria
proptest! {
    #[test]
    fn prop_tie_break_keeps_primary_ranking(word in "[ab]{1,8}") {
        let plain = glyph_system();
        let configured = {
            let source = KEYS.iter().fold(SystemSource::empty(), |source, key| {
                source.with_glyph(*key, vec![vec![[0.0, 0.0]]])
            });
            System::from_source(source.with_options(quill_core::SystemOptions {
                tie_breaks: vec![TieBreak::PatternLength],
            }))
            .unwrap()
        };

        let a = chosen_score(&DpTokenizer::new().tokenize(&word, &plain, &Selection::All).unwrap());
        let b = chosen_score(&DpTokenizer::new().tokenize(&word, &configured, &Selection::All).unwrap());
        prop_assert_eq!(a.cmp_rank(&b, &[]), std::cmp::Ordering::Equal);
    }
}

/// Glyphs plus modes whose patterns are padded to different lengths
fn tie_break_system() -> System {
    let line = || vec![vec![[0.0, 0.0], [1.0, 0.0]]];
    let source = ["a", "b", "ab", "x", "xx"]
        .iter()
        .fold(SystemSource::empty(), |source, key| source.with_glyph(*key, line()))
        .with_mode("m-ab", "ab|qqqqqq", line())
        .with_mode("m-b", "b+", line())
        .with_mode("m-bc", "bc|qqq", line())
        .with_options(quill_core::SystemOptions {
            tie_breaks: vec![TieBreak::PatternLength],
        });
    System::from_source(source).unwrap()
}

fn token_pattern_len(system: &System, token: &Token) -> usize {
    match token.source {
        TokenSource::Glyph => token.key.len(),
        TokenSource::Mode => system
            .modes()
            .iter()
            .find(|mode| mode.name == token.key)
            .map_or(0, |mode| mode.pattern_len()),
        TokenSource::Phrase | TokenSource::Unmapped => 0,
    }
}

/// Every segmentation the tokenizer could produce from `start`, scored
fn all_scores_from(system: &System, word: &str, start: usize) -> Vec<TokenScore> {
    if start == word.len() {
        return vec![TokenScore::empty()];
    }
    let rest = &word[start..];
    let mut steps: Vec<(usize, TokenSource, usize)> = Vec::new();
    for mode in system.modes() {
        if let Some(found) = mode.regex().find_at(word, start) {
            if found.start() == start && found.end() > start {
                steps.push((found.end(), TokenSource::Mode, mode.pattern_len()));
            }
        }
    }
    for glyph in system.glyphs() {
        if rest.starts_with(glyph.key.as_str()) {
            steps.push((start + glyph.key.len(), TokenSource::Glyph, glyph.pattern_len()));
        }
    }
    if let Some(first) = rest.chars().next() {
        steps.push((start + first.len_utf8(), TokenSource::Unmapped, 0));
    }

    let mut scores = Vec::new();
    for (end, source, pattern_len) in steps {
        let chars = word[start..end].chars().count();
        for tail in all_scores_from(system, word, end) {
            scores.push(tail.prepend(chars, source, pattern_len));
        }
    }
    scores
}

// Property: with the pattern-length tie-break on, no alternative beats the choice
proptest! {
    #[test]
    fn prop_tie_break_choice_is_optimal(word in "[abcx]{1,8}") {
        let system = tie_break_system();
        let tie_breaks = [TieBreak::PatternLength];
        let tokens = DpTokenizer::new().tokenize(&word, &system, &Selection::All).unwrap();
        let chosen = tokens.iter().rev().fold(TokenScore::empty(), |score, token| {
            score.prepend(token.char_len(), token.source, token_pattern_len(&system, token))
        });

        for alternative in all_scores_from(&system, &word, 0) {
            prop_assert!(
                !alternative.beats(&chosen, &tie_breaks),
                "{:?} beats chosen {:?} for {:?}", alternative, chosen, tokens
            );
        }
    }
}
