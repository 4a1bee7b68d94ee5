//! Character-level cleanup that runs before phrases and rules

use quill_core::PLACEHOLDER;

/// Collapse whitespace runs to one space, lowercase, then isolate
/// digits and punctuation so each becomes its own word.
///
/// Apostrophes and the placeholder character are dropped; `/`, `\` and `-`
/// separate words.
pub fn clean(raw: &str) -> String {
    let lowered = collapse_whitespace(raw).to_lowercase();

    let mut spaced = String::with_capacity(lowered.len() * 2);
    for ch in lowered.chars() {
        match ch {
            '\'' | '\u{2019}' | PLACEHOLDER => {},
            '/' | '\\' | '-' => spaced.push(' '),
            c if c.is_ascii_digit() || c.is_ascii_punctuation() => {
                spaced.push(' ');
                spaced.push(c);
                spaced.push(' ');
            },
            c => spaced.push(c),
        }
    }

    collapse_whitespace(&spaced)
}

/// Single spaces between words, none at either end
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
