//! Greedy line breaking

use std::ops::Range;

/// Split words of the given `widths` into lines.
///
/// A word joins the current line when the line is empty or when the running
/// x plus its width stays within `available`; after each word the running x
/// advances by its width plus `gap`. With no `available` width everything
/// stays on one line. Returns one index range per line; no words, no lines.
pub fn break_lines(widths: &[f64], available: Option<f64>, gap: f64) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut x = 0.0;

    for (index, &width) in widths.iter().enumerate() {
        let overflows = available.is_some_and(|limit| x + width > limit);
        if index > start && overflows {
            lines.push(start..index);
            start = index;
            x = 0.0;
        }
        x += width + gap;
    }
    if start < widths.len() {
        lines.push(start..widths.len());
    }

    lines
}
