//! Stroke Compositor - words to lines to pages
//!
//! Composition happens in three passes:
//!
//! 1. [`word::assemble`] joins each word's tokens into one pen path
//! 2. [`wrap::break_lines`] splits each paragraph into lines
//! 3. Lines get baselines from their ascent and descent, move to a new page
//!    when they would cross the bottom margin, and every stroke is
//!    interpolated with [`spline::interpolate`]
//!
//! Glyph coordinates have y growing upward. Without a page the first line
//! hangs below y = 0; with a page, y = 0 is the bottom edge.

// this_file: crates/quill-layout/src/lib.rs

use kurbo::{Point, Rect, Vec2};

use quill_core::{
    document::{Baseline, Document, Line, PlacedStroke, PlacedWord, StrokeRole},
    error::{LayoutError, Result},
    geometry::bounds_of,
    traits::Compositor,
    types::Word,
    LayoutParams, RenderFlags,
};

pub mod spline;
pub mod word;
pub mod wrap;

#[cfg(test)]
mod proptests;

pub use spline::interpolate;
pub use word::{assemble, AssembledWord};
pub use wrap::break_lines;

/// The standard compositor
pub struct StrokeCompositor;

impl StrokeCompositor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StrokeCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor for StrokeCompositor {
    fn name(&self) -> &'static str {
        "strokes"
    }

    fn compose(
        &self,
        paragraphs: &[Vec<Word>],
        params: &LayoutParams,
        flags: &RenderFlags,
    ) -> Result<Document> {
        Ok(layout(paragraphs, params, flags)?)
    }
}

/// One line's words before vertical placement
struct PendingLine {
    words: Vec<(AssembledWord, PlacedWord)>,
    ascent: f64,
    descent: f64,
}

/// Lay out `paragraphs` and interpolate every stroke
pub fn layout(
    paragraphs: &[Vec<Word>],
    params: &LayoutParams,
    flags: &RenderFlags,
) -> std::result::Result<Document, LayoutError> {
    params.validate()?;

    let scale = params.scale;
    let gap = params.word_spacing * scale;
    let line_gap = params.line_spacing * scale;
    let margin_left = params.page.map_or(0.0, |p| p.margin_left);
    let available = params.page.map(|p| p.available_width());

    let pending = paragraphs
        .iter()
        .flat_map(|paragraph| horizontal_lines(paragraph, scale, gap, margin_left, available))
        .collect::<Vec<_>>();

    let page_height = params.page.and_then(|p| p.height);
    let top = match (params.page, page_height) {
        (Some(page), Some(height)) => height - page.margin_top,
        _ => 0.0,
    };
    let bottom = params.page.map_or(0.0, |p| p.margin_bottom);

    let mut document = Document::default();
    let mut page = 0;
    let mut previous: Option<(f64, f64)> = None;

    for (index, line) in pending.into_iter().enumerate() {
        let mut baseline = match previous {
            None => top - line.ascent,
            Some((baseline, descent)) => baseline - (descent.abs() + line_gap) - line.ascent,
        };

        let page_has_lines = previous.is_some();
        if page_height.is_some()
            && page_has_lines
            && baseline - (line.descent.abs() + line_gap) < bottom
        {
            page += 1;
            baseline = top - line.ascent;
            log::debug!("Line {index} starts page {page}");
        }
        previous = Some((baseline, line.descent));

        let mut placed_words = Vec::with_capacity(line.words.len());
        for (word_index, (assembled, placed)) in line.words.into_iter().enumerate() {
            let offset = Vec2::new(placed.x - assembled.x_min(), baseline);
            for stroke in assembled.strokes {
                if stroke.role == StrokeRole::Dot && !flags.show_dots {
                    continue;
                }
                let control: Vec<Point> = stroke.points.iter().map(|p| *p + offset).collect();
                let samples = match stroke.role {
                    StrokeRole::Path => interpolate(&control, params.effective_sample_count()),
                    StrokeRole::Dot | StrokeRole::Marker => control.clone(),
                };
                document.strokes.push(PlacedStroke {
                    page,
                    line: index,
                    word: word_index,
                    role: stroke.role,
                    samples,
                    control_points: flags.show_knots.then_some(control),
                });
            }
            placed_words.push(placed);
        }

        document.lines.push(Line {
            page,
            baseline,
            ascent: line.ascent,
            descent: line.descent,
            words: placed_words,
        });
    }

    if flags.show_baselines {
        document.baselines = baselines(&document.lines, gap);
    }
    document.pages = document.lines.last().map_or(0, |line| line.page + 1);
    document.bounds = bounds_of(
        document
            .drawable_strokes()
            .flat_map(|stroke| stroke.samples.iter()),
    )
    .map(Into::into);

    log::debug!(
        "Laid out {} lines on {} pages, {} strokes",
        document.lines.len(),
        document.pages,
        document.strokes.len()
    );
    Ok(document)
}

/// Assemble and wrap one paragraph
fn horizontal_lines(
    paragraph: &[Word],
    scale: f64,
    gap: f64,
    margin_left: f64,
    available: Option<f64>,
) -> Vec<PendingLine> {
    let assembled: Vec<AssembledWord> = paragraph.iter().map(|w| assemble(w, scale)).collect();
    let widths: Vec<f64> = assembled.iter().map(AssembledWord::width).collect();
    let mut assembled = assembled.into_iter();

    break_lines(&widths, available, gap)
        .into_iter()
        .map(|range| {
            let mut x = 0.0;
            let mut words = Vec::with_capacity(range.len());
            let mut extent: Option<Rect> = None;

            for index in range {
                let Some(word) = assembled.next() else {
                    break;
                };
                let placed = PlacedWord {
                    text: paragraph[index].text.clone(),
                    x: margin_left + x,
                    width: widths[index],
                };
                if let Some(bounds) = word.bounds {
                    extent = Some(extent.map_or(bounds, |e| e.union(bounds)));
                }
                x += widths[index] + gap;
                words.push((word, placed));
            }

            PendingLine {
                words,
                ascent: extent.map_or(0.0, |e| e.y1),
                descent: extent.map_or(0.0, |e| e.y0),
            }
        })
        .collect()
}

/// One guide per line spanning the widest line, padded by a word gap
fn baselines(lines: &[Line], gap: f64) -> Vec<Baseline> {
    let left = lines
        .iter()
        .filter_map(|line| line.words.first())
        .map(|word| word.x)
        .fold(f64::INFINITY, f64::min);
    let right = lines
        .iter()
        .filter_map(|line| line.words.last())
        .map(|word| word.x + word.width)
        .fold(f64::NEG_INFINITY, f64::max);
    if !left.is_finite() || !right.is_finite() {
        return Vec::new();
    }

    lines
        .iter()
        .map(|line| Baseline {
            page: line.page,
            y: line.baseline,
            x_start: left - gap,
            x_end: right + gap,
        })
        .collect()
}
