//! Joining a word's tokens into one connected pen path

use kurbo::{Point, Rect, Vec2};
use quill_core::{
    document::StrokeRole,
    geometry::{bounds_of, Stroke},
    types::Word,
};

/// Points closer than this count as the same point
const COINCIDENT: f64 = 1e-9;

/// A stroke in word-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledStroke {
    pub points: Vec<Point>,
    pub role: StrokeRole,
}

/// A word's strokes, joined and scaled, with its left edge near x = 0
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssembledWord {
    pub strokes: Vec<AssembledStroke>,
    /// Extent of the drawn strokes, `None` for an empty word
    pub bounds: Option<Rect>,
}

impl AssembledWord {
    pub fn width(&self) -> f64 {
        self.bounds.map_or(0.0, |b| b.width())
    }

    pub fn x_min(&self) -> f64 {
        self.bounds.map_or(0.0, |b| b.x0)
    }

    /// Every point of every stroke
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.strokes.iter().flat_map(|s| s.points.iter())
    }
}

/// Scale and join the tokens of `word`.
///
/// The first token is shifted so its leftmost point sits at x = 0. Each
/// later token is moved so its entry point lands on the previous token's
/// exit point.
pub fn assemble(word: &Word, scale: f64) -> AssembledWord {
    let mut strokes: Vec<AssembledStroke> = Vec::new();
    let mut cursor: Option<Point> = None;
    let stroke_total: usize = word.tokens.iter().map(|t| t.geometry.strokes().len()).sum();

    for token in &word.tokens {
        let geometry = &token.geometry;
        let offset = match cursor {
            None => Vec2::new(-geometry.bounds().x0 * scale, 0.0),
            Some(cursor) => cursor - scaled(geometry.entry(), scale),
        };

        for stroke in geometry.strokes() {
            let placed = stroke.transformed(scale, offset);
            let role = if token.is_unmapped() {
                StrokeRole::Marker
            } else {
                classify(&placed, &strokes, stroke_total)
            };
            strokes.push(AssembledStroke {
                points: placed.points().to_vec(),
                role,
            });
        }

        cursor = Some(scaled(geometry.exit(), scale) + offset);
    }

    let drawn = strokes
        .iter()
        .filter(|s| s.role != StrokeRole::Marker)
        .flat_map(|s| s.points.iter());
    let bounds = bounds_of(drawn).or_else(|| bounds_of(strokes.iter().flat_map(|s| s.points.iter())));

    AssembledWord { strokes, bounds }
}

fn scaled(point: Point, scale: f64) -> Point {
    Point::new(point.x * scale, point.y * scale)
}

/// A lone point is a marker when it opens a word that has more to draw
/// (elevation) or sits on the end point of an earlier path (connection)
fn classify(stroke: &Stroke, earlier: &[AssembledStroke], stroke_total: usize) -> StrokeRole {
    if !stroke.is_dot() {
        return StrokeRole::Path;
    }
    let point = stroke.first();

    let elevation = earlier.is_empty() && stroke_total > 1;
    let connection = earlier
        .iter()
        .filter(|s| s.role == StrokeRole::Path)
        .filter_map(|s| s.points.last())
        .any(|end| (*end - point).hypot() < COINCIDENT);

    if elevation || connection {
        StrokeRole::Marker
    } else {
        StrokeRole::Dot
    }
}
