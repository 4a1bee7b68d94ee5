//! Stroke geometry: the raw pen paths stored in a system
//!
//! Coordinates are glyph-local, y grows upward and y = 0 sits on the
//! baseline. A [`Stroke`] is one pen-down path; a [`TokenGeometry`] is the
//! set of strokes drawn for one matched glyph, mode or phrase.

use kurbo::{Point, Rect, Vec2};

/// One continuous pen-down path. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    /// Returns `None` for an empty point list
    pub fn new(points: Vec<Point>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    /// A pen-down without movement
    pub fn dot(point: Point) -> Self {
        Self {
            points: vec![point],
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }

    /// Where the pen lands
    pub fn first(&self) -> Point {
        self.points[0]
    }

    /// Where the pen lifts
    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Copy of this stroke scaled about the origin, then moved by `offset`
    pub fn transformed(&self, scale: f64, offset: Vec2) -> Stroke {
        Stroke {
            points: self
                .points
                .iter()
                .map(|p| Point::new(p.x * scale, p.y * scale) + offset)
                .collect(),
        }
    }

    pub fn bounds(&self) -> Rect {
        bounds_of(&self.points).unwrap_or(Rect::from_points(self.first(), self.first()))
    }
}

/// Everything drawn for one token. Holds at least one stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenGeometry {
    strokes: Vec<Stroke>,
}

impl TokenGeometry {
    /// Returns `None` when there are no strokes
    pub fn new(strokes: Vec<Stroke>) -> Option<Self> {
        if strokes.is_empty() {
            None
        } else {
            Some(Self { strokes })
        }
    }

    /// Stand-in geometry for text no dictionary entry covers:
    /// a single dot at the origin, which lands on the cursor when composed.
    pub fn sentinel() -> Self {
        Self {
            strokes: vec![Stroke::dot(Point::ORIGIN)],
        }
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// First point of the first stroke
    pub fn entry(&self) -> Point {
        self.strokes[0].first()
    }

    /// Last point of the last stroke
    pub fn exit(&self) -> Point {
        self.strokes[self.strokes.len() - 1].last()
    }

    pub fn bounds(&self) -> Rect {
        self.strokes
            .iter()
            .map(Stroke::bounds)
            .reduce(|acc, r| acc.union(r))
            .unwrap_or(Rect::ZERO)
    }
}

/// Bounding box of a point set, `None` when empty
pub fn bounds_of<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Rect> {
    let mut iter = points.into_iter();
    let first = *iter.next()?;
    Some(iter.fold(Rect::from_points(first, first), |acc, p| acc.union_pt(*p)))
}
