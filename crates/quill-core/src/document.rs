//! The placed, interpolated result of a render

use kurbo::{Point, Rect};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::warning::Warning;

/// How a renderer should treat a placed stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeRole {
    /// Two or more points, drawn as a curve
    Path,
    /// A single point drawn as a dot
    Dot,
    /// A single point that only positions the pen: elevation and
    /// connection markers, and unmapped text. Not drawn.
    Marker,
}

/// One stroke in document coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedStroke {
    pub page: usize,
    pub line: usize,
    /// Index of the word within its line
    pub word: usize,
    pub role: StrokeRole,
    #[serde(serialize_with = "serialize_points")]
    pub samples: Vec<Point>,
    /// Source control points, kept only when knots are requested
    #[serde(
        serialize_with = "serialize_optional_points",
        skip_serializing_if = "Option::is_none"
    )]
    pub control_points: Option<Vec<Point>>,
}

/// Where a word landed on its line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedWord {
    pub text: String,
    /// Left edge of the word's bounding box
    pub x: f64,
    pub width: f64,
}

/// A laid-out line with its vertical metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub page: usize,
    pub baseline: f64,
    /// Highest point above the baseline
    pub ascent: f64,
    /// Lowest point relative to the baseline, usually negative
    pub descent: f64,
    pub words: Vec<PlacedWord>,
}

/// A horizontal guide drawn under a line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Baseline {
    pub page: usize,
    pub y: f64,
    pub x_start: f64,
    pub x_end: f64,
}

/// Axis-aligned extent of everything placed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl From<Rect> for Bounds {
    fn from(rect: Rect) -> Self {
        Self {
            x_min: rect.x0,
            y_min: rect.y0,
            x_max: rect.x1,
            y_max: rect.y1,
        }
    }
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// The output of a render, ready for a renderer collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub lines: Vec<Line>,
    pub strokes: Vec<PlacedStroke>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub baselines: Vec<Baseline>,
    /// Number of pages used, at least 1 once anything is placed
    pub pages: usize,
    pub bounds: Option<Bounds>,
    pub warnings: Vec<Warning>,
}

impl Document {
    /// Strokes a renderer should actually draw
    pub fn drawable_strokes(&self) -> impl Iterator<Item = &PlacedStroke> {
        self.strokes.iter().filter(|s| s.role != StrokeRole::Marker)
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|l| l.words.len()).sum()
    }
}

fn serialize_points<S: Serializer>(points: &[Point], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(points.len()))?;
    for point in points {
        seq.serialize_element(&[point.x, point.y])?;
    }
    seq.end()
}

fn serialize_optional_points<S: Serializer>(
    points: &Option<Vec<Point>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match points {
        Some(points) => serialize_points(points, serializer),
        None => serializer.serialize_none(),
    }
}
