use super::*;
use proptest::prelude::*;
use quill_core::geometry::{Stroke, TokenGeometry};
use quill_core::types::{Token, TokenSource};
use quill_core::PageGeometry;
use std::sync::Arc;

fn arb_point() -> impl Strategy<Value = Point> {
    (-5.0..5.0f64, -5.0..5.0f64).prop_map(|(x, y)| Point::new(x, y))
}

fn arb_token() -> impl Strategy<Value = Token> {
    prop::collection::vec(prop::collection::vec(arb_point(), 2..5), 1..3).prop_map(|strokes| {
        let strokes = strokes.into_iter().filter_map(Stroke::new).collect();
        Token {
            source: TokenSource::Glyph,
            key: "t".into(),
            text: "t".into(),
            geometry: Arc::new(TokenGeometry::new(strokes).unwrap_or_else(TokenGeometry::sentinel)),
        }
    })
}

fn arb_word() -> impl Strategy<Value = Word> {
    prop::collection::vec(arb_token(), 1..4).prop_map(|tokens| Word::new("w", tokens))
}

// Property: each token starts where the previous one left off
proptest! {
    #[test]
    fn prop_tokens_connect(word in arb_word(), scale in 0.1..4.0f64) {
        let assembled = assemble(&word, scale);
        let mut strokes = assembled.strokes.iter();
        let mut previous_exit: Option<Point> = None;

        for token in &word.tokens {
            let count = token.geometry.strokes().len();
            let placed: Vec<_> = strokes.by_ref().take(count).collect();
            if let (Some(exit), Some(first)) = (previous_exit, placed.first()) {
                prop_assert!((first.points[0] - exit).hypot() < 1e-6);
            }
            previous_exit = placed.last().and_then(|s| s.points.last().copied());
        }
    }
}

// Property: with a page width, only single oversized words overflow a line
proptest! {
    #[test]
    fn prop_lines_fit_available_width(
        words in prop::collection::vec(arb_word(), 1..12),
        width in 5.0..40.0f64,
    ) {
        let page = PageGeometry::with_margins(width, None, 1.0);
        let params = LayoutParams { page: Some(page), ..LayoutParams::default() };
        let document = layout(&[words], &params, &RenderFlags::default()).unwrap();
        let right_edge = width - 1.0;

        for line in &document.lines {
            if line.words.len() > 1 {
                let last = line.words.last().unwrap();
                prop_assert!(last.x + last.width <= right_edge + 1e-9);
            }
        }
    }
}

// Property: baselines strictly descend within a page
proptest! {
    #[test]
    fn prop_baselines_descend(paragraphs in prop::collection::vec(prop::collection::vec(arb_word(), 1..3), 1..8)) {
        let params = LayoutParams {
            page: Some(PageGeometry::letter()),
            ..LayoutParams::default()
        };
        let document = layout(&paragraphs, &params, &RenderFlags::default()).unwrap();

        for pair in document.lines.windows(2) {
            if pair[0].page == pair[1].page {
                prop_assert!(pair[1].baseline < pair[0].baseline);
            } else {
                prop_assert_eq!(pair[1].page, pair[0].page + 1);
            }
        }
    }
}

// Property: interpolation keeps its end points and sample count
proptest! {
    #[test]
    fn prop_interpolation_endpoints(points in prop::collection::vec(arb_point(), 2..8), samples in 2usize..64) {
        let curve = interpolate(&points, samples);
        prop_assert_eq!(curve.len(), samples);
        prop_assert_eq!(curve[0], points[0]);
        prop_assert_eq!(curve[samples - 1], points[points.len() - 1]);
    }
}
