//! End-to-end tests for the standard Quill pipeline

use quill::prelude::*;
use quill::{standard_pipeline, TieBreak};
use serde_json::Value;

/// A tiny system: a few letters, an "-ing" mode, one phrase, one rule
fn test_system() -> System {
    let source = SystemSource::empty()
        .with_glyph("g", vec![vec![[0.0, 0.0], [0.5, -1.0], [1.0, 0.0]]])
        .with_glyph("o", vec![vec![[0.0, 0.0], [0.3, 0.4], [0.6, 0.0]]])
        .with_glyph("i", vec![vec![[0.0, 0.0], [0.2, 0.5]], vec![[0.2, 0.9]]])
        .with_glyph("n", vec![vec![[0.0, 0.0], [0.8, 0.0]]])
        .with_glyph("t", vec![vec![[0.0, 0.0], [0.0, 1.2]]])
        .with_glyph("h", vec![vec![[0.0, 0.0], [0.4, 0.8]]])
        .with_glyph("e", vec![vec![[0.0, 0.0], [0.2, 0.2]]])
        .with_glyph("p", vec![vec![[0.0, 0.0], [0.0, -1.0]]])
        .with_glyph("l", vec![vec![[0.0, 0.0], [0.0, 1.5]]])
        .with_glyph(".", vec![vec![[0.0, 0.0]]])
        .with_mode("ing", r"ing\b", vec![vec![[0.0, 0.0], [0.5, -0.3]]])
        .with_phrase("of the", vec![vec![[0.0, 0.0], [1.0, 1.0], [2.0, 0.0]]])
        .with_rule("drop-th", "th", "t");
    System::from_source(source).unwrap()
}

fn tokens_of(document: &Document) -> usize {
    document.drawable_strokes().count()
}

#[test]
fn test_render_full_sentence() {
    let system = test_system();
    let document = quill::render("Of the people, going.", &system).unwrap();

    let words: Vec<&str> = document.lines[0]
        .words
        .iter()
        .map(|w| w.text.as_str())
        .collect();
    assert_eq!(words, ["of the", "people", ",", "going", "."]);
    assert_eq!(document.pages, 1);

    // ',' has no glyph
    assert_eq!(
        document.warnings,
        [Warning::UnmappedText {
            word: ",".into(),
            text: ",".into()
        }]
    );
    assert!(tokens_of(&document) > 0);
    assert!(document.bounds.is_some());
}

#[test]
fn test_mode_beats_letters() {
    let system = test_system();
    let pipeline = standard_pipeline().unwrap();
    let with_mode = pipeline
        .render(&RenderRequest::new("going"), &system, &LayoutParams::default())
        .unwrap();
    let without = pipeline
        .render(
            &RenderRequest::new("going").with_modes(Selection::none()),
            &system,
            &LayoutParams::default(),
        )
        .unwrap();

    // g, o, ing versus g, o, i (path and dot), n, g
    assert_eq!(with_mode.strokes.len(), 3);
    assert_eq!(without.strokes.len(), 6);
    assert!(without.warnings.is_empty());
}

#[test]
fn test_rules_follow_selection() {
    let system = test_system();
    let pipeline = standard_pipeline().unwrap();
    let params = LayoutParams::default();

    let ruled = pipeline
        .render(&RenderRequest::new("the"), &system, &params)
        .unwrap();
    let unruled = pipeline
        .render(
            &RenderRequest::new("the").with_rules(Selection::none()),
            &system,
            &params,
        )
        .unwrap();

    assert_eq!(ruled.lines[0].words[0].text, "te");
    assert_eq!(unruled.lines[0].words[0].text, "the");
}

#[test]
fn test_phrases_off_without_abbreviation() {
    let system = test_system();
    let request = RenderRequest::new("of the").with_flags(RenderFlags {
        abbreviate: false,
        ..RenderFlags::default()
    });
    let document = standard_pipeline()
        .unwrap()
        .render(&request, &system, &LayoutParams::default())
        .unwrap();

    let words: Vec<&str> = document.lines[0]
        .words
        .iter()
        .map(|w| w.text.as_str())
        .collect();
    assert_eq!(words, ["of", "te"]);
    // 'f' is not in the system
    assert!(document
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::UnmappedText { text, .. } if text == "f")));
}

#[test]
fn test_unknown_selection_warns() {
    let system = test_system();
    let request = RenderRequest::new("no").with_rules(Selection::only(["missing"]));
    let document = standard_pipeline()
        .unwrap()
        .render(&request, &system, &LayoutParams::default())
        .unwrap();

    assert_eq!(
        document.warnings,
        [Warning::UnknownRule {
            name: "missing".into()
        }]
    );
}

#[test]
fn test_hard_breaks_and_pagination() {
    let system = test_system();
    let request = RenderRequest::new("hello\nto\nto\nto\nto").with_flags(RenderFlags {
        hard_breaks: true,
        ..RenderFlags::default()
    });
    let params = LayoutParams::default().with_page(PageGeometry::with_margins(20.0, Some(4.0), 0.5));
    let document = standard_pipeline()
        .unwrap()
        .render(&request, &system, &params)
        .unwrap();

    assert_eq!(document.lines.len(), 5);
    assert!(document.pages > 1);
    for pair in document.lines.windows(2) {
        assert!(pair[1].page >= pair[0].page);
    }
}

#[test]
fn test_token_cache_is_used() {
    let system = test_system();
    let pipeline = standard_pipeline().unwrap();
    let request = RenderRequest::new("to go to");

    pipeline.render(&request, &system, &LayoutParams::default()).unwrap();
    pipeline.render(&request, &system, &LayoutParams::default()).unwrap();

    let stats = pipeline.token_cache_stats().unwrap();
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.hits, 4);
}

#[test]
fn test_process_exports_json() {
    let system = test_system();
    let bytes = standard_pipeline()
        .unwrap()
        .process(&RenderRequest::new("go"), &system, &LayoutParams::default())
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(value["pages"], 1);
    assert_eq!(value["strokes"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["strokes"][0]["samples"].as_array().map(Vec::len), Some(100));
}

#[test]
fn test_tie_break_option_loads() {
    let source = SystemSource::empty()
        .with_glyph("a", vec![vec![[0.0, 0.0], [1.0, 0.0]]])
        .with_options(quill::SystemOptions {
            tie_breaks: vec![TieBreak::PatternLength],
        });
    let system = System::from_source(source).unwrap();
    let document = quill::render("a", &system).unwrap();
    assert_eq!(document.word_count(), 1);
}

#[test]
fn test_empty_text() {
    let document = quill::render("   ", &test_system()).unwrap();
    assert!(document.lines.is_empty());
    assert_eq!(document.pages, 0);
    assert!(document.warnings.is_empty());
}

#[test]
fn test_rewritten_phrase_spelling_draws_the_phrase() {
    // "of te" is how "of the" reads once drop-th has run
    let system = test_system();
    let document = quill::render("of te", &system).unwrap();

    assert_eq!(document.lines[0].words.len(), 1);
    assert_eq!(document.lines[0].words[0].text, "of the");
    assert!(document.warnings.is_empty());
}
