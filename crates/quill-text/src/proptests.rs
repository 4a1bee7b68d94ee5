use super::*;
use proptest::prelude::*;
use quill_core::SystemSource;

fn phrase_system() -> System {
    let strokes = vec![vec![[0.0, 0.0], [1.0, 0.0]]];
    System::from_source(SystemSource::empty().with_phrase("can not", strokes)).unwrap()
}

// Property: cleaned text is lowercase, single-spaced and trimmed
proptest! {
    #[test]
    fn prop_clean_is_tidy(s in "[ -~\t\n]*") {
        let cleaned = clean(&s);
        prop_assert!(!cleaned.starts_with(' ') && !cleaned.ends_with(' '));
        prop_assert!(!cleaned.contains("  "));
        prop_assert!(!cleaned.chars().any(|c| c.is_ascii_uppercase()));
        prop_assert!(!cleaned.contains('\''));
    }
}

// Property: cleaning twice changes nothing
proptest! {
    #[test]
    fn prop_clean_idempotent(s in "[ -~]*") {
        let once = clean(&s);
        prop_assert_eq!(clean(&once), once);
    }
}

// Property: every digit and punctuation mark ends up as its own word
proptest! {
    #[test]
    fn prop_punctuation_isolated(s in "[a-z0-9.,!?;: ]*") {
        for word in clean(&s).split(' ') {
            let isolated = word.chars().any(|c| c.is_ascii_digit() || c.is_ascii_punctuation());
            prop_assert!(!isolated || word.chars().count() == 1, "word {:?}", word);
        }
    }
}

// Property: a phrase glued to letters on either side never matches
proptest! {
    #[test]
    fn prop_phrase_never_mid_word(prefix in "[a-z]{0,4}", suffix in "[a-z]{0,4}") {
        prop_assume!(!prefix.is_empty() || !suffix.is_empty());
        let system = phrase_system();
        let text = format!("{prefix}can not{suffix}");
        let out = RuleNormalizer::new()
            .normalize(&text, &system, &Selection::All, &RenderFlags::default())
            .unwrap();
        prop_assert!(out.phrase_queue.is_empty());
        prop_assert!(!out.text().contains(PLACEHOLDER));
    }
}

// Property: every placeholder in the output has exactly one queued phrase
proptest! {
    #[test]
    fn prop_queue_matches_placeholders(words in prop::collection::vec("(can|not|x|can not)", 0..12)) {
        let system = phrase_system();
        let text = words.join(" ");
        let out = RuleNormalizer::new()
            .normalize(&text, &system, &Selection::All, &RenderFlags::default())
            .unwrap();
        let placeholders = out.words().filter(|w| *w == PLACEHOLDER.to_string()).count();
        prop_assert_eq!(placeholders, out.phrase_queue.len());
    }
}
