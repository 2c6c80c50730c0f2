use phrasescout::search::find_offsets;
use phrasescout::{Document, PhraseSet, SearchConfig, SearchEngine};
use proptest::prelude::*;
use std::num::NonZeroUsize;

fn engine(document_split: usize, phrase_split: usize) -> SearchEngine {
    let config = SearchConfig {
        thread_count: NonZeroUsize::new(4).unwrap(),
        document_split_threshold: Some(document_split),
        phrase_split_threshold: Some(phrase_split),
        ..SearchConfig::default()
    };
    SearchEngine::new(&config).unwrap()
}

// Small alphabet so that phrases actually occur
fn body() -> impl Strategy<Value = String> {
    "[abé ]{0,60}"
}

fn phrase() -> impl Strategy<Value = String> {
    "[abé ]{1,3}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn split_depth_does_not_change_outcome(
        bodies in prop::collection::vec(body(), 0..12),
        phrases in prop::collection::vec(phrase(), 0..8),
        document_split in 1usize..6,
        phrase_split in 1usize..4,
    ) {
        let documents: Vec<Document> = bodies
            .iter()
            .enumerate()
            .map(|(i, b)| Document::new(format!("D{}", i), b.as_str()))
            .collect();
        let phrases = PhraseSet::new(phrases);

        let sequential = engine(usize::MAX, usize::MAX).search(&documents, &phrases).unwrap();
        let split = engine(document_split, phrase_split).search(&documents, &phrases).unwrap();
        prop_assert_eq!(sequential, split);
    }

    #[test]
    fn offsets_are_ordered_occurrences(text in body(), needle in phrase()) {
        let chars: Vec<char> = text.chars().collect();
        let needle_chars: Vec<char> = needle.chars().collect();
        let offsets = find_offsets(&text, &needle).unwrap();

        for &o in &offsets {
            prop_assert_eq!(&chars[o..o + needle_chars.len()], needle_chars.as_slice());
        }
        for pair in offsets.windows(2) {
            prop_assert!(pair[1] >= pair[0] + needle_chars.len());
        }
        prop_assert_eq!(offsets.is_empty(), !text.contains(needle.as_str()));
    }
}
