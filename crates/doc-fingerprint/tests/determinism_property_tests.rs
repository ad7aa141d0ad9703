mod fixtures;

use std::collections::BTreeSet;

use doc_fingerprint::hashing::{OfflineHasher, ShingleParams, StreamingHasher};
use doc_fingerprint::normalization::{is_digit, is_letter, normalize_reader, normalize_str};
use doc_fingerprint::scoring::compute_similarity;
use doc_fingerprint::sink::VecSink;
use doc_fingerprint::sketch::BoundedTopKSketch;
use doc_fingerprint::winnowing::select_robust;
use proptest::prelude::*;

proptest! {
    #[test]
    fn every_window_has_a_representative(
        hashes in prop::collection::vec(-50i32..50, 0..200),
        window in 1usize..12,
    ) {
        let selected: BTreeSet<usize> = select_robust(&fixtures::indexed(&hashes), window)
            .into_iter()
            .map(|hp| hp.position)
            .collect();
        if hashes.len() >= window {
            for start in 0..=hashes.len() - window {
                prop_assert!(
                    selected.range(start..start + window).next().is_some(),
                    "window at {} unrepresented", start
                );
            }
        }
    }

    #[test]
    fn robust_matches_reference_scan(
        hashes in prop::collection::vec(any::<i32>(), 0..150),
        window in 1usize..10,
    ) {
        let positions: Vec<usize> = select_robust(&fixtures::indexed(&hashes), window)
            .into_iter()
            .map(|hp| hp.position)
            .collect();
        prop_assert_eq!(positions, fixtures::naive_robust(&hashes, window));
    }

    #[test]
    fn similarity_is_symmetric(
        mut a in prop::collection::vec(-20i32..20, 0..60),
        mut b in prop::collection::vec(-20i32..20, 0..60),
    ) {
        a.sort_unstable();
        b.sort_unstable();
        prop_assert_eq!(
            compute_similarity(&a, &b).unwrap(),
            compute_similarity(&b, &a).unwrap()
        );
    }

    #[test]
    fn self_similarity_is_size(set in prop::collection::btree_set(any::<i32>(), 0..100)) {
        let s: Vec<i32> = set.into_iter().collect();
        prop_assert_eq!(compute_similarity(&s, &s).unwrap(), s.len());
    }

    #[test]
    fn sketch_holds_k_smallest(
        set in prop::collection::hash_set(any::<i32>(), 1..300),
        k in 0usize..40,
    ) {
        let values: Vec<i32> = set.into_iter().collect();
        let mut sketch = BoundedTopKSketch::new(k);
        for &v in &values {
            sketch.insert(v);
        }
        let mut sorted = values.clone();
        sorted.sort_unstable();
        let expected: Vec<i32> = sorted.into_iter().take(k).collect();
        prop_assert_eq!(sketch.take_signature().into_vec(), expected);
    }

    #[test]
    fn chunked_normalization_is_chunk_independent(s in ".{0,200}", chunk in 1usize..16) {
        let chunked = normalize_reader(s.as_bytes(), chunk, false).unwrap();
        prop_assert_eq!(chunked, normalize_str(&s));
    }

    #[test]
    fn normalized_text_has_no_separators(s in ".{0,200}") {
        for c in normalize_str(&s) {
            prop_assert!(!c.is_whitespace());
            prop_assert!(!c.is_ascii_punctuation());
            prop_assert!(!c.is_ascii_uppercase());
            prop_assert!(is_letter(c) || is_digit(c));
        }
    }

    #[test]
    fn streaming_and_offline_hashes_agree(s in "[a-z]{0,120}", len in 1usize..40) {
        let text: Vec<char> = s.chars().collect();
        prop_assume!(text.len() >= len);

        let mut offline = VecSink::new();
        OfflineHasher::new(ShingleParams::new(len, 1), 6)
            .hash_into(&text, &mut offline)
            .unwrap();

        let mut streaming = StreamingHasher::new(len, len + 1, VecSink::new()).unwrap();
        streaming.push_all(&text).unwrap();
        prop_assert_eq!(streaming.inner().records(), offline.records());
    }
}
