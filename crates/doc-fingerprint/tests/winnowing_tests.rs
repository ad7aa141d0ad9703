mod fixtures;

use doc_fingerprint::sink::{HashSink, VecSink};
use doc_fingerprint::winnowing::*;

#[test]
fn robust_selects_rightmost_minimum_per_window() {
    let hashes = [77, 74, 42, 17, 98, 50, 17, 98, 8, 88, 67, 39, 77, 74, 42, 17, 98];
    let selected = select_robust(&fixtures::indexed(&hashes), 4);
    let positions: Vec<usize> = selected.iter().map(|hp| hp.position).collect();
    let values: Vec<i32> = selected.iter().map(|hp| hp.hash).collect();
    assert_eq!(positions, vec![3, 6, 8, 11, 15]);
    assert_eq!(values, vec![17, 17, 8, 39, 17]);
}

#[test]
fn robust_ties_prefer_rightmost() {
    let selected = select_robust(&fixtures::indexed(&[5, 5, 5]), 2);
    let positions: Vec<usize> = selected.iter().map(|hp| hp.position).collect();
    assert_eq!(positions, vec![1, 2]);
}

#[test]
fn robust_emits_each_selection_once() {
    let selected = select_robust(&fixtures::indexed(&[1, 9, 9, 9, 9]), 3);
    let positions: Vec<usize> = selected.iter().map(|hp| hp.position).collect();
    assert_eq!(positions, vec![0, 3, 4]);
}

#[test]
fn robust_sequence_shorter_than_window() {
    assert!(select_robust(&fixtures::indexed(&[3, 1]), 3).is_empty());
    assert!(select_robust(&[], 1).is_empty());
}

#[test]
fn robust_window_of_one_keeps_everything() {
    let hashes = [4, 4, 2, 7];
    let selected = select_robust(&fixtures::indexed(&hashes), 1);
    assert_eq!(selected.len(), hashes.len());
}

#[test]
fn robust_keeps_original_positions() {
    let mut winnow = WindowedWinnow::new(2, VecSink::new()).unwrap();
    winnow.accept(30, 0).unwrap();
    winnow.accept(10, 1).unwrap();
    // positions need not be contiguous after digit-run skips
    winnow.accept(20, 9).unwrap();
    winnow.finish().unwrap();
    assert_eq!(winnow.inner().positions(), vec![1]);
}

#[test]
fn windowed_stage_buffers_until_finish() {
    let mut winnow = WindowedWinnow::new(2, VecSink::new()).unwrap();
    for (i, h) in [3, 1, 2].into_iter().enumerate() {
        winnow.accept(h, i).unwrap();
    }
    assert!(winnow.inner().records().is_empty());
    winnow.finish().unwrap();
    assert_eq!(winnow.inner().hashes(), vec![1]);
}

#[test]
fn windowed_reset_discards_pending() {
    let mut winnow = WindowedWinnow::new(1, VecSink::new()).unwrap();
    winnow.accept(1, 0).unwrap();
    winnow.reset();
    winnow.finish().unwrap();
    assert!(winnow.into_inner().records().is_empty());
}

#[test]
fn zero_window_rejected() {
    assert!(WindowedWinnow::new(0, VecSink::new()).is_err());
    assert!(StreamingWinnow::new(0, VecSink::new()).is_err());
}

#[test]
fn streaming_emits_new_minima_and_threshold_hashes() {
    let mut winnow = StreamingWinnow::new(2, VecSink::new()).unwrap();
    for (i, h) in [10, 5, 7, 7, 7, 3].into_iter().enumerate() {
        winnow.accept(h, i).unwrap();
    }
    assert_eq!(winnow.inner().positions(), vec![0, 1, 2, 3, 5]);
    assert_eq!(winnow.inner().hashes(), vec![10, 5, 7, 7, 3]);
}

#[test]
fn streaming_reset_restores_initial_state() {
    let mut winnow = StreamingWinnow::new(2, VecSink::new()).unwrap();
    winnow.accept(1, 0).unwrap();
    winnow.reset();
    winnow.accept(50, 0).unwrap();
    // a fresh minimum of +inf means the first hash is always emitted
    assert_eq!(winnow.inner().hashes(), vec![50]);
}

#[test]
fn streaming_can_miss_a_shared_window() {
    // Both sequences end in the same three hashes. Robust winnowing picks the
    // same representative (5) inside the shared tail; the streaming heuristic
    // does not.
    let a = [0, 0, 7, 8, 5, 9, 6];
    let b = [5, 9, 5, 9, 6];
    let (tail_a, tail_b) = (4, 2);

    let streaming = |hashes: &[i32]| {
        let mut winnow = StreamingWinnow::new(3, VecSink::new()).unwrap();
        for (i, &h) in hashes.iter().enumerate() {
            winnow.accept(h, i).unwrap();
        }
        winnow.into_inner().into_records()
    };
    let in_tail = |records: Vec<doc_fingerprint::HashPosition>, from: usize| -> Vec<i32> {
        records
            .into_iter()
            .filter(|hp| hp.position >= from)
            .map(|hp| hp.hash)
            .collect()
    };

    let stream_a = in_tail(streaming(&a), tail_a);
    let stream_b = in_tail(streaming(&b), tail_b);
    assert!(stream_a.iter().all(|h| !stream_b.contains(h)));

    let robust_a = in_tail(select_robust(&fixtures::indexed(&a), 3), tail_a);
    let robust_b = in_tail(select_robust(&fixtures::indexed(&b), 3), tail_b);
    assert!(robust_a.iter().any(|h| robust_b.contains(h)));
}

#[test]
fn winnower_dispatches_on_mode() {
    let hashes = [10, 5, 7, 7, 7, 3];
    let run = |mode| {
        let mut winnower = Winnower::new(mode, 2, VecSink::new()).unwrap();
        for (i, &h) in hashes.iter().enumerate() {
            winnower.accept(h, i).unwrap();
        }
        winnower.finish().unwrap();
        winnower.into_inner().positions()
    };
    assert_eq!(run(WinnowMode::Streaming), vec![0, 1, 2, 3, 5]);
    assert_eq!(
        run(WinnowMode::Robust),
        fixtures::naive_robust(&hashes, 2)
    );
}
