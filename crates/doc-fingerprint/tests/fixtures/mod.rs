#![allow(dead_code)]

use doc_fingerprint::types::HashPosition;
use doc_fingerprint::FingerprintConfig;

/// Attach each hash's index as its position.
pub fn indexed(hashes: &[i32]) -> Vec<HashPosition> {
    hashes
        .iter()
        .enumerate()
        .map(|(i, &h)| HashPosition::new(h, i))
        .collect()
}

/// O(N * w) reference for robust winnowing: rightmost minimum per window.
pub fn naive_robust(hashes: &[i32], window: usize) -> Vec<usize> {
    let mut out = Vec::new();
    let mut last = None;
    if hashes.len() < window {
        return out;
    }
    for start in 0..=hashes.len() - window {
        let mut min = start;
        for j in start..start + window {
            if hashes[j] <= hashes[min] {
                min = j;
            }
        }
        if last != Some(min) {
            out.push(min);
            last = Some(min);
        }
    }
    out
}

/// Small shingles so short test documents still produce many hashes.
pub fn small_config() -> FingerprintConfig {
    FingerprintConfig {
        substring_len: 5,
        window: 4,
        sketch_size: 16,
        stream_capacity: 16,
        ..FingerprintConfig::default()
    }
}

pub const ARTICLE: &str = "Winnowing selects a subset of the hashes of a document so that \
    every sufficiently long shared passage is detected. The guarantee holds for any \
    passage at least as long as the window plus the shingle length, regardless of \
    where the passage appears in either document.";

pub const UNRELATED: &str = "Quarterly revenue grew on the strength of hardware sales, \
    while the services division reported flat subscriptions and rising churn among \
    small business customers across every region.";

/// `ARTICLE` with an unrelated preamble and a different ending.
pub fn article_reused() -> String {
    format!(
        "Editorial note, republished with permission. {} Comments are closed.",
        ARTICLE
    )
}
