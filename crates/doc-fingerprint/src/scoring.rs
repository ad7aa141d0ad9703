//! Signature comparison.
//!
//! Inputs must be ascending; the public entry points check that before
//! merging. Ratio scores use x10000 integer scaling.

use std::cmp::Ordering;

use crate::error::{FingerprintError, Result};

pub const SCORE_SCALE: u64 = 10000;

/// Fail with the index of the first value smaller than its predecessor.
pub fn ensure_sorted(values: &[i32]) -> Result<()> {
    match values.windows(2).position(|pair| pair[0] > pair[1]) {
        Some(i) => Err(FingerprintError::UnsortedSignature { index: i + 1 }),
        None => Ok(()),
    }
}

/// Raw number of values the two ascending signatures share.
pub fn compute_similarity(a: &[i32], b: &[i32]) -> Result<usize> {
    ensure_sorted(a)?;
    ensure_sorted(b)?;
    Ok(merge_count(a, b))
}

/// Shared values over all distinct slots, x10000. Two empty inputs score 0.
pub fn resemblance(a: &[i32], b: &[i32]) -> Result<u32> {
    let common = compute_similarity(a, b)?;
    let union = a.len() + b.len() - common;
    Ok(scaled_ratio(common, union))
}

/// Fraction of `a` found in `b`, x10000. An empty `a` scores 0.
pub fn containment(a: &[i32], b: &[i32]) -> Result<u32> {
    let common = compute_similarity(a, b)?;
    Ok(scaled_ratio(common, a.len()))
}

/// Two-pointer merge over ascending inputs.
pub(crate) fn merge_count(a: &[i32], b: &[i32]) -> usize {
    let (mut i, mut j) = (0, 0);
    let mut common = 0;
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                common += 1;
                i += 1;
                j += 1;
            }
        }
    }
    common
}

fn scaled_ratio(numerator: usize, denominator: usize) -> u32 {
    if denominator == 0 {
        return 0;
    }
    ((numerator as u64 * SCORE_SCALE) / denominator as u64) as u32
}
