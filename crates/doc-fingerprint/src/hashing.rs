//! Shingle hashing over normalized text.
//!
//! A shingle of length `len` starting at `i` hashes to
//! `sum(text[i + j] * 2^(len - 1 - j))` in wrapping 32-bit arithmetic. The
//! offline hasher sees the whole document and folds long digit runs into a
//! single shingle; the streaming hasher sees one character at a time and does
//! not.

use crate::error::{FingerprintError, Result};
use crate::normalization::is_digit;
use crate::sink::HashSink;

pub const HASH_BASE: i32 = 2;
pub const DEFAULT_MIN_DIGIT_RUN: usize = 6;

/// Hash one shingle. Overflow wraps.
pub fn shingle_hash(shingle: &[char]) -> i32 {
    shingle
        .iter()
        .fold(0i32, |acc, &c| acc.wrapping_mul(HASH_BASE).wrapping_add(c as i32))
}

/// Substring length and the winnowing window paired with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShingleParams {
    pub substring_len: usize,
    pub window: usize,
}

impl ShingleParams {
    pub fn new(substring_len: usize, window: usize) -> Self {
        Self {
            substring_len,
            window,
        }
    }

    /// Parameters to use for a document of `text_len` characters.
    ///
    /// Documents shorter than the substring length are hashed with
    /// `text_len / 3` characters per shingle and a window one shorter than
    /// that (never below 1).
    pub fn degrade_for(self, text_len: usize) -> Self {
        if text_len >= self.substring_len {
            return self;
        }
        let substring_len = text_len / 3;
        Self {
            substring_len,
            window: substring_len.saturating_sub(1).max(1),
        }
    }
}

/// Whole-buffer hasher with digit-run folding.
#[derive(Clone, Debug)]
pub struct OfflineHasher {
    params: ShingleParams,
    min_digit_run: usize,
}

impl OfflineHasher {
    pub fn new(params: ShingleParams, min_digit_run: usize) -> Self {
        Self {
            params,
            min_digit_run,
        }
    }

    pub fn params(&self) -> ShingleParams {
        self.params
    }

    /// Parameters actually used for a document of `text_len` characters.
    pub fn effective_params(&self, text_len: usize) -> ShingleParams {
        self.params.degrade_for(text_len)
    }

    /// Hash every shingle of `text` into `sink`, in position order.
    ///
    /// A run of at least `min_digit_run` digits starting at `i` is hashed as
    /// one shingle covering the run and the character after it; positions
    /// inside the run and the one right after it are then skipped. Returns the
    /// number of hashes emitted. Does not call [`HashSink::finish`].
    pub fn hash_into<S: HashSink + ?Sized>(&self, text: &[char], sink: &mut S) -> Result<usize> {
        let n = text.len();
        let params = self.effective_params(n);
        if params != self.params {
            tracing::warn!(
                "document of {} chars shorter than substring length {}, using {}",
                n,
                self.params.substring_len,
                params.substring_len
            );
        }

        let len = params.substring_len;
        if len == 0 {
            return Ok(0);
        }

        let mut emitted = 0;
        let mut i = 0;
        while i < n - len + 1 {
            let mut shingle_len = len;
            let mut skip = 0;
            if is_digit(text[i]) {
                let run = text[i..].iter().take_while(|&&c| is_digit(c)).count();
                if run >= self.min_digit_run {
                    shingle_len = (run + 1).min(n - i);
                    skip = run;
                }
            }
            sink.accept(shingle_hash(&text[i..i + shingle_len]), i)?;
            emitted += 1;
            i += 1 + skip;
        }

        tracing::debug!("hashed {} shingles from {} chars", emitted, n);
        Ok(emitted)
    }
}

/// Character-at-a-time hasher over a circular buffer.
///
/// The buffer capacity must exceed the hashing window, otherwise the oldest
/// character of the active window would be overwritten before it is hashed.
pub struct StreamingHasher<S> {
    buffer: Vec<char>,
    weights: Vec<i32>,
    position: usize,
    next: S,
}

impl<S: HashSink> StreamingHasher<S> {
    pub fn new(window: usize, capacity: usize, next: S) -> Result<Self> {
        if window == 0 {
            return Err(FingerprintError::config(
                "substring_len",
                "hashing window must be at least 1",
            ));
        }
        if capacity <= window {
            return Err(FingerprintError::BufferTooSmall { capacity, window });
        }

        let mut weights = vec![0i32; window];
        let mut weight = 1i32;
        for slot in weights.iter_mut().rev() {
            *slot = weight;
            weight = weight.wrapping_mul(HASH_BASE);
        }

        Ok(Self {
            buffer: vec!['\0'; capacity],
            weights,
            position: 0,
            next,
        })
    }

    /// Append one character, forwarding a hash once a full window is buffered.
    pub fn push(&mut self, c: char) -> Result<()> {
        let capacity = self.buffer.len();
        self.buffer[self.position % capacity] = c;
        self.position += 1;

        let window = self.weights.len();
        if self.position >= window {
            let start = self.position - window;
            let hash = self
                .weights
                .iter()
                .enumerate()
                .fold(0i32, |acc, (j, &weight)| {
                    let c = self.buffer[(start + j) % capacity];
                    acc.wrapping_add((c as i32).wrapping_mul(weight))
                });
            self.next.accept(hash, start)?;
        }
        Ok(())
    }

    pub fn push_all(&mut self, chars: &[char]) -> Result<()> {
        for &c in chars {
            self.push(c)?;
        }
        Ok(())
    }

    /// Characters seen since construction or the last reset.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn window(&self) -> usize {
        self.weights.len()
    }

    pub fn finish(&mut self) -> Result<()> {
        self.next.finish()
    }

    /// Forget the current document and reset every downstream stage.
    pub fn reset(&mut self) {
        self.position = 0;
        self.next.reset();
    }

    pub fn inner(&self) -> &S {
        &self.next
    }

    pub fn into_inner(self) -> S {
        self.next
    }
}
