//! Character filtering ahead of hashing.
//!
//! Only letters (lower-cased) and digits survive; punctuation, whitespace and
//! control characters are dropped rather than replaced. Input is consumed in
//! fixed-size byte chunks so arbitrarily large sources never sit in memory
//! twice.

use std::io::{ErrorKind, Read};

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;

pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Chunked letter/digit filter over a byte source holding UTF-8 text.
pub struct CharacterNormalizer<R> {
    reader: R,
    chunk: Vec<u8>,
    carry: Vec<u8>,
    fold_accents: bool,
    finished: bool,
}

impl<R: Read> CharacterNormalizer<R> {
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk: vec![0u8; chunk_size.max(1)],
            carry: Vec::with_capacity(4),
            fold_accents: false,
            finished: false,
        }
    }

    /// Strip diacritics (NFD, combining marks removed) before filtering.
    pub fn fold_accents(mut self, fold: bool) -> Self {
        self.fold_accents = fold;
        self
    }

    /// Filter the next chunk into `out`.
    ///
    /// Returns `Ok(Some(n))` with the number of characters appended, which may
    /// be zero for a chunk of pure punctuation, and `Ok(None)` once the source
    /// is exhausted. A UTF-8 sequence split across two chunks is carried over
    /// and decoded with the following chunk.
    pub fn next_chunk(&mut self, out: &mut Vec<char>) -> Result<Option<usize>> {
        if self.finished {
            return Ok(None);
        }

        let read = loop {
            match self.reader.read(&mut self.chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };

        if read == 0 {
            self.finished = true;
            if !self.carry.is_empty() {
                tracing::warn!(
                    "dropping {} trailing bytes of an incomplete UTF-8 sequence",
                    self.carry.len()
                );
                self.carry.clear();
            }
            return Ok(None);
        }

        let mut bytes = std::mem::take(&mut self.carry);
        bytes.extend_from_slice(&self.chunk[..read]);

        let before = out.len();
        let mut rest: &[u8] = &bytes;
        let mut invalid = 0usize;
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    filter_into(text, self.fold_accents, out);
                    rest = &[];
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    filter_into(
                        std::str::from_utf8(valid).unwrap_or_default(),
                        self.fold_accents,
                        out,
                    );
                    match e.error_len() {
                        Some(bad) => {
                            invalid += bad;
                            rest = &after[bad..];
                        }
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }
        if invalid > 0 {
            tracing::warn!("skipped {} undecodable bytes in chunk", invalid);
        }
        self.carry.extend_from_slice(rest);

        Ok(Some(out.len() - before))
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Normalize an entire source into memory.
pub fn normalize_reader<R: Read>(
    reader: R,
    chunk_size: usize,
    fold_accents: bool,
) -> Result<Vec<char>> {
    let mut normalizer =
        CharacterNormalizer::with_chunk_size(reader, chunk_size).fold_accents(fold_accents);
    let mut text = Vec::new();
    while normalizer.next_chunk(&mut text)?.is_some() {}
    Ok(text)
}

/// Normalize an in-memory string.
pub fn normalize_str(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    filter_into(text, false, &mut out);
    out
}

/// Whether `c` is a decimal digit, kept verbatim and folded into numeric runs.
///
/// Superscripts, fractions and other numeric symbols are not digits.
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Alphabetic but not numeric, which excludes letterlike numerals such as `Ⅻ`.
pub fn is_letter(c: char) -> bool {
    c.is_alphabetic() && !c.is_numeric()
}

fn filter_into(text: &str, fold_accents: bool, out: &mut Vec<char>) {
    if fold_accents {
        for c in text.nfd().filter(|c| !is_combining_mark(*c)) {
            push_filtered(c, out);
        }
    } else {
        for c in text.chars() {
            push_filtered(c, out);
        }
    }
}

fn push_filtered(c: char, out: &mut Vec<char>) {
    if is_digit(c) {
        out.push(c);
    } else if is_letter(c) {
        // `İ` lower-cases to `i` plus a combining dot
        out.extend(c.to_lowercase().filter(|&l| is_letter(l) || is_digit(l)));
    }
}
