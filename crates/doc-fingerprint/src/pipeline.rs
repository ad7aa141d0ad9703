//! End-to-end pipelines: normalizer, hasher, selection, sink.
//!
//! A [`Fingerprinter`] only holds configuration. Each call builds fresh
//! per-document stages, so one instance can serve a worker for any number of
//! documents.

use std::io::Read;

use crate::config::FingerprintConfig;
use crate::error::Result;
use crate::hashing::{OfflineHasher, StreamingHasher};
use crate::normalization::{normalize_reader, CharacterNormalizer};
use crate::sink::{HashSink, VecSink};
use crate::sketch::BoundedTopKSketch;
use crate::types::Signature;
use crate::winnowing::Winnower;

#[derive(Clone, Debug)]
pub struct Fingerprinter {
    config: FingerprintConfig,
}

impl Fingerprinter {
    pub fn new(config: FingerprintConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FingerprintConfig {
        &self.config
    }

    /// Normalize the whole source into memory.
    pub fn normalize<R: Read>(&self, reader: R) -> Result<Vec<char>> {
        normalize_reader(reader, self.config.chunk_size, self.config.fold_accents)
    }

    /// Hash a document with the offline hasher, winnow it, and deliver the
    /// selected pairs to `sink`, which is finished afterwards.
    ///
    /// Returns the number of hashes the hasher produced before winnowing.
    pub fn hash_document<R: Read, S: HashSink + ?Sized>(
        &self,
        reader: R,
        sink: &mut S,
    ) -> Result<usize> {
        let text = self.normalize(reader)?;
        self.hash_text(&text, sink)
    }

    /// [`Self::hash_document`] over already-normalized text.
    pub fn hash_text<S: HashSink + ?Sized>(&self, text: &[char], sink: &mut S) -> Result<usize> {
        let hasher = OfflineHasher::new(self.config.shingle_params(), self.config.min_digit_run);
        let params = hasher.effective_params(text.len());
        let mut winnower = Winnower::new(self.config.strategy, params.window, sink)?;
        let produced = hasher.hash_into(text, &mut winnower)?;
        winnower.finish()?;
        tracing::debug!(
            "document of {} chars produced {} hashes ({:?} winnowing)",
            text.len(),
            produced,
            winnower.mode()
        );
        Ok(produced)
    }

    /// Chunked normalizer feeding the streaming hasher; the text is never
    /// materialized. Returns the number of normalized characters consumed.
    pub fn stream_document<R: Read, S: HashSink + ?Sized>(
        &self,
        reader: R,
        sink: &mut S,
    ) -> Result<usize> {
        let winnower = Winnower::new(self.config.strategy, self.config.window, sink)?;
        let mut hasher = StreamingHasher::new(
            self.config.substring_len,
            self.config.stream_capacity,
            winnower,
        )?;
        let mut normalizer = CharacterNormalizer::with_chunk_size(reader, self.config.chunk_size)
            .fold_accents(self.config.fold_accents);

        let mut chunk = Vec::with_capacity(self.config.chunk_size);
        while let Some(filtered) = normalizer.next_chunk(&mut chunk)? {
            if filtered > 0 {
                hasher.push_all(&chunk)?;
            }
            chunk.clear();
        }
        hasher.finish()?;
        tracing::debug!("streamed {} normalized chars", hasher.position());
        Ok(hasher.position())
    }

    /// Ascending signature of the winnowed hashes.
    pub fn winnowed_signature<R: Read>(&self, reader: R) -> Result<Signature> {
        let mut sink = VecSink::new();
        self.hash_document(reader, &mut sink)?;
        Ok(Signature::from_unsorted(sink.hashes()))
    }

    /// Top-k sketch over every shingle hash of the document.
    pub fn sketch<R: Read>(&self, reader: R) -> Result<Signature> {
        let text = self.normalize(reader)?;
        let mut sketch = if self.config.distinct_sketch {
            BoundedTopKSketch::distinct(self.config.sketch_size)
        } else {
            BoundedTopKSketch::new(self.config.sketch_size)
        };
        OfflineHasher::new(self.config.shingle_params(), self.config.min_digit_run)
            .hash_into(&text, &mut sketch)?;
        Ok(sketch.take_signature())
    }

    pub fn sketch_str(&self, text: &str) -> Result<Signature> {
        self.sketch(text.as_bytes())
    }

    pub fn winnowed_signature_str(&self, text: &str) -> Result<Signature> {
        self.winnowed_signature(text.as_bytes())
    }
}
