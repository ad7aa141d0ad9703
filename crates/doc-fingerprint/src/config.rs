use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FingerprintError, Result};
use crate::hashing::{ShingleParams, DEFAULT_MIN_DIGIT_RUN};
use crate::normalization::DEFAULT_CHUNK_SIZE;

pub use crate::winnowing::WinnowMode;

/// Tunables for one fingerprinting pipeline, loadable from TOML.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Characters per shingle (L).
    pub substring_len: usize,
    /// Winnowing window in hashes (w).
    pub window: usize,
    /// Digit-run length at which a run is hashed as one shingle (D).
    pub min_digit_run: usize,
    /// Capacity of the top-k sketch (k).
    pub sketch_size: usize,
    pub strategy: WinnowMode,
    /// Bytes read from the source per normalizer call.
    pub chunk_size: usize,
    /// Circular buffer size for the streaming hasher; must exceed `substring_len`
    /// whatever the winnowing strategy, since `stream_document` always uses it.
    pub stream_capacity: usize,
    pub fold_accents: bool,
    /// Keep only distinct hashes in the top-k sketch.
    pub distinct_sketch: bool,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            substring_len: 30,
            window: 29,
            min_digit_run: DEFAULT_MIN_DIGIT_RUN,
            sketch_size: 128,
            strategy: WinnowMode::Robust,
            chunk_size: DEFAULT_CHUNK_SIZE,
            stream_capacity: 256,
            fold_accents: false,
            distinct_sketch: false,
        }
    }
}

impl FingerprintConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_toml_str(&std::fs::read_to_string(path)?)?;
        tracing::debug!("loaded fingerprint config from {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| FingerprintError::Serialization(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.substring_len == 0 {
            return Err(FingerprintError::config("substring_len", "must be at least 1"));
        }
        if self.window == 0 {
            return Err(FingerprintError::config("window", "must be at least 1"));
        }
        if self.min_digit_run == 0 {
            return Err(FingerprintError::config("min_digit_run", "must be at least 1"));
        }
        if self.chunk_size == 0 {
            return Err(FingerprintError::config("chunk_size", "must be at least 1"));
        }
        if self.stream_capacity <= self.substring_len {
            return Err(FingerprintError::config(
                "stream_capacity",
                format!(
                    "{} does not exceed substring_len {}",
                    self.stream_capacity, self.substring_len
                ),
            ));
        }
        Ok(())
    }

    pub fn shingle_params(&self) -> ShingleParams {
        ShingleParams::new(self.substring_len, self.window)
    }
}
