use std::io;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FingerprintError>;

#[derive(Error, Debug)]
pub enum FingerprintError {
    /// Reading the character source or writing a sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration for `{field}`: {message}")]
    InvalidConfig {
        field: &'static str,
        message: String,
    },

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The streaming hasher's circular buffer cannot hold its hashing window.
    #[error("circular buffer capacity {capacity} must exceed hashing window {window}")]
    BufferTooSmall { capacity: usize, window: usize },

    /// A signature handed to the scorer is not ascending at `index`.
    #[error("signature is not sorted ascending at index {index}")]
    UnsortedSignature { index: usize },

    #[error("invalid record stream: {0}")]
    InvalidRecord(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl FingerprintError {
    pub(crate) fn config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }
}
