//! Document fingerprinting for near-duplicate and partial-copy detection.
//!
//! Raw text is filtered to lower-cased letters and digits, hashed into
//! fixed-width 32-bit shingle hashes, reduced to a compact signature by
//! winnowing or a bounded top-k sketch, and compared with a linear merge.
//! All state is per document; build one pipeline per worker.

pub mod config;
pub mod error;
pub mod hashing;
pub mod normalization;
pub mod pipeline;
pub mod scoring;
pub mod sink;
pub mod sketch;
pub mod types;
pub mod winnowing;

pub use config::{FingerprintConfig, WinnowMode};
pub use error::{FingerprintError, Result};
pub use pipeline::Fingerprinter;
pub use types::{HashPosition, Signature};
