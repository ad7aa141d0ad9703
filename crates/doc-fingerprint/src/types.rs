use serde::{Deserialize, Serialize};

use crate::error::{FingerprintError, Result};
use crate::scoring;

/// A shingle hash and the offset of its first character in the normalized text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashPosition {
    pub hash: i32,
    pub position: usize,
}

impl HashPosition {
    pub fn new(hash: i32, position: usize) -> Self {
        Self { hash, position }
    }
}

/// An ascending sequence of hash values representing one document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i32>", into = "Vec<i32>")]
pub struct Signature(Vec<i32>);

impl Signature {
    /// Wrap hashes that are already ascending. Fails on the first inversion.
    pub fn from_sorted(hashes: Vec<i32>) -> Result<Self> {
        scoring::ensure_sorted(&hashes)?;
        Ok(Self(hashes))
    }

    /// Sort arbitrary hashes into a signature.
    pub fn from_unsorted(mut hashes: Vec<i32>) -> Self {
        hashes.sort_unstable();
        Self(hashes)
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<i32> {
        self.0
    }

    /// Number of hash values shared with `other` (raw intersection count).
    pub fn similarity(&self, other: &Signature) -> usize {
        scoring::merge_count(&self.0, &other.0)
    }

    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::ser::into_writer(self, &mut buf)
            .map_err(|e| FingerprintError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes, re-checking the ordering invariant.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ciborium::de::from_reader(bytes)
            .map_err(|e| FingerprintError::Serialization(e.to_string()))
    }
}

impl TryFrom<Vec<i32>> for Signature {
    type Error = FingerprintError;

    fn try_from(hashes: Vec<i32>) -> Result<Self> {
        Self::from_sorted(hashes)
    }
}

impl From<Signature> for Vec<i32> {
    fn from(signature: Signature) -> Self {
        signature.0
    }
}
