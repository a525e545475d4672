//! Content fingerprints.
//!
//! Uses BLAKE3 for all hashing operations. Fingerprints render as 64
//! lowercase hex characters and serialize as that hex text.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// A BLAKE3 hash (256 bits / 32 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; 32]);

impl Hash {
    /// The number of bytes in a hash
    pub const LEN: usize = 32;

    /// The number of hex characters in a rendered hash
    pub const HEX_LEN: usize = 64;

    /// Compute BLAKE3 hash of data
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// The all-zero sentinel, used as the root of an empty history
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Whether this is the all-zero sentinel
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Get as bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string
    ///
    /// # Errors
    ///
    /// Returns error if hex is invalid or not 32 bytes
    pub fn from_hex(hex: &str) -> Result<Self, HashError> {
        let bytes = hex::decode(hex).map_err(|_| HashError::InvalidHex)?;
        if bytes.len() != Self::LEN {
            return Err(HashError::InvalidLength(bytes.len()));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Hash this hash together with another
    ///
    /// Computes: hash(self || other)
    #[must_use]
    pub fn chain(&self, other: &Hash) -> Self {
        let mut combined = [0u8; 64];
        combined[0..32].copy_from_slice(&self.0);
        combined[32..64].copy_from_slice(&other.0);
        Self::compute(&combined)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// Hash-related errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// Invalid hex encoding
    #[error("Invalid hex encoding")]
    InvalidHex,
    /// Invalid length (not 32 bytes)
    #[error("Invalid hash length: {0} (expected 32)")]
    InvalidLength(usize),
}
