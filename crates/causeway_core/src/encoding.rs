//! Canonical encoding for reproducible fingerprints.
//!
//! Uses postcard for byte-stable encoding. Two values that compare equal
//! always encode to the same bytes, so their fingerprints match.

use crate::hash::Hash;
use serde::Serialize;

/// Trait for canonical serialization
pub trait CanonicalEncode: Serialize {
    /// Encode to canonical bytes
    ///
    /// # Panics
    ///
    /// Postcard only fails for sequences of unknown length or a full
    /// fixed buffer. Neither happens when encoding owned values into a
    /// growable vector.
    fn encode(&self) -> Vec<u8> {
        postcard::to_allocvec(self).expect("encoding failed")
    }

    /// BLAKE3 fingerprint of the canonical encoding
    fn fingerprint(&self) -> Hash {
        Hash::compute(&self.encode())
    }
}

impl<T: CanonicalEncode + ?Sized> CanonicalEncode for &T {}

impl CanonicalEncode for str {}
impl CanonicalEncode for String {}
impl CanonicalEncode for f64 {}
impl<A: CanonicalEncode, B: CanonicalEncode> CanonicalEncode for (A, B) {}
impl<A: CanonicalEncode, B: CanonicalEncode, C: CanonicalEncode> CanonicalEncode for (A, B, C) {}
