//! Causeway Core Types
//!
//! This crate contains pure types and logic with no I/O.
//! Everything that ends up inside a fingerprint is encoded canonically.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod capability;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod id;
pub mod merkle;
pub mod time;
pub mod version;

// Re-exports
pub use capability::{CapabilitySet, CapabilityTag};
pub use encoding::CanonicalEncode;
pub use error::{CoreError, CoreResult};
pub use hash::{Hash, HashError};
pub use id::BrainId;
pub use merkle::{merkle_root, MerkleTree};
pub use time::{LogicalTime, Timestamp};
pub use version::{Version, VersionError};
