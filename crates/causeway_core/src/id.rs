//! Identifiers for exported artifacts.
//!
//! Ids are name-based UUIDs (v5) so the same content always gets the same id.

use crate::hash::Hash;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for brain ids
const BRAIN_NAMESPACE: Uuid = Uuid::from_bytes([
    0x6b, 0x1f, 0x3c, 0x52, 0x9a, 0x0e, 0x4d, 0x21, 0x8f, 0x47, 0x2c, 0xd0, 0x5e, 0x11, 0xa3, 0x7b,
]);

/// Brain identifier - derived from an export's content hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BrainId(Uuid);

impl BrainId {
    /// Derive the id for a domain and content hash
    #[must_use]
    pub fn derive(domain: &str, content: &Hash) -> Self {
        let mut name = Vec::with_capacity(domain.len() + 1 + Hash::LEN);
        name.extend_from_slice(domain.as_bytes());
        name.push(b':');
        name.extend_from_slice(content.as_bytes());
        Self(Uuid::new_v5(&BRAIN_NAMESPACE, &name))
    }

    /// Get as UUID
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for BrainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "brain_{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brain_id_deterministic() {
        let h = Hash::compute(b"content");
        assert_eq!(BrainId::derive("core", &h), BrainId::derive("core", &h));
    }

    #[test]
    fn test_brain_id_depends_on_domain_and_content() {
        let h = Hash::compute(b"content");
        let other = Hash::compute(b"other");
        assert_ne!(BrainId::derive("core", &h), BrainId::derive("edge", &h));
        assert_ne!(BrainId::derive("core", &h), BrainId::derive("core", &other));
    }

    #[test]
    fn test_brain_id_display() {
        let id = BrainId::derive("core", &Hash::zero());
        let s = id.to_string();
        assert!(s.starts_with("brain_"));
        assert_eq!(id.as_uuid().get_version_num(), 5);
    }
}
