//! Append-only transition history.
//!
//! Each entry records by-value snapshots of both endpoint states as they were
//! when the transition was applied. The fingerprint is computed from those
//! snapshots, so replaying the same history always reproduces it.

use crate::universe::Properties;
use causeway_core::{
    merkle_root, CanonicalEncode, CoreError, CoreResult, Hash, LogicalTime, MerkleTree, Timestamp,
};
use serde::{Deserialize, Serialize};

/// A state's properties captured at apply time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// State name
    pub name: String,
    /// Properties in declaration order
    pub properties: Properties,
}

impl StateSnapshot {
    /// Capture a state by value
    #[must_use]
    pub fn capture(name: &str, properties: &Properties) -> Self {
        Self {
            name: name.to_string(),
            properties: properties.clone(),
        }
    }
}

impl CanonicalEncode for StateSnapshot {}

/// Fingerprint of applying `transition` between two snapshots
#[must_use]
pub fn transition_fingerprint(from: &StateSnapshot, to: &StateSnapshot, transition: &str) -> Hash {
    (from, to, transition).fingerprint()
}

/// The fields of an entry that its merkle leaf commits to
#[derive(Serialize)]
struct Commitment<'a> {
    sequence: LogicalTime,
    transition: &'a str,
    from: &'a str,
    to: &'a str,
    fingerprint: &'a Hash,
}

impl CanonicalEncode for Commitment<'_> {}

/// One applied transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Position in the history, starting at T1
    pub sequence: LogicalTime,
    /// Transition name
    pub transition: String,
    /// Source state name
    pub from: String,
    /// Target state name
    pub to: String,
    /// Content fingerprint of the transition
    pub fingerprint: Hash,
    /// Wall clock time of application (not committed)
    pub timestamp: Timestamp,
    /// Source state at apply time
    pub from_snapshot: StateSnapshot,
    /// Target state at apply time
    pub to_snapshot: StateSnapshot,
    /// Merkle leaf for this entry
    pub commitment: Hash,
}

impl HistoryEntry {
    fn commit(&self) -> Hash {
        Commitment {
            sequence: self.sequence,
            transition: &self.transition,
            from: &self.from,
            to: &self.to,
            fingerprint: &self.fingerprint,
        }
        .fingerprint()
    }
}

/// Ordered, append-only list of applied transitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
    clock: LogicalTime,
}

impl History {
    /// Create an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry for a transition between two snapshots
    pub(crate) fn append(
        &mut self,
        transition: &str,
        from_snapshot: StateSnapshot,
        to_snapshot: StateSnapshot,
    ) -> &HistoryEntry {
        self.clock = self.clock.incremented();
        let fingerprint = transition_fingerprint(&from_snapshot, &to_snapshot, transition);
        let mut entry = HistoryEntry {
            sequence: self.clock,
            transition: transition.to_string(),
            from: from_snapshot.name.clone(),
            to: to_snapshot.name.clone(),
            fingerprint,
            timestamp: Timestamp::now(),
            from_snapshot,
            to_snapshot,
            commitment: Hash::zero(),
        };
        entry.commitment = entry.commit();
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// All entries in application order
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entry at a zero-based position
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Most recent entry
    #[must_use]
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been applied
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Merkle leaves, one per entry
    #[must_use]
    pub fn leaves(&self) -> Vec<Hash> {
        self.entries.iter().map(|e| e.commitment).collect()
    }

    /// Merkle root of the history; all zeros when empty
    #[must_use]
    pub fn merkle_root(&self) -> Hash {
        merkle_root(&self.leaves())
    }

    /// Full merkle tree of the history
    #[must_use]
    pub fn merkle_tree(&self) -> MerkleTree {
        MerkleTree::build(&self.leaves())
    }

    /// Recompute every fingerprint and leaf from the recorded snapshots
    ///
    /// # Errors
    ///
    /// Returns the first position whose recorded hashes do not match
    pub fn verify(&self) -> CoreResult<()> {
        for (position, entry) in self.entries.iter().enumerate() {
            let expected = position as u64 + 1;
            if entry.sequence.as_u64() != expected {
                return Err(CoreError::Validation {
                    field: "sequence".to_string(),
                    reason: format!(
                        "entry {position} has sequence {} (expected T{expected})",
                        entry.sequence
                    ),
                });
            }

            let fingerprint =
                transition_fingerprint(&entry.from_snapshot, &entry.to_snapshot, &entry.transition);
            if fingerprint != entry.fingerprint {
                return Err(CoreError::FingerprintMismatch {
                    position,
                    expected: entry.fingerprint.to_hex(),
                    actual: fingerprint.to_hex(),
                });
            }

            let commitment = entry.commit();
            if commitment != entry.commitment {
                return Err(CoreError::FingerprintMismatch {
                    position,
                    expected: entry.commitment.to_hex(),
                    actual: commitment.to_hex(),
                });
            }
        }
        Ok(())
    }
}
