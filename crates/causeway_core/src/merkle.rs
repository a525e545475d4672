//! Merkle-style commitment over an ordered sequence of hashes.
//!
//! Adjacent hashes are paired and hashed level by level. When a level has an
//! odd count its last hash is paired with itself. An empty sequence commits
//! to the all-zero sentinel.

use crate::hash::Hash;

/// Fold an ordered sequence of leaf hashes into a single root
#[must_use]
pub fn merkle_root(leaves: &[Hash]) -> Hash {
    MerkleTree::build(leaves).root()
}

/// All levels of a Merkle fold, leaves first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<Hash>>,
}

impl MerkleTree {
    /// Build the tree from leaf hashes
    #[must_use]
    pub fn build(leaves: &[Hash]) -> Self {
        let mut levels = vec![leaves.to_vec()];
        while let Some(current) = levels.last() {
            if current.len() <= 1 {
                break;
            }
            let next = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => left.chain(right),
                    [odd] => odd.chain(odd),
                    _ => unreachable!("chunks(2) yields one or two items"),
                })
                .collect();
            levels.push(next);
        }
        Self { levels }
    }

    /// Root hash, or the zero sentinel for an empty tree
    #[must_use]
    pub fn root(&self) -> Hash {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or_else(Hash::zero)
    }

    /// Number of leaves
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Number of levels including the leaves
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Hashes on a given level (0 = leaves)
    #[must_use]
    pub fn level(&self, index: usize) -> Option<&[Hash]> {
        self.levels.get(index).map(Vec::as_slice)
    }
}
