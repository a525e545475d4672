//! Capability tags advertised by exported graphs.

use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A capability tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CapabilityTag {
    /// The artifact encodes named transitions between states
    StateTransitions,

    /// The artifact carries a merkle commitment of its history
    MerkleHistory,

    /// The artifact belongs to a domain
    Domain(String),

    /// A constraint was declared under this name
    Constraint(String),
}

impl CapabilityTag {
    /// Parse a rendered tag back into its kind
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "state_transitions" => Some(Self::StateTransitions),
            "merkle_history" => Some(Self::MerkleHistory),
            _ => {
                if let Some(domain) = tag.strip_prefix("domain_") {
                    Some(Self::Domain(domain.to_string()))
                } else {
                    tag.strip_prefix("constraint_")
                        .map(|name| Self::Constraint(name.to_string()))
                }
            }
        }
    }
}

impl fmt::Display for CapabilityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StateTransitions => write!(f, "state_transitions"),
            Self::MerkleHistory => write!(f, "merkle_history"),
            Self::Domain(domain) => write!(f, "domain_{domain}"),
            Self::Constraint(name) => write!(f, "constraint_{name}"),
        }
    }
}

impl Serialize for CapabilityTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CapabilityTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Self::parse(&tag)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown capability tag: {tag}")))
    }
}

/// An ordered, duplicate-free set of capability tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet {
    tags: IndexSet<CapabilityTag>,
}

impl CapabilitySet {
    /// Create a new empty capability set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The tags every export carries for a domain
    #[must_use]
    pub fn base(domain: &str) -> Self {
        let mut set = Self::new();
        set.grant(CapabilityTag::StateTransitions);
        set.grant(CapabilityTag::MerkleHistory);
        set.grant(CapabilityTag::Domain(domain.to_string()));
        set
    }

    /// Add a tag; returns false if it was already present
    pub fn grant(&mut self, tag: CapabilityTag) -> bool {
        self.tags.insert(tag)
    }

    /// Check if a specific tag is present
    #[must_use]
    pub fn has(&self, tag: &CapabilityTag) -> bool {
        self.tags.contains(tag)
    }

    /// Check by rendered name, e.g. `domain_core`
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.to_string() == name)
    }

    /// Get the number of tags
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate over tags in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &CapabilityTag> {
        self.tags.iter()
    }
}
