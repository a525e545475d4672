//! The exported brain: a weighted, content-addressed snapshot of a universe.

use crate::graph::{Graph, GraphEdge, GraphNode};
use causeway_core::{
    BrainId, CanonicalEncode, CapabilitySet, CapabilityTag, CoreError, CoreResult, Hash, Version,
};
use causeway_engine::{Universe, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Export format version
pub const FORMAT_VERSION: Version = Version::new(1, 0, 0);

/// Weight given to values that carry no magnitude
pub const NEUTRAL_WEIGHT: f64 = 0.5;

/// Field summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Supgram {
    /// Magnitude clamped to [0, 1]
    pub weight: f64,
    /// Vector length; 0 for non-vectors
    pub dimensions: usize,
}

/// Declaration counts and the history commitment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Declared states
    pub states: usize,
    /// Declared transitions
    pub transitions: usize,
    /// Declared constraints
    pub constraints: usize,
    /// Declared fields
    pub fields: usize,
    /// Declared proofs
    pub proofs: usize,
    /// Applied transitions
    pub history_length: usize,
    /// Merkle root of the history
    pub merkle_root: Hash,
}

/// Exported graph with weights, capabilities and statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    /// Content-derived id
    pub id: BrainId,
    /// Export format version
    pub version: Version,
    /// Domain the export was made for
    pub domain: String,
    /// Fingerprint of entries, nodes and edges
    pub content_hash: Hash,
    /// `state.property` weights
    pub entries: IndexMap<String, f64>,
    /// Per-field summaries
    pub supgrams: IndexMap<String, Supgram>,
    /// States and transitions
    pub graph: Graph,
    /// Advertised capabilities
    pub capabilities: CapabilitySet,
    /// Counts
    pub stats: Stats,
}

#[derive(Serialize)]
struct Content<'a> {
    entries: &'a IndexMap<String, f64>,
    nodes: &'a [GraphNode],
    edges: &'a [GraphEdge],
}

impl CanonicalEncode for Content<'_> {}

fn content_hash(entries: &IndexMap<String, f64>, graph: &Graph) -> Hash {
    Content {
        entries,
        nodes: &graph.nodes,
        edges: &graph.edges,
    }
    .fingerprint()
}

fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        NEUTRAL_WEIGHT
    } else {
        weight.abs().clamp(0.0, 1.0)
    }
}

fn entry_weight(value: &Value) -> f64 {
    match value {
        Value::Number(n) => clamp_weight(*n),
        _ => NEUTRAL_WEIGHT,
    }
}

fn supgram(value: &Value) -> Supgram {
    match (value.magnitude(), value) {
        (Some(magnitude), Value::Vector(items)) => Supgram {
            weight: clamp_weight(magnitude),
            dimensions: items.len(),
        },
        _ => Supgram {
            weight: NEUTRAL_WEIGHT,
            dimensions: 0,
        },
    }
}

/// Export a universe for a domain
#[must_use]
pub fn to_brain(universe: &Universe, domain: &str) -> Brain {
    let entries: IndexMap<String, f64> = universe
        .states()
        .iter()
        .flat_map(|(state, properties)| {
            properties
                .iter()
                .map(move |(name, value)| (format!("{state}.{name}"), entry_weight(value)))
        })
        .collect();

    let supgrams = universe
        .fields()
        .iter()
        .map(|(name, binding)| (name.clone(), supgram(&binding.value)))
        .collect();

    let graph = Graph::build(universe);

    let mut capabilities = CapabilitySet::base(domain);
    for name in universe.constraints().keys() {
        capabilities.grant(CapabilityTag::Constraint(name.clone()));
    }

    let stats = Stats {
        states: universe.states().len(),
        transitions: universe.transitions().len(),
        constraints: universe.constraints().len(),
        fields: universe.fields().len(),
        proofs: universe.proofs().len(),
        history_length: universe.history().len(),
        merkle_root: universe.merkle_root(),
    };

    let content_hash = content_hash(&entries, &graph);
    let id = BrainId::derive(domain, &content_hash);
    debug!(
        %id,
        domain,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "brain exported"
    );

    Brain {
        id,
        version: FORMAT_VERSION,
        domain: domain.to_string(),
        content_hash,
        entries,
        supgrams,
        graph,
        capabilities,
        stats,
    }
}

/// Export extension for [`Universe`]
pub trait ToBrain {
    /// Export for a domain
    fn to_brain(&self, domain: &str) -> Brain;
}

impl ToBrain for Universe {
    fn to_brain(&self, domain: &str) -> Brain {
        to_brain(self, domain)
    }
}

impl Brain {
    /// Pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON
    ///
    /// # Errors
    ///
    /// Returns error if the JSON does not describe a brain, or was written
    /// by an incompatible format version
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let brain: Self = serde_json::from_str(json)?;
        if !FORMAT_VERSION.is_compatible_with(&brain.version) {
            return Err(CoreError::Validation {
                field: "version".to_string(),
                reason: format!("format {} cannot read {}", FORMAT_VERSION, brain.version),
            });
        }
        Ok(brain)
    }

    /// Check that the content hash and id match the content
    ///
    /// # Errors
    ///
    /// Returns error if either was altered independently of the content
    pub fn verify(&self) -> CoreResult<()> {
        let actual = content_hash(&self.entries, &self.graph);
        if actual != self.content_hash {
            return Err(CoreError::Validation {
                field: "content_hash".to_string(),
                reason: format!("expected {}, computed {actual}", self.content_hash),
            });
        }
        if BrainId::derive(&self.domain, &actual) != self.id {
            return Err(CoreError::Validation {
                field: "id".to_string(),
                reason: format!("{} does not derive from the content hash", self.id),
            });
        }
        Ok(())
    }
}
