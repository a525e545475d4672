//! Node/edge view of a universe.

use causeway_engine::{Properties, Universe};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// `n{index}` in state declaration order
    pub id: String,
    /// State name
    pub label: String,
    /// State properties
    pub properties: Properties,
}

/// One declared transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// `e{index}` in transition declaration order
    pub id: String,
    /// Transition name
    pub label: String,
    /// Source node id; null when the source state is not declared
    pub from: Option<String>,
    /// Target node id; null when the target state is not declared
    pub to: Option<String>,
}

/// States as nodes, transitions as edges
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// Nodes
    pub nodes: Vec<GraphNode>,
    /// Edges
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    /// Build the graph of a universe
    ///
    /// Every transition becomes an edge. An endpoint that is not a declared
    /// state has no node id.
    #[must_use]
    pub fn build(universe: &Universe) -> Self {
        let nodes: Vec<GraphNode> = universe
            .states()
            .iter()
            .enumerate()
            .map(|(index, (name, properties))| GraphNode {
                id: format!("n{index}"),
                label: name.clone(),
                properties: properties.clone(),
            })
            .collect();

        let ids: IndexMap<&str, &str> = nodes
            .iter()
            .map(|node| (node.label.as_str(), node.id.as_str()))
            .collect();
        let node_id = |state: &str| ids.get(state).map(|id| (*id).to_string());

        let edges = universe
            .transitions()
            .iter()
            .enumerate()
            .map(|(index, (name, record))| {
                let from = node_id(&record.from);
                let to = node_id(&record.to);
                if from.is_none() || to.is_none() {
                    warn!(
                        transition = %name,
                        from = %record.from,
                        to = %record.to,
                        "edge has an undeclared endpoint"
                    );
                }
                GraphEdge {
                    id: format!("e{index}"),
                    label: name.clone(),
                    from,
                    to,
                }
            })
            .collect();

        Self { nodes, edges }
    }

    /// Node by id
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Node by state name
    #[must_use]
    pub fn node_for(&self, state: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.label == state)
    }

    /// Edges leaving a node
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges
            .iter()
            .filter(move |edge| edge.from.as_deref() == Some(id))
    }
}
