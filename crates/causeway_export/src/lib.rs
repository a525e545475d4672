//! Causeway Export
//!
//! Turns a [`Universe`](causeway_engine::Universe) into a [`Brain`]: property
//! weights, field summaries, a node/edge graph, capability tags and counts,
//! addressed by a hash of its content. Exporting is pure and recomputed on
//! every call.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod brain;
pub mod graph;

pub use brain::{to_brain, Brain, Stats, Supgram, ToBrain, FORMAT_VERSION, NEUTRAL_WEIGHT};
pub use graph::{Graph, GraphEdge, GraphNode};
