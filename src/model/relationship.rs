//! Typed, weighted, directed relationships between nodes.

use super::types::RelationType;
use serde::{Deserialize, Serialize};

/// A directed edge between two nodes.
///
/// Many relationships may connect the same pair of nodes (e.g. a file that
/// both imports and calls into another). The weight is a non-negative
/// strength indicator used by traversal scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Unique identifier within the graph
    pub id: String,
    /// Source node id
    pub from: String,
    /// Target node id
    pub to: String,
    /// Kind of relationship
    pub rel_type: RelationType,
    /// Non-negative strength
    pub weight: f64,
}

impl Relationship {
    /// Create a relationship. Negative weights are clamped to zero.
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        rel_type: RelationType,
        weight: f64,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            rel_type,
            weight: weight.max(0.0),
        }
    }

    /// Whether the given node id is either endpoint.
    pub fn touches(&self, node_id: &str) -> bool {
        self.from == node_id || self.to == node_id
    }

    /// The opposite endpoint, if `node_id` is one of the two.
    pub fn other_end(&self, node_id: &str) -> Option<&str> {
        if self.from == node_id {
            Some(&self.to)
        } else if self.to == node_id {
            Some(&self.from)
        } else {
            None
        }
    }
}
