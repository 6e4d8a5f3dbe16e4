//! The per-project knowledge graph snapshot.

use super::relationship::Relationship;
use super::node::KnowledgeNode;
use crate::error::{AtlasError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate statistics over a graph, recomputed on structural change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Average number of relationships per node
    pub average_connectivity: f64,
    /// Longest dependency chain observed by the generator
    pub max_depth: u32,
    /// Diagnostic kind -> occurrence count
    pub error_frequency: BTreeMap<String, u64>,
    /// Detected pattern name -> occurrence count
    pub pattern_frequency: BTreeMap<String, u64>,
}

/// The complete node/relationship state of one project.
///
/// Nodes and relationships are kept in insertion order; attribute scans
/// return matches in that order. `version` increases monotonically on every
/// structural change so consumers can detect staleness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    /// Graph identifier (one per project)
    pub id: String,
    /// Root path of the analyzed project
    pub project_path: String,
    /// Monotonic version, bumped on structural change
    pub version: u64,
    /// Nodes in insertion order
    pub nodes: Vec<KnowledgeNode>,
    /// Relationships in insertion order
    pub relationships: Vec<Relationship>,
    /// Aggregate statistics
    pub stats: GraphStats,
    /// Last update time (unix seconds)
    pub updated_at: u64,
}

impl KnowledgeGraph {
    /// Create an empty graph for a project.
    pub fn new(id: impl Into<String>, project_path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            project_path: project_path.into(),
            version: 1,
            nodes: Vec::new(),
            relationships: Vec::new(),
            stats: GraphStats::default(),
            updated_at: 0,
        }
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&KnowledgeNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look up a relationship by id.
    pub fn relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    /// Whether a node with the given id exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Add a node.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Validation`] if a node with the same id already
    /// exists; ids are immutable, so replacement goes through
    /// [`KnowledgeGraph::replace_node`].
    pub fn add_node(&mut self, node: KnowledgeNode) -> Result<()> {
        if self.contains_node(&node.id) {
            return Err(AtlasError::Validation {
                message: format!("duplicate node id: {}", node.id),
            });
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Replace the value of an existing node, keeping its id and position.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::NodeNotFound`] if no node has the given id, or
    /// [`AtlasError::Validation`] if the replacement carries a different id.
    pub fn replace_node(&mut self, node: KnowledgeNode) -> Result<()> {
        let slot = self
            .nodes
            .iter_mut()
            .find(|n| n.id == node.id)
            .ok_or_else(|| AtlasError::NodeNotFound {
                node_id: node.id.clone(),
            })?;
        *slot = node;
        Ok(())
    }

    /// Add a relationship.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::NodeNotFound`] if either endpoint does not name
    /// a node in this graph — dangling relationships are never stored.
    pub fn add_relationship(&mut self, rel: Relationship) -> Result<()> {
        for endpoint in [&rel.from, &rel.to] {
            if !self.contains_node(endpoint) {
                return Err(AtlasError::NodeNotFound {
                    node_id: endpoint.clone(),
                });
            }
        }
        self.relationships.push(rel);
        Ok(())
    }

    /// Bump the version and stamp the update time.
    pub fn touch(&mut self, updated_at: u64) {
        self.version += 1;
        self.updated_at = updated_at;
    }

    /// Recompute the statistics block from the current collections.
    ///
    /// `max_depth` is generator-owned and left untouched.
    pub fn recompute_stats(&mut self) {
        self.stats.average_connectivity = if self.nodes.is_empty() {
            0.0
        } else {
            self.relationships.len() as f64 / self.nodes.len() as f64
        };

        let mut errors: BTreeMap<String, u64> = BTreeMap::new();
        let mut patterns: BTreeMap<String, u64> = BTreeMap::new();
        for node in &self.nodes {
            for diag in &node.diagnostics {
                *errors.entry(diag.kind.clone()).or_default() += 1;
            }
            for pattern in &node.semantics.patterns {
                *patterns.entry(pattern.name.clone()).or_default() += 1;
            }
        }
        self.stats.error_frequency = errors;
        self.stats.pattern_frequency = patterns;
    }
}
