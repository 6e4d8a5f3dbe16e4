//! Core data model: nodes, relationships, and the per-project graph.
//!
//! This module defines the fundamental building blocks:
//! - [`KnowledgeNode`]: one source artifact with structural and semantic metadata
//! - [`Relationship`]: a typed, weighted, directed edge between nodes
//! - [`KnowledgeGraph`]: the complete snapshot persisted per project

mod types;
mod node;
mod relationship;
mod graph;

pub use types::{Direction, NodeType, RelationType, Severity};
pub use node::{
    DataFlow, DetectedPattern, KnowledgeNode, NodeDiagnostic, NodeMetadata, NodeSemantics,
    Operation,
};
pub use relationship::Relationship;
pub use graph::{GraphStats, KnowledgeGraph};
