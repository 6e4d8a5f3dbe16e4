//! Convenience constructors for common nodes and relationships.
//!
//! Generators and tests assemble graphs from these to avoid boilerplate;
//! relationship ids are minted as UUIDs so callers only name the
//! endpoints.

use crate::model::{KnowledgeNode, NodeType, RelationType, Relationship};
use uuid::Uuid;

/// Create a file node with its language set.
pub fn file_node(
    id: impl Into<String>,
    name: impl Into<String>,
    path: impl Into<String>,
    language: impl Into<String>,
) -> KnowledgeNode {
    let mut node = KnowledgeNode::new(id, NodeType::File, name, path);
    node.metadata.language = Some(language.into());
    node
}

/// Create a module node.
pub fn module_node(
    id: impl Into<String>,
    name: impl Into<String>,
    path: impl Into<String>,
) -> KnowledgeNode {
    KnowledgeNode::new(id, NodeType::Module, name, path)
}

/// Create a function node.
pub fn function_node(
    id: impl Into<String>,
    name: impl Into<String>,
    path: impl Into<String>,
) -> KnowledgeNode {
    KnowledgeNode::new(id, NodeType::Function, name, path)
}

/// Create a class node.
pub fn class_node(
    id: impl Into<String>,
    name: impl Into<String>,
    path: impl Into<String>,
) -> KnowledgeNode {
    KnowledgeNode::new(id, NodeType::Class, name, path)
}

/// Create a relationship with a fresh UUID id.
pub fn relate(
    from: impl Into<String>,
    to: impl Into<String>,
    rel_type: RelationType,
    weight: f64,
) -> Relationship {
    Relationship::new(Uuid::new_v4().to_string(), from, to, rel_type, weight)
}

/// `from` imports `to`, weight 1.
pub fn imports(from: impl Into<String>, to: impl Into<String>) -> Relationship {
    relate(from, to, RelationType::Imports, 1.0)
}

/// `from` calls `to`, weight 1.
pub fn calls(from: impl Into<String>, to: impl Into<String>) -> Relationship {
    relate(from, to, RelationType::Calls, 1.0)
}

/// `from` extends `to`, weight 1.
pub fn extends(from: impl Into<String>, to: impl Into<String>) -> Relationship {
    relate(from, to, RelationType::Extends, 1.0)
}

/// `from` contains `to`, weight 1.
pub fn contains(from: impl Into<String>, to: impl Into<String>) -> Relationship {
    relate(from, to, RelationType::Contains, 1.0)
}
