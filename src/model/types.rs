//! Closed enums shared across the data model: node kinds, relationship
//! kinds, traversal direction, and diagnostic severity.

use serde::{Deserialize, Serialize};

/// Kind of source artifact a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Source code file
    File,
    /// Module, namespace, or package
    Module,
    /// Function, method, or procedure
    Function,
    /// Class, struct, or type definition
    Class,
    /// Interface, trait, or protocol
    Interface,
    /// Variable, constant, or field
    Variable,
    /// Type alias or primitive type
    Type,
    /// Catch-all for custom artifact kinds
    Generic,
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeType::File => write!(f, "file"),
            NodeType::Module => write!(f, "module"),
            NodeType::Function => write!(f, "function"),
            NodeType::Class => write!(f, "class"),
            NodeType::Interface => write!(f, "interface"),
            NodeType::Variable => write!(f, "variable"),
            NodeType::Type => write!(f, "type"),
            NodeType::Generic => write!(f, "generic"),
        }
    }
}

/// Kind of relationship between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelationType {
    /// Artifact A imports artifact B
    Imports,
    /// Artifact A re-exports symbols from artifact B
    Exports,
    /// Function A calls function B
    Calls,
    /// Class A extends/inherits from class B
    Extends,
    /// Class implements interface/trait
    Implements,
    /// Parent contains child artifact (file contains function)
    Contains,
    /// Generic usage relationship
    Uses,
    /// Generic reference
    References,
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationType::Imports => write!(f, "imports"),
            RelationType::Exports => write!(f, "exports"),
            RelationType::Calls => write!(f, "calls"),
            RelationType::Extends => write!(f, "extends"),
            RelationType::Implements => write!(f, "implements"),
            RelationType::Contains => write!(f, "contains"),
            RelationType::Uses => write!(f, "uses"),
            RelationType::References => write!(f, "references"),
        }
    }
}

/// Direction for relationship lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Relationships where the node is the source
    Outgoing,
    /// Relationships where the node is the target
    Incoming,
    /// Relationships where the node is either endpoint
    Both,
}

/// Severity of a diagnostic attached to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Informational note
    Info,
    /// Suspicious but not necessarily wrong
    Warning,
    /// Definite problem detected by the generator
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}
