//! Knowledge nodes: one source artifact with structural and semantic
//! metadata, owned by the generator and read-only to the query engine.

use super::types::{NodeType, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Structural metadata extracted from the artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Programming language, if detected
    pub language: Option<String>,
    /// Lines of code
    pub lines_of_code: Option<u64>,
    /// Cyclomatic complexity
    pub complexity: Option<f64>,
    /// Maintainability index
    pub maintainability: Option<f64>,
    /// Exported symbol names
    pub exports: Vec<String>,
    /// Imported symbol names
    pub imports: Vec<String>,
    /// Extracted documentation text
    pub documentation: Option<String>,
}

/// One operation (function/method) the artifact exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Operation name
    pub name: String,
    /// Number of inputs (parameters)
    pub inputs: u32,
    /// Number of outputs (return values)
    pub outputs: u32,
}

/// Data-flow summary of the artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataFlow {
    /// Names of data inputs
    pub inputs: Vec<String>,
    /// Names of data outputs
    pub outputs: Vec<String>,
    /// Transformations applied between inputs and outputs
    pub transforms: Vec<String>,
}

/// A design pattern detected in the artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedPattern {
    /// Pattern name (e.g. "singleton", "visitor")
    pub name: String,
    /// Detection confidence in `[0, 1]`
    pub confidence: f64,
}

/// Semantic metadata inferred by the generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSemantics {
    /// Short description of what the artifact is for
    pub purpose: String,
    /// Operations the artifact exposes
    pub operations: Vec<Operation>,
    /// Data-flow summary
    pub data_flow: DataFlow,
    /// Detected design patterns
    pub patterns: Vec<DetectedPattern>,
    /// Responsibilities attributed to the artifact
    pub responsibilities: Vec<String>,
}

/// A diagnostic the generator attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDiagnostic {
    /// Diagnostic category (e.g. "parse-error", "missing-docs")
    pub kind: String,
    /// How severe the diagnostic is
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
}

/// A node in the knowledge graph.
///
/// The `id` is unique within its graph and immutable once created: updates
/// replace field values, never the id, so paths and caches held by external
/// consumers stay valid across graph versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeNode {
    /// Unique identifier within the graph
    pub id: String,
    /// Kind of source artifact
    pub node_type: NodeType,
    /// Artifact name (file stem, function name, ...)
    pub name: String,
    /// Project-relative path
    pub path: String,
    /// Absolute path on disk
    pub absolute_path: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification time (unix seconds)
    pub last_modified: u64,
    /// Structural metadata
    pub metadata: NodeMetadata,
    /// Semantic metadata
    pub semantics: NodeSemantics,
    /// Free-form tags
    pub tags: BTreeSet<String>,
    /// Diagnostics attached by the generator
    pub diagnostics: Vec<NodeDiagnostic>,
}

impl KnowledgeNode {
    /// Create a node with the required identity fields; metadata, semantics,
    /// tags, and diagnostics start empty.
    pub fn new(
        id: impl Into<String>,
        node_type: NodeType,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        let path = path.into();
        Self {
            id: id.into(),
            node_type,
            name: name.into(),
            absolute_path: path.clone(),
            path,
            size: 0,
            last_modified: 0,
            metadata: NodeMetadata::default(),
            semantics: NodeSemantics::default(),
            tags: BTreeSet::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Names of the operations this node exposes.
    pub fn operation_names(&self) -> BTreeSet<&str> {
        self.semantics
            .operations
            .iter()
            .map(|op| op.name.as_str())
            .collect()
    }
}
