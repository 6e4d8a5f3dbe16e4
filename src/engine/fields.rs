//! Closed field-path dispatch for query conditions and sort keys.
//!
//! Dot-separated field paths resolve through an explicit accessor table
//! rather than reflection. The full node vocabulary:
//!
//! | Path | Value |
//! |---|---|
//! | `id`, `type`, `name`, `path`, `absolute_path` | string |
//! | `size`, `last_modified` | number |
//! | `tags` | string list |
//! | `metadata.language`, `metadata.documentation` | string (absent if unset) |
//! | `metadata.lines_of_code`, `metadata.complexity`, `metadata.maintainability` | number (absent if unset) |
//! | `metadata.exports`, `metadata.imports` | string list |
//! | `semantics.purpose` | string |
//! | `semantics.operations` | operation names, string list |
//! | `semantics.patterns` | pattern names, string list |
//! | `semantics.responsibilities` | string list |
//! | `semantics.data_flow.inputs`, `.outputs`, `.transforms` | string list |
//!
//! Relationship paths: `id`, `from`, `to`, `type` (string), `weight`
//! (number).
//!
//! Any other path resolves to [`FieldValue::Absent`]: `exists` is false and
//! every comparison fails closed.

use crate::model::{KnowledgeNode, Relationship};
use std::cmp::Ordering;

/// A resolved field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// String-valued field
    Str(String),
    /// Numeric field
    Num(f64),
    /// List-of-strings field
    List(Vec<String>),
    /// Unresolvable path or unset optional field
    Absent,
}

impl FieldValue {
    /// Whether the field resolved to a value.
    pub fn is_present(&self) -> bool {
        !matches!(self, FieldValue::Absent)
    }

    /// Numeric view, if the field is a number.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            FieldValue::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Canonical string form used by grouping and `distinct`.
    pub fn render(&self) -> Option<String> {
        match self {
            FieldValue::Str(s) => Some(s.clone()),
            FieldValue::Num(n) => Some(format!("{n}")),
            FieldValue::List(items) => Some(items.join(",")),
            FieldValue::Absent => None,
        }
    }
}

fn opt_str(value: &Option<String>) -> FieldValue {
    match value {
        Some(s) => FieldValue::Str(s.clone()),
        None => FieldValue::Absent,
    }
}

fn opt_num<N: Into<f64> + Copy>(value: &Option<N>) -> FieldValue {
    match value {
        Some(n) => FieldValue::Num((*n).into()),
        None => FieldValue::Absent,
    }
}

fn list(items: &[String]) -> FieldValue {
    FieldValue::List(items.to_vec())
}

/// Resolve a field path on a node.
pub fn node_field(node: &KnowledgeNode, path: &str) -> FieldValue {
    match path {
        "id" => FieldValue::Str(node.id.clone()),
        "type" => FieldValue::Str(node.node_type.to_string()),
        "name" => FieldValue::Str(node.name.clone()),
        "path" => FieldValue::Str(node.path.clone()),
        "absolute_path" => FieldValue::Str(node.absolute_path.clone()),
        "size" => FieldValue::Num(node.size as f64),
        "last_modified" => FieldValue::Num(node.last_modified as f64),
        "tags" => FieldValue::List(node.tags.iter().cloned().collect()),
        "metadata.language" => opt_str(&node.metadata.language),
        "metadata.lines_of_code" => match node.metadata.lines_of_code {
            Some(n) => FieldValue::Num(n as f64),
            None => FieldValue::Absent,
        },
        "metadata.complexity" => opt_num(&node.metadata.complexity),
        "metadata.maintainability" => opt_num(&node.metadata.maintainability),
        "metadata.exports" => list(&node.metadata.exports),
        "metadata.imports" => list(&node.metadata.imports),
        "metadata.documentation" => opt_str(&node.metadata.documentation),
        "semantics.purpose" => FieldValue::Str(node.semantics.purpose.clone()),
        "semantics.operations" => FieldValue::List(
            node.semantics
                .operations
                .iter()
                .map(|op| op.name.clone())
                .collect(),
        ),
        "semantics.patterns" => FieldValue::List(
            node.semantics
                .patterns
                .iter()
                .map(|p| p.name.clone())
                .collect(),
        ),
        "semantics.responsibilities" => list(&node.semantics.responsibilities),
        "semantics.data_flow.inputs" => list(&node.semantics.data_flow.inputs),
        "semantics.data_flow.outputs" => list(&node.semantics.data_flow.outputs),
        "semantics.data_flow.transforms" => list(&node.semantics.data_flow.transforms),
        _ => FieldValue::Absent,
    }
}

/// Resolve a field path on a relationship.
pub fn relationship_field(rel: &Relationship, path: &str) -> FieldValue {
    match path {
        "id" => FieldValue::Str(rel.id.clone()),
        "from" => FieldValue::Str(rel.from.clone()),
        "to" => FieldValue::Str(rel.to.clone()),
        "type" => FieldValue::Str(rel.rel_type.to_string()),
        "weight" => FieldValue::Num(rel.weight),
        _ => FieldValue::Absent,
    }
}

/// Total order over field values for multi-key sorting.
///
/// Numbers compare numerically, strings lexicographically, lists by their
/// rendered form; absent values sort after everything else so unset fields
/// land at the end regardless of sort direction.
pub fn compare(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Absent, FieldValue::Absent) => Ordering::Equal,
        (FieldValue::Absent, _) => Ordering::Greater,
        (_, FieldValue::Absent) => Ordering::Less,
        (FieldValue::Num(x), FieldValue::Num(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (FieldValue::Str(x), FieldValue::Str(y)) => x.cmp(y),
        _ => {
            let x = a.render().unwrap_or_default();
            let y = b.render().unwrap_or_default();
            x.cmp(&y)
        }
    }
}
