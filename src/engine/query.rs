//! Structured queries: select / where / order by / paginate.
//!
//! Conditions combine by a left fold, not by operator precedence: condition
//! 0 is evaluated first, then combined with condition 1 using the connector
//! attached to condition 0, that result with condition 2 using condition
//! 1's connector, and so on. Reordering conditions changes results.

use super::fields::{self, FieldValue};
use super::snapshot::GraphSnapshot;
use crate::error::{AtlasError, Result};
use crate::model::{KnowledgeNode, Relationship};
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Comparison operator for a query condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionOperator {
    /// Exact equality
    Equals,
    /// Case-insensitive substring
    Contains,
    /// Prefix match
    StartsWith,
    /// Suffix match
    EndsWith,
    /// Case-insensitive regular expression
    Matches,
    /// Numeric greater-than
    GreaterThan,
    /// Numeric less-than
    LessThan,
    /// Membership in a value list
    In,
    /// Field resolves to a value
    Exists,
}

/// Boolean connector combining a condition with the one after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connector {
    /// Both must hold
    #[default]
    And,
    /// Either may hold
    Or,
}

/// A literal value a condition compares against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryValue {
    /// String literal
    Str(String),
    /// Numeric literal
    Num(f64),
    /// Boolean literal
    Bool(bool),
    /// List literal, for `In`
    List(Vec<String>),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Num(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Num(value as f64)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(value: Vec<String>) -> Self {
        QueryValue::List(value)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(value: Vec<&str>) -> Self {
        QueryValue::List(value.into_iter().map(str::to_string).collect())
    }
}

/// One filter condition over a field path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Dot-separated field path (see [`crate::engine::fields`])
    pub field: String,
    /// Comparison operator
    pub operator: ConditionOperator,
    /// Comparison value; `Exists` takes none
    pub value: Option<QueryValue>,
    /// Connector toward the *next* condition in the list
    pub connector: Connector,
}

impl Condition {
    /// Create a condition comparing a field against a value.
    pub fn new(
        field: impl Into<String>,
        operator: ConditionOperator,
        value: impl Into<QueryValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: Some(value.into()),
            connector: Connector::And,
        }
    }

    /// Create an `Exists` condition.
    pub fn exists(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: ConditionOperator::Exists,
            value: None,
            connector: Connector::And,
        }
    }

    /// Connect this condition to the next one with OR instead of AND.
    pub fn or_next(mut self) -> Self {
        self.connector = Connector::Or;
        self
    }
}

/// Which entity collection a query selects from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Selector {
    /// Select nodes — all of them, or an explicit id list
    Nodes(IdSelect),
    /// Select relationships — all of them, or an explicit id list
    Relationships(IdSelect),
}

/// Wildcard or explicit id list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IdSelect {
    /// Every entity in the collection
    All,
    /// Only the listed ids
    Ids(Vec<String>),
}

/// One sort key; earlier keys dominate, ties fall through to later keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortKey {
    /// Field path to sort by
    pub field: String,
    /// Sort descending instead of ascending
    pub descending: bool,
}

/// A structured query over one graph snapshot.
///
/// Built fluently:
///
/// ```
/// use codeatlas::engine::{Condition, ConditionOperator, GraphQuery};
///
/// let query = GraphQuery::nodes()
///     .filter(Condition::new("type", ConditionOperator::Equals, "function"))
///     .order_by("name")
///     .limit(20);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQuery {
    /// What to select; required
    pub selector: Option<Selector>,
    /// Filter conditions, combined by left fold
    pub conditions: Vec<Condition>,
    /// Sort keys, applied as one stable multi-key sort
    pub order_by: Vec<SortKey>,
    /// Rows to skip after filter+sort
    pub offset: Option<usize>,
    /// Rows to take after the offset; omitted = unbounded tail
    pub limit: Option<usize>,
    /// Also return relationships touching the matched nodes
    pub include_relationships: bool,
    /// Also compute the aggregate metadata block
    pub include_metadata: bool,
}

impl GraphQuery {
    /// Query selecting all nodes.
    pub fn nodes() -> Self {
        Self {
            selector: Some(Selector::Nodes(IdSelect::All)),
            ..Self::default()
        }
    }

    /// Query selecting an explicit node id list.
    pub fn nodes_by_id<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selector: Some(Selector::Nodes(IdSelect::Ids(
                ids.into_iter().map(Into::into).collect(),
            ))),
            ..Self::default()
        }
    }

    /// Query selecting all relationships.
    pub fn relationships() -> Self {
        Self {
            selector: Some(Selector::Relationships(IdSelect::All)),
            ..Self::default()
        }
    }

    /// Append a filter condition.
    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Append an ascending sort key.
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by.push(SortKey {
            field: field.into(),
            descending: false,
        });
        self
    }

    /// Append a descending sort key.
    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.order_by.push(SortKey {
            field: field.into(),
            descending: true,
        });
        self
    }

    /// Skip the first `n` rows of the sorted result.
    pub fn offset(mut self, n: usize) -> Self {
        self.offset = Some(n);
        self
    }

    /// Take at most `n` rows after the offset.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Include relationships touching the matched nodes.
    pub fn with_relationships(mut self) -> Self {
        self.include_relationships = true;
        self
    }

    /// Include the aggregate metadata block.
    pub fn with_metadata(mut self) -> Self {
        self.include_metadata = true;
        self
    }
}

/// Aggregate metadata over the matched nodes (pre-pagination).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryMetadata {
    /// Matched node count per node type
    pub count_by_type: BTreeMap<String, usize>,
    /// Matched node count per language
    pub count_by_language: BTreeMap<String, usize>,
    /// Sum of cyclomatic complexity over matched nodes
    pub total_complexity: f64,
    /// Mean size in bytes over matched nodes
    pub average_size: f64,
}

/// Result of a structured query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    /// Matched nodes, sorted and paginated
    pub nodes: Vec<KnowledgeNode>,
    /// Matched relationships (relationship selector), or relationships
    /// touching the matched nodes (`include_relationships`)
    pub relationships: Vec<Relationship>,
    /// Aggregate metadata, when requested
    pub metadata: Option<QueryMetadata>,
    /// Match count before pagination
    pub total_count: usize,
    /// Wall-clock evaluation time in milliseconds
    pub execution_ms: f64,
}

/// Evaluate a query against a snapshot.
///
/// # Errors
///
/// Returns [`AtlasError::Validation`] if the query has no selector — the
/// only hard validation error. Everything else fails closed per condition.
pub(crate) fn execute(snapshot: &GraphSnapshot, query: &GraphQuery) -> Result<QueryResult> {
    let selector = query.selector.as_ref().ok_or_else(|| AtlasError::Validation {
        message: "query has no selector".to_string(),
    })?;

    match selector {
        Selector::Nodes(ids) => execute_nodes(snapshot, query, ids),
        Selector::Relationships(ids) => execute_relationships(snapshot, query, ids),
    }
}

fn execute_nodes(
    snapshot: &GraphSnapshot,
    query: &GraphQuery,
    ids: &IdSelect,
) -> Result<QueryResult> {
    let graph = snapshot.graph();
    let id_set: Option<HashSet<&str>> = match ids {
        IdSelect::All => None,
        IdSelect::Ids(list) => Some(list.iter().map(String::as_str).collect()),
    };

    let mut matched: Vec<&KnowledgeNode> = graph
        .nodes
        .iter()
        .filter(|node| id_set.as_ref().is_none_or(|set| set.contains(node.id.as_str())))
        .filter(|node| matches_conditions(&query.conditions, |path| fields::node_field(node, path)))
        .collect();

    sort_rows(&mut matched, &query.order_by, |node, path| {
        fields::node_field(node, path)
    });

    let total_count = matched.len();
    let metadata = query.include_metadata.then(|| node_metadata(&matched));
    let page = paginate(matched, query.offset, query.limit);

    let relationships = if query.include_relationships {
        let page_ids: HashSet<&str> = page.iter().map(|n| n.id.as_str()).collect();
        graph
            .relationships
            .iter()
            .filter(|rel| page_ids.contains(rel.from.as_str()) || page_ids.contains(rel.to.as_str()))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    Ok(QueryResult {
        nodes: page.into_iter().cloned().collect(),
        relationships,
        metadata,
        total_count,
        execution_ms: 0.0,
    })
}

fn execute_relationships(
    snapshot: &GraphSnapshot,
    query: &GraphQuery,
    ids: &IdSelect,
) -> Result<QueryResult> {
    let graph = snapshot.graph();
    let id_set: Option<HashSet<&str>> = match ids {
        IdSelect::All => None,
        IdSelect::Ids(list) => Some(list.iter().map(String::as_str).collect()),
    };

    let mut matched: Vec<&Relationship> = graph
        .relationships
        .iter()
        .filter(|rel| id_set.as_ref().is_none_or(|set| set.contains(rel.id.as_str())))
        .filter(|rel| {
            matches_conditions(&query.conditions, |path| {
                fields::relationship_field(rel, path)
            })
        })
        .collect();

    sort_rows(&mut matched, &query.order_by, |rel, path| {
        fields::relationship_field(rel, path)
    });

    let total_count = matched.len();
    let page = paginate(matched, query.offset, query.limit);

    Ok(QueryResult {
        nodes: Vec::new(),
        relationships: page.into_iter().cloned().collect(),
        metadata: None,
        total_count,
        execution_ms: 0.0,
    })
}

/// Left fold over the condition list.
fn matches_conditions<F>(conditions: &[Condition], resolve: F) -> bool
where
    F: Fn(&str) -> FieldValue,
{
    let Some(first) = conditions.first() else {
        return true;
    };

    let mut acc = evaluate(first, &resolve);
    for (prev, cond) in conditions.iter().zip(conditions.iter().skip(1)) {
        let rhs = evaluate(cond, &resolve);
        acc = match prev.connector {
            Connector::And => acc && rhs,
            Connector::Or => acc || rhs,
        };
    }
    acc
}

/// Evaluate one condition. Type mismatches and invalid patterns fail
/// closed: the condition is false, never an error.
fn evaluate<F>(condition: &Condition, resolve: &F) -> bool
where
    F: Fn(&str) -> FieldValue,
{
    let field = resolve(&condition.field);

    if condition.operator == ConditionOperator::Exists {
        return field.is_present();
    }
    let Some(value) = &condition.value else {
        return false;
    };

    match condition.operator {
        ConditionOperator::Equals => match (&field, value) {
            (FieldValue::Str(f), QueryValue::Str(v)) => f == v,
            (FieldValue::Num(f), QueryValue::Num(v)) => (f - v).abs() < f64::EPSILON,
            _ => false,
        },
        ConditionOperator::Contains => match (&field, value) {
            (FieldValue::Str(f), QueryValue::Str(v)) => {
                f.to_lowercase().contains(&v.to_lowercase())
            }
            (FieldValue::List(items), QueryValue::Str(v)) => {
                let needle = v.to_lowercase();
                items.iter().any(|item| item.to_lowercase().contains(&needle))
            }
            _ => false,
        },
        ConditionOperator::StartsWith => match (&field, value) {
            (FieldValue::Str(f), QueryValue::Str(v)) => f.starts_with(v.as_str()),
            _ => false,
        },
        ConditionOperator::EndsWith => match (&field, value) {
            (FieldValue::Str(f), QueryValue::Str(v)) => f.ends_with(v.as_str()),
            _ => false,
        },
        ConditionOperator::Matches => match (&field, value) {
            (FieldValue::Str(f), QueryValue::Str(pattern)) => RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map(|re| re.is_match(f))
                .unwrap_or(false),
            _ => false,
        },
        ConditionOperator::GreaterThan => match (&field, value) {
            (FieldValue::Num(f), QueryValue::Num(v)) => f > v,
            _ => false,
        },
        ConditionOperator::LessThan => match (&field, value) {
            (FieldValue::Num(f), QueryValue::Num(v)) => f < v,
            _ => false,
        },
        ConditionOperator::In => match (&field, value) {
            (FieldValue::Str(f), QueryValue::List(list)) => list.iter().any(|v| v == f),
            (FieldValue::Num(f), QueryValue::List(list)) => {
                list.iter().any(|v| v.parse::<f64>().is_ok_and(|n| (n - f).abs() < f64::EPSILON))
            }
            _ => false,
        },
        ConditionOperator::Exists => unreachable!("handled above"),
    }
}

/// Stable multi-key sort; ties fall through to later keys, then to the
/// original insertion order.
fn sort_rows<T, F>(rows: &mut [&T], keys: &[SortKey], resolve: F)
where
    F: Fn(&T, &str) -> FieldValue,
{
    if keys.is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        for key in keys {
            let mut ord = fields::compare(&resolve(*a, &key.field), &resolve(*b, &key.field));
            if key.descending {
                ord = ord.reverse();
            }
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

fn paginate<T>(rows: Vec<T>, offset: Option<usize>, limit: Option<usize>) -> Vec<T> {
    let mut iter = rows.into_iter().skip(offset.unwrap_or(0));
    match limit {
        Some(n) => iter.by_ref().take(n).collect(),
        None => iter.collect(),
    }
}

fn node_metadata(nodes: &[&KnowledgeNode]) -> QueryMetadata {
    let mut metadata = QueryMetadata::default();
    let mut total_size = 0u64;

    for node in nodes {
        *metadata
            .count_by_type
            .entry(node.node_type.to_string())
            .or_default() += 1;
        if let Some(language) = &node.metadata.language {
            *metadata.count_by_language.entry(language.clone()).or_default() += 1;
        }
        metadata.total_complexity += node.metadata.complexity.unwrap_or(0.0);
        total_size += node.size;
    }
    metadata.average_size = if nodes.is_empty() {
        0.0
    } else {
        total_size as f64 / nodes.len() as f64
    };
    metadata
}
