//! Aggregation over node field values: count, sum, avg, min, max, distinct.

use super::fields::{self, FieldValue};
use super::snapshot::GraphSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Reduction applied to a field's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateOp {
    /// Number of nodes with a present value
    Count,
    /// Sum of numeric values
    Sum,
    /// Mean of numeric values
    Avg,
    /// Minimum numeric value
    Min,
    /// Maximum numeric value
    Max,
    /// Distinct rendered values
    Distinct,
}

impl std::fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateOp::Count => write!(f, "count"),
            AggregateOp::Sum => write!(f, "sum"),
            AggregateOp::Avg => write!(f, "avg"),
            AggregateOp::Min => write!(f, "min"),
            AggregateOp::Max => write!(f, "max"),
            AggregateOp::Distinct => write!(f, "distinct"),
        }
    }
}

/// One aggregation: a field, an operation, and an optional group-by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSpec {
    /// Field path whose values are aggregated
    pub field: String,
    /// Reduction to apply
    pub op: AggregateOp,
    /// Optional field path to partition nodes by
    pub group_by: Option<String>,
}

impl AggregateSpec {
    /// Ungrouped aggregation.
    pub fn new(field: impl Into<String>, op: AggregateOp) -> Self {
        Self {
            field: field.into(),
            op,
            group_by: None,
        }
    }

    /// Partition nodes by another field before reducing.
    pub fn grouped_by(mut self, field: impl Into<String>) -> Self {
        self.group_by = Some(field.into());
        self
    }

    /// Result key for this spec: `"{field}_{op}"`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.field, self.op)
    }
}

/// Reduced values for one group. Only the fields relevant to the requested
/// operation are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateValue {
    /// Present-value count
    pub count: Option<u64>,
    /// Numeric sum
    pub sum: Option<f64>,
    /// Numeric mean
    pub avg: Option<f64>,
    /// Numeric minimum
    pub min: Option<f64>,
    /// Numeric maximum
    pub max: Option<f64>,
    /// Distinct rendered values, sorted
    pub distinct: Option<Vec<String>>,
}

/// Result of one aggregation spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AggregateResult {
    /// Ungrouped: one reduced value
    Single(AggregateValue),
    /// Grouped: group label to reduced value
    Grouped(BTreeMap<String, AggregateValue>),
}

impl AggregateResult {
    /// The ungrouped value, if this result is ungrouped.
    pub fn single(&self) -> Option<&AggregateValue> {
        match self {
            AggregateResult::Single(value) => Some(value),
            AggregateResult::Grouped(_) => None,
        }
    }

    /// A group's value, if this result is grouped.
    pub fn group(&self, label: &str) -> Option<&AggregateValue> {
        match self {
            AggregateResult::Grouped(groups) => groups.get(label),
            AggregateResult::Single(_) => None,
        }
    }
}

/// Evaluate aggregation specs over the snapshot's nodes.
///
/// Absent field values are dropped. Nodes whose group-by field is absent
/// are skipped. `distinct` keeps per-group sets — values are not merged
/// across groups.
pub(crate) fn aggregate(
    snapshot: &GraphSnapshot,
    specs: &[AggregateSpec],
) -> BTreeMap<String, AggregateResult> {
    let mut results = BTreeMap::new();

    for spec in specs {
        // group label -> collected field values
        let mut groups: BTreeMap<String, Vec<FieldValue>> = BTreeMap::new();

        for node in &snapshot.graph().nodes {
            let label = match &spec.group_by {
                Some(group_field) => {
                    match fields::node_field(node, group_field).render() {
                        Some(label) => label,
                        None => continue,
                    }
                }
                None => String::new(),
            };
            let value = fields::node_field(node, &spec.field);
            if value.is_present() {
                groups.entry(label).or_default().push(value);
            }
        }

        let result = if spec.group_by.is_some() {
            AggregateResult::Grouped(
                groups
                    .into_iter()
                    .map(|(label, values)| (label, reduce(spec.op, &values)))
                    .collect(),
            )
        } else {
            let values = groups.remove("").unwrap_or_default();
            AggregateResult::Single(reduce(spec.op, &values))
        };
        results.insert(spec.key(), result);
    }

    results
}

fn reduce(op: AggregateOp, values: &[FieldValue]) -> AggregateValue {
    let mut out = AggregateValue::default();
    match op {
        AggregateOp::Count => out.count = Some(values.len() as u64),
        AggregateOp::Sum => {
            out.sum = Some(values.iter().filter_map(FieldValue::as_num).sum());
        }
        AggregateOp::Avg => {
            let nums: Vec<f64> = values.iter().filter_map(FieldValue::as_num).collect();
            out.avg = if nums.is_empty() {
                None
            } else {
                Some(nums.iter().sum::<f64>() / nums.len() as f64)
            };
        }
        AggregateOp::Min => {
            out.min = values
                .iter()
                .filter_map(FieldValue::as_num)
                .fold(None, |acc: Option<f64>, n| {
                    Some(acc.map_or(n, |a| a.min(n)))
                });
        }
        AggregateOp::Max => {
            out.max = values
                .iter()
                .filter_map(FieldValue::as_num)
                .fold(None, |acc: Option<f64>, n| {
                    Some(acc.map_or(n, |a| a.max(n)))
                });
        }
        AggregateOp::Distinct => {
            let set: BTreeSet<String> = values.iter().filter_map(FieldValue::render).collect();
            out.distinct = Some(set.into_iter().collect());
        }
    }
    out
}
