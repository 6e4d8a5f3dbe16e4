//! Similarity ranking: find nodes resembling a target node.
//!
//! Heuristic scoring over three facets — structure, semantics, and
//! relationship shape — each in `[0, 1]`, blended by caller weights that
//! need not sum to one.

use super::snapshot::GraphSnapshot;
use crate::error::{AtlasError, Result};
use crate::measures;
use crate::model::KnowledgeNode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Candidates below this blended score are dropped.
const SCORE_THRESHOLD: f64 = 0.5;
/// A facet above this contributes a human-readable reason.
const REASON_THRESHOLD: f64 = 0.7;

/// Facet weights for similarity scoring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimilarityWeights {
    /// Weight of the structural facet (type, language, size, complexity)
    pub structural: f64,
    /// Weight of the semantic facet (purpose, tags, operations)
    pub semantic: f64,
    /// Weight of the relationship facet (relationship-type overlap)
    pub relationship: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            structural: 0.4,
            semantic: 0.4,
            relationship: 0.2,
        }
    }
}

/// One ranked candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityMatch {
    /// The candidate node
    pub node: KnowledgeNode,
    /// Blended score
    pub score: f64,
    /// Facets that scored above the reason threshold
    pub reasons: Vec<String>,
}

/// Score every other node against the target, drop weak candidates, and
/// return the strongest `limit` matches in descending order.
///
/// # Errors
///
/// Returns [`AtlasError::NodeNotFound`] if the target id is not in the
/// graph.
pub(crate) fn find_similar(
    snapshot: &GraphSnapshot,
    target_id: &str,
    weights: &SimilarityWeights,
    limit: usize,
) -> Result<Vec<SimilarityMatch>> {
    let target_idx = snapshot
        .index_of(target_id)
        .ok_or_else(|| AtlasError::NodeNotFound {
            node_id: target_id.to_string(),
        })?;
    let target = snapshot.node_at(target_idx);
    let target_types = snapshot.relation_types(target_idx);

    let mut matches = Vec::new();
    for idx in 0..snapshot.node_count() {
        if idx == target_idx {
            continue;
        }
        let candidate = snapshot.node_at(idx);

        let structural = structural_score(target, candidate);
        let semantic = semantic_score(target, candidate);
        let relationship = {
            let candidate_types = snapshot.relation_types(idx);
            let a: HashSet<_> = target_types.iter().copied().collect();
            let b: HashSet<_> = candidate_types.into_iter().collect();
            measures::jaccard(&a, &b)
        };

        let score = structural * weights.structural
            + semantic * weights.semantic
            + relationship * weights.relationship;
        if score < SCORE_THRESHOLD {
            continue;
        }

        let mut reasons = Vec::new();
        if structural > REASON_THRESHOLD {
            reasons.push("similar structure".to_string());
        }
        if semantic > REASON_THRESHOLD {
            reasons.push("similar semantics".to_string());
        }
        if relationship > REASON_THRESHOLD {
            reasons.push("similar relationships".to_string());
        }

        matches.push(SimilarityMatch {
            node: candidate.clone(),
            score,
            reasons,
        });
    }

    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    matches.truncate(limit);
    Ok(matches)
}

/// Relative closeness of two magnitudes: `1 - |a-b| / max(a, b)`, with two
/// zeros counting as identical.
fn magnitude_closeness(a: f64, b: f64) -> f64 {
    let max = a.max(b);
    if max == 0.0 {
        return 1.0;
    }
    1.0 - (a - b).abs() / max
}

fn structural_score(a: &KnowledgeNode, b: &KnowledgeNode) -> f64 {
    let type_eq = if a.node_type == b.node_type { 1.0 } else { 0.0 };
    let lang_eq = if a.metadata.language == b.metadata.language {
        1.0
    } else {
        0.0
    };
    let size = magnitude_closeness(a.size as f64, b.size as f64);
    let complexity = magnitude_closeness(
        a.metadata.complexity.unwrap_or(0.0),
        b.metadata.complexity.unwrap_or(0.0),
    );

    0.3 * type_eq + 0.2 * lang_eq + 0.2 * size + 0.3 * complexity
}

fn semantic_score(a: &KnowledgeNode, b: &KnowledgeNode) -> f64 {
    let purpose = measures::string_similarity(&a.semantics.purpose, &b.semantics.purpose);

    let tags_a: HashSet<&str> = a.tags.iter().map(String::as_str).collect();
    let tags_b: HashSet<&str> = b.tags.iter().map(String::as_str).collect();
    let tags = measures::jaccard(&tags_a, &tags_b);

    let ops_a: HashSet<&str> = a.operation_names().into_iter().collect();
    let ops_b: HashSet<&str> = b.operation_names().into_iter().collect();
    let operations = measures::jaccard(&ops_a, &ops_b);

    0.4 * purpose + 0.3 * tags + 0.3 * operations
}
