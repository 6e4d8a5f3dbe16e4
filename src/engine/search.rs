//! Full-text and fuzzy search over node text fields.

use super::snapshot::GraphSnapshot;
use crate::measures;
use crate::model::KnowledgeNode;
use serde::{Deserialize, Serialize};

/// Fuzzy matches below this similarity are rejected.
const FUZZY_THRESHOLD: f64 = 0.6;

/// Text fields a search can scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchField {
    /// Artifact name — matches here count double
    Name,
    /// Semantic purpose text
    Purpose,
    /// Extracted documentation
    Documentation,
    /// Project-relative path
    Path,
}

impl SearchField {
    /// All fields, the default scan set.
    pub const ALL: [SearchField; 4] = [
        SearchField::Name,
        SearchField::Purpose,
        SearchField::Documentation,
        SearchField::Path,
    ];

    fn text<'a>(&self, node: &'a KnowledgeNode) -> Option<&'a str> {
        match self {
            SearchField::Name => Some(&node.name),
            SearchField::Purpose => Some(&node.semantics.purpose),
            SearchField::Documentation => node.metadata.documentation.as_deref(),
            SearchField::Path => Some(&node.path),
        }
    }
}

impl std::fmt::Display for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchField::Name => write!(f, "name"),
            SearchField::Purpose => write!(f, "purpose"),
            SearchField::Documentation => write!(f, "documentation"),
            SearchField::Path => write!(f, "path"),
        }
    }
}

/// A full-text search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Search term
    pub term: String,
    /// Fields to scan; `None` scans [`SearchField::ALL`]
    pub fields: Option<Vec<SearchField>>,
    /// Fuzzy (edit-distance) matching instead of exact substring
    pub fuzzy: bool,
    /// Maximum number of hits to return
    pub limit: Option<usize>,
}

impl SearchRequest {
    /// Exact (case-insensitive substring) search over the default fields.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            fields: None,
            fuzzy: false,
            limit: None,
        }
    }

    /// Restrict the scan to specific fields.
    pub fn fields(mut self, fields: impl Into<Vec<SearchField>>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Switch to fuzzy matching.
    pub fn fuzzy(mut self) -> Self {
        self.fuzzy = true;
        self
    }

    /// Cap the number of hits.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

/// One search hit: the node, its summed score, and which fields matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// The matched node
    pub node: KnowledgeNode,
    /// Sum of per-field scores; name-field matches count double
    pub score: f64,
    /// Fields that matched
    pub matched_fields: Vec<SearchField>,
}

/// Scan the snapshot's nodes for the request, sorted descending by score.
pub(crate) fn search(snapshot: &GraphSnapshot, request: &SearchRequest) -> Vec<SearchHit> {
    let fields: &[SearchField] = request.fields.as_deref().unwrap_or(&SearchField::ALL);
    let term = request.term.to_lowercase();

    let mut hits = Vec::new();
    for node in &snapshot.graph().nodes {
        let mut score = 0.0;
        let mut matched = Vec::new();

        for field in fields {
            let Some(text) = field.text(node) else {
                continue;
            };
            let field_score = if request.fuzzy {
                let similarity = measures::string_similarity(&term, &text.to_lowercase());
                (similarity > FUZZY_THRESHOLD).then_some(similarity)
            } else {
                text.to_lowercase().contains(&term).then_some(1.0)
            };
            if let Some(base) = field_score {
                let weight = if *field == SearchField::Name { 2.0 } else { 1.0 };
                score += base * weight;
                matched.push(*field);
            }
        }

        if !matched.is_empty() {
            hits.push(SearchHit {
                node: node.clone(),
                score,
                matched_fields: matched,
            });
        }
    }

    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    if let Some(limit) = request.limit {
        hits.truncate(limit);
    }
    hits
}
