//! The query engine: read-only evaluation over loaded graph snapshots.
//!
//! Every operation loads one immutable snapshot from the store, builds
//! adjacency indices once, and evaluates entirely in memory — a concurrent
//! persist of the same graph never affects an in-flight query. The engine's
//! only state is the shared result cache; everything else is pure.
//!
//! Cost is controlled exclusively by the caller's depth/result parameters;
//! there is no cancellation mechanism.

mod aggregate;
mod analysis;
mod cache;
mod fields;
mod query;
mod search;
mod similarity;
mod snapshot;
mod traversal;

pub use aggregate::{AggregateOp, AggregateResult, AggregateSpec, AggregateValue};
pub use analysis::StructuralReport;
pub use fields::FieldValue;
pub use query::{
    Condition, ConditionOperator, Connector, GraphQuery, IdSelect, QueryMetadata, QueryResult,
    QueryValue, Selector, SortKey,
};
pub use search::{SearchField, SearchHit, SearchRequest};
pub use similarity::{SimilarityMatch, SimilarityWeights};
pub use snapshot::GraphSnapshot;
pub use traversal::{GraphPath, PathSearch};

use crate::error::{AtlasError, Result};
use crate::model::RelationType;
use crate::store::GraphStore;
use cache::QueryCache;
use log::{debug, trace};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Instant;

/// Stateless query executor with a shared result cache.
///
/// The engine never mutates store-owned state. Operations take the store
/// and a graph id so one engine can serve any number of projects; unknown
/// graph ids fail every operation with [`AtlasError::GraphNotFound`].
#[derive(Default)]
pub struct QueryEngine {
    cache: Mutex<QueryCache>,
}

impl QueryEngine {
    /// Create an engine with the default cache (300 s TTL, 100 entries).
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a structured query.
    ///
    /// Results are cached per (graph id, query) for the cache TTL; the
    /// cache never affects result content, only latency.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::GraphNotFound`] for an unknown graph id, or
    /// [`AtlasError::Validation`] if the query has no selector.
    pub fn execute_query(
        &self,
        store: &GraphStore,
        graph_id: &str,
        query: &GraphQuery,
    ) -> Result<QueryResult> {
        let key = QueryCache::key(graph_id, query);
        {
            let mut cache = self.lock_cache();
            if let Some(hit) = cache.get(key) {
                trace!("Query cache hit for graph {graph_id}");
                return Ok(hit);
            }
        }

        let snapshot = self.snapshot(store, graph_id)?;
        let started = Instant::now();
        let mut result = query::execute(&snapshot, query)?;
        result.execution_ms = started.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "Query on graph {graph_id}: {} of {} rows in {:.3} ms",
            result.nodes.len().max(result.relationships.len()),
            result.total_count,
            result.execution_ms
        );

        self.lock_cache()
            .insert(key, result.clone(), result.execution_ms);
        Ok(result)
    }

    /// Breadth-first shortest path between two nodes, treating
    /// relationships as undirected.
    ///
    /// `Ok(None)` when no path exists within `max_depth` or an endpoint id
    /// is unknown — absence is a normal outcome.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::GraphNotFound`] for an unknown graph id.
    pub fn shortest_path(
        &self,
        store: &GraphStore,
        graph_id: &str,
        from: &str,
        to: &str,
        max_depth: usize,
        types: Option<&[RelationType]>,
    ) -> Result<Option<PathSearch>> {
        let snapshot = self.snapshot(store, graph_id)?;
        Ok(traversal::shortest_path(&snapshot, from, to, max_depth, types))
    }

    /// Every simple path between two nodes, bounded by depth and result
    /// count, sorted descending by weight-sum score.
    ///
    /// Enumeration cost is exponential in the branching factor; the two
    /// caps are the only safeguards.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::GraphNotFound`] for an unknown graph id.
    #[allow(clippy::too_many_arguments)]
    pub fn all_paths(
        &self,
        store: &GraphStore,
        graph_id: &str,
        from: &str,
        to: &str,
        max_depth: usize,
        max_results: usize,
        types: Option<&[RelationType]>,
    ) -> Result<Vec<GraphPath>> {
        let snapshot = self.snapshot(store, graph_id)?;
        Ok(traversal::all_paths(
            &snapshot, from, to, max_depth, max_results, types,
        ))
    }

    /// Hop distances for every node reachable within `radius` of a source
    /// node.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::GraphNotFound`] for an unknown graph id.
    pub fn radius_search(
        &self,
        store: &GraphStore,
        graph_id: &str,
        from: &str,
        radius: usize,
        types: Option<&[RelationType]>,
    ) -> Result<BTreeMap<String, usize>> {
        let snapshot = self.snapshot(store, graph_id)?;
        Ok(traversal::radius_search(&snapshot, from, radius, types))
    }

    /// Full-text (or fuzzy) search over node text fields.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::GraphNotFound`] for an unknown graph id.
    pub fn search(
        &self,
        store: &GraphStore,
        graph_id: &str,
        request: &SearchRequest,
    ) -> Result<Vec<SearchHit>> {
        let snapshot = self.snapshot(store, graph_id)?;
        Ok(search::search(&snapshot, request))
    }

    /// Rank every other node by similarity to a target node.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::GraphNotFound`] for an unknown graph id, or
    /// [`AtlasError::NodeNotFound`] if the target node is not in it.
    pub fn find_similar(
        &self,
        store: &GraphStore,
        graph_id: &str,
        node_id: &str,
        weights: &SimilarityWeights,
        limit: usize,
    ) -> Result<Vec<SimilarityMatch>> {
        let snapshot = self.snapshot(store, graph_id)?;
        similarity::find_similar(&snapshot, node_id, weights, limit)
    }

    /// Evaluate aggregation specs, keyed `"{field}_{op}"` in the result.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::GraphNotFound`] for an unknown graph id.
    pub fn aggregate(
        &self,
        store: &GraphStore,
        graph_id: &str,
        specs: &[AggregateSpec],
    ) -> Result<BTreeMap<String, AggregateResult>> {
        let snapshot = self.snapshot(store, graph_id)?;
        Ok(aggregate::aggregate(&snapshot, specs))
    }

    /// Compute degree centrality, degree distribution, clustering, and
    /// strongly connected components.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::GraphNotFound`] for an unknown graph id.
    pub fn analyze_structure(
        &self,
        store: &GraphStore,
        graph_id: &str,
    ) -> Result<StructuralReport> {
        let snapshot = self.snapshot(store, graph_id)?;
        Ok(analysis::analyze(&snapshot))
    }

    /// Load a snapshot for one operation.
    fn snapshot(&self, store: &GraphStore, graph_id: &str) -> Result<GraphSnapshot> {
        let graph = store
            .load_graph(graph_id)?
            .ok_or_else(|| AtlasError::GraphNotFound {
                graph_id: graph_id.to_string(),
            })?;
        Ok(GraphSnapshot::build(graph))
    }

    /// A poisoned cache lock only means another query panicked mid-insert;
    /// the cache stays usable, so recover the guard.
    fn lock_cache(&self) -> std::sync::MutexGuard<'_, QueryCache> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}
