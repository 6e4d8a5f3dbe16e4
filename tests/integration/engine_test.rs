//! Integration tests for the query engine over a live store: caching,
//! snapshot isolation, and the combined public surface.

use codeatlas::{
    helpers, AggregateOp, AggregateSpec, Condition, ConditionOperator, GraphQuery, GraphStore,
    KnowledgeGraph, QueryEngine, SearchRequest, SimilarityWeights,
};

fn sample_graph() -> KnowledgeGraph {
    let mut graph = KnowledgeGraph::new("proj", "/work/proj");
    for (id, lang) in [("utils", "rust"), ("main", "rust"), ("web", "typescript")] {
        graph
            .add_node(helpers::file_node(id, id, format!("src/{id}"), lang))
            .unwrap();
    }
    graph
        .add_node(helpers::function_node("parse", "parse", "src/utils"))
        .unwrap();
    graph
        .add_relationship(helpers::imports("main", "utils"))
        .unwrap();
    graph
        .add_relationship(helpers::contains("utils", "parse"))
        .unwrap();
    graph
}

fn sample_store() -> GraphStore {
    let mut store = GraphStore::in_memory();
    store.initialize().unwrap();
    store.store_graph(&sample_graph()).unwrap();
    store
}

#[test]
fn test_repeated_query_returns_identical_content() {
    let store = sample_store();
    let engine = QueryEngine::new();
    let query = GraphQuery::nodes()
        .filter(Condition::new(
            "metadata.language",
            ConditionOperator::Equals,
            "rust",
        ))
        .order_by("name");

    let first = engine.execute_query(&store, "proj", &query).unwrap();
    let second = engine.execute_query(&store, "proj", &query).unwrap();

    let ids = |r: &codeatlas::QueryResult| -> Vec<String> {
        r.nodes.iter().map(|n| n.id.clone()).collect()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.total_count, second.total_count);
}

#[test]
fn test_cached_result_survives_a_concurrent_persist() {
    // The cache serves the old content until TTL expiry; a persist never
    // corrupts an already-returned result
    let mut store = sample_store();
    let engine = QueryEngine::new();
    let query = GraphQuery::nodes();

    let before = engine.execute_query(&store, "proj", &query).unwrap();
    assert_eq!(before.total_count, 4);

    let mut updated = sample_graph();
    updated
        .add_node(helpers::file_node("extra", "extra", "src/extra", "rust"))
        .unwrap();
    updated.touch(1_700_000_000);
    store.store_graph(&updated).unwrap();

    let after = engine.execute_query(&store, "proj", &query).unwrap();
    assert_eq!(after.total_count, 4);

    // A different query bypasses the cached entry and sees the new snapshot
    let fresh = engine
        .execute_query(&store, "proj", &GraphQuery::nodes().order_by("id"))
        .unwrap();
    assert_eq!(fresh.total_count, 5);
}

#[test]
fn test_distinct_engines_do_not_share_caches() {
    let mut store = sample_store();
    let warm = QueryEngine::new();
    let query = GraphQuery::nodes();
    warm.execute_query(&store, "proj", &query).unwrap();

    let mut updated = sample_graph();
    updated
        .add_node(helpers::file_node("extra", "extra", "src/extra", "rust"))
        .unwrap();
    store.store_graph(&updated).unwrap();

    // The cold engine loads the fresh snapshot
    let cold = QueryEngine::new();
    let result = cold.execute_query(&store, "proj", &query).unwrap();
    assert_eq!(result.total_count, 5);
}

#[test]
fn test_full_surface_over_one_store() {
    let store = sample_store();
    let engine = QueryEngine::new();

    // Structured query
    let files = engine
        .execute_query(
            &store,
            "proj",
            &GraphQuery::nodes().filter(Condition::new("type", ConditionOperator::Equals, "file")),
        )
        .unwrap();
    assert_eq!(files.total_count, 3);

    // Traversal
    let path = engine
        .shortest_path(&store, "proj", "parse", "main", 3, None)
        .unwrap()
        .unwrap();
    assert_eq!(path.path.len(), 3);

    let reachable = engine.radius_search(&store, "proj", "utils", 1, None).unwrap();
    assert_eq!(reachable.len(), 3);

    // Search
    let hits = engine
        .search(&store, "proj", &SearchRequest::new("utils"))
        .unwrap();
    assert_eq!(hits[0].node.id, "utils");

    // Similarity
    let similar = engine
        .find_similar(&store, "proj", "main", &SimilarityWeights::default(), 5)
        .unwrap();
    assert!(similar.iter().any(|m| m.node.id == "utils"));

    // Aggregation
    let aggregates = engine
        .aggregate(
            &store,
            "proj",
            &[AggregateSpec::new("id", AggregateOp::Count).grouped_by("metadata.language")],
        )
        .unwrap();
    assert_eq!(aggregates["id_count"].group("rust").unwrap().count, Some(2));

    // Structural analysis
    let report = engine.analyze_structure(&store, "proj").unwrap();
    assert_eq!(report.degree_centrality.get("utils"), Some(&2));
}

#[test]
fn test_every_operation_rejects_unknown_graph() {
    let store = sample_store();
    let engine = QueryEngine::new();
    let unknown = "nope";

    assert!(engine
        .execute_query(&store, unknown, &GraphQuery::nodes())
        .is_err());
    assert!(engine
        .shortest_path(&store, unknown, "a", "b", 3, None)
        .is_err());
    assert!(engine
        .all_paths(&store, unknown, "a", "b", 3, 10, None)
        .is_err());
    assert!(engine.radius_search(&store, unknown, "a", 2, None).is_err());
    assert!(engine
        .search(&store, unknown, &SearchRequest::new("x"))
        .is_err());
    assert!(engine
        .find_similar(&store, unknown, "a", &SimilarityWeights::default(), 5)
        .is_err());
    assert!(engine
        .aggregate(&store, unknown, &[AggregateSpec::new("id", AggregateOp::Count)])
        .is_err());
    assert!(engine.analyze_structure(&store, unknown).is_err());
}
