//! Unit tests for similarity ranking.

use codeatlas::model::Operation;
use codeatlas::{
    helpers, AtlasError, GraphStore, KnowledgeGraph, QueryEngine, SimilarityWeights,
};

fn flush_op() -> Operation {
    Operation {
        name: "flush".to_string(),
        inputs: 1,
        outputs: 0,
    }
}

fn sample_store() -> GraphStore {
    let mut graph = KnowledgeGraph::new("proj", "/work/proj");

    let mut target = helpers::function_node("target", "encode", "src/encode.rs");
    target.size = 100;
    target.metadata.language = Some("rust".to_string());
    target.metadata.complexity = Some(5.0);
    target.semantics.purpose = "encode records to bytes".to_string();
    target.semantics.operations.push(flush_op());
    target.tags.insert("codec".to_string());
    target.tags.insert("io".to_string());
    graph.add_node(target).unwrap();

    // Near twin of the target
    let mut twin = helpers::function_node("twin", "decode", "src/decode.rs");
    twin.size = 110;
    twin.metadata.language = Some("rust".to_string());
    twin.metadata.complexity = Some(5.0);
    twin.semantics.purpose = "decode records to bytes".to_string();
    twin.semantics.operations.push(flush_op());
    twin.tags.insert("codec".to_string());
    twin.tags.insert("io".to_string());
    graph.add_node(twin).unwrap();

    // Different in every facet
    let mut stranger = helpers::class_node("stranger", "Dashboard", "web/dashboard.tsx");
    stranger.size = 5000;
    stranger.metadata.language = Some("typescript".to_string());
    stranger.metadata.complexity = Some(40.0);
    stranger.semantics.purpose = "render the admin dashboard".to_string();
    stranger.tags.insert("ui".to_string());
    graph.add_node(stranger).unwrap();

    let mut sink = helpers::function_node("sink", "sink", "src/sink.rs");
    sink.metadata.language = Some("rust".to_string());
    graph.add_node(sink).unwrap();

    // Matching relationship shape for target and twin
    graph
        .add_relationship(helpers::calls("target", "sink"))
        .unwrap();
    graph.add_relationship(helpers::calls("twin", "sink")).unwrap();

    let mut store = GraphStore::in_memory();
    store.store_graph(&graph).unwrap();
    store
}

#[test]
fn test_near_twin_ranks_first_with_reasons() {
    let store = sample_store();
    let engine = QueryEngine::new();

    let matches = engine
        .find_similar(&store, "proj", "target", &SimilarityWeights::default(), 10)
        .unwrap();

    assert!(!matches.is_empty());
    assert_eq!(matches[0].node.id, "twin");
    assert!(matches[0].score > 0.8);
    assert!(matches[0].reasons.contains(&"similar structure".to_string()));
    assert!(matches[0].reasons.contains(&"similar semantics".to_string()));
    assert!(matches[0]
        .reasons
        .contains(&"similar relationships".to_string()));
}

#[test]
fn test_weak_candidates_are_dropped() {
    let store = sample_store();
    let engine = QueryEngine::new();

    let matches = engine
        .find_similar(&store, "proj", "target", &SimilarityWeights::default(), 10)
        .unwrap();

    assert!(matches.iter().all(|m| m.node.id != "stranger"));
    assert!(matches.iter().all(|m| m.score >= 0.5));
}

#[test]
fn test_limit_truncates() {
    let store = sample_store();
    let engine = QueryEngine::new();

    let matches = engine
        .find_similar(&store, "proj", "target", &SimilarityWeights::default(), 1)
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].node.id, "twin");
}

#[test]
fn test_unknown_target_is_not_found() {
    let store = sample_store();
    let engine = QueryEngine::new();

    let result = engine.find_similar(&store, "proj", "ghost", &SimilarityWeights::default(), 10);
    assert!(matches!(result, Err(AtlasError::NodeNotFound { .. })));
}

#[test]
fn test_weights_need_not_sum_to_one() {
    let store = sample_store();
    let engine = QueryEngine::new();

    // Structural facet only, at full weight
    let weights = SimilarityWeights {
        structural: 1.0,
        semantic: 0.0,
        relationship: 0.0,
    };
    let matches = engine
        .find_similar(&store, "proj", "target", &weights, 10)
        .unwrap();

    assert_eq!(matches[0].node.id, "twin");
    assert!(matches[0].score > 0.9);
}
