//! Unit tests for shortest path, all paths, and radius search.

use codeatlas::{helpers, GraphStore, KnowledgeGraph, QueryEngine, RelationType};

// Linear chain of imports: a -> b -> c -> d
fn linear_chain() -> GraphStore {
    let mut graph = KnowledgeGraph::new("proj", "/work/proj");
    for id in ["a", "b", "c", "d"] {
        graph
            .add_node(helpers::file_node(id, id, format!("src/{id}.rs"), "rust"))
            .unwrap();
    }
    graph.add_relationship(helpers::imports("a", "b")).unwrap();
    graph.add_relationship(helpers::imports("b", "c")).unwrap();
    graph.add_relationship(helpers::imports("c", "d")).unwrap();

    let mut store = GraphStore::in_memory();
    store.store_graph(&graph).unwrap();
    store
}

// Diamond: a -> b -> d (weights 1, 1) and a -> c -> d (weights 3, 3)
fn diamond() -> GraphStore {
    let mut graph = KnowledgeGraph::new("proj", "/work/proj");
    for id in ["a", "b", "c", "d"] {
        graph
            .add_node(helpers::file_node(id, id, format!("src/{id}.rs"), "rust"))
            .unwrap();
    }
    graph.add_relationship(helpers::imports("a", "b")).unwrap();
    graph.add_relationship(helpers::imports("b", "d")).unwrap();
    graph
        .add_relationship(helpers::relate("a", "c", RelationType::Calls, 3.0))
        .unwrap();
    graph
        .add_relationship(helpers::relate("c", "d", RelationType::Calls, 3.0))
        .unwrap();

    let mut store = GraphStore::in_memory();
    store.store_graph(&graph).unwrap();
    store
}

#[test]
fn test_shortest_path_follows_relationships_backwards() {
    // utils <- main: traversal adjacency is direction-agnostic
    let mut graph = KnowledgeGraph::new("proj", "/work/proj");
    graph
        .add_node(helpers::file_node("utils", "utils", "src/utils.rs", "rust"))
        .unwrap();
    graph
        .add_node(helpers::file_node("main", "main", "src/main.rs", "rust"))
        .unwrap();
    graph
        .add_relationship(helpers::imports("utils", "main"))
        .unwrap();
    let mut store = GraphStore::in_memory();
    store.store_graph(&graph).unwrap();

    let engine = QueryEngine::new();
    let path = engine
        .shortest_path(&store, "proj", "main", "utils", 2, None)
        .unwrap()
        .unwrap();

    assert_eq!(path.path, vec!["main".to_string(), "utils".to_string()]);
    assert_eq!(path.depth, 1);
    assert_eq!(path.score, 1.0);
    assert_eq!(path.relationships.len(), 1);
}

#[test]
fn test_shortest_path_to_self_is_zero_hops() {
    let store = linear_chain();
    let engine = QueryEngine::new();

    let path = engine
        .shortest_path(&store, "proj", "a", "a", 5, None)
        .unwrap()
        .unwrap();
    assert_eq!(path.path, vec!["a".to_string()]);
    assert_eq!(path.depth, 0);
    assert_eq!(path.score, 0.0);
    assert!(path.relationships.is_empty());
}

#[test]
fn test_shortest_path_respects_max_depth() {
    let store = linear_chain();
    let engine = QueryEngine::new();

    // a..d is 3 hops; depth 2 is not enough, absence is a normal outcome
    assert!(engine
        .shortest_path(&store, "proj", "a", "d", 2, None)
        .unwrap()
        .is_none());

    let path = engine
        .shortest_path(&store, "proj", "a", "d", 3, None)
        .unwrap()
        .unwrap();
    assert_eq!(path.depth, 3);
    assert_eq!(path.visited.len(), 4);
}

#[test]
fn test_shortest_path_unknown_endpoint_is_none() {
    let store = linear_chain();
    let engine = QueryEngine::new();

    assert!(engine
        .shortest_path(&store, "proj", "a", "ghost", 5, None)
        .unwrap()
        .is_none());
}

#[test]
fn test_shortest_path_type_filter() {
    let store = diamond();
    let engine = QueryEngine::new();

    // Restricted to Calls, only the a -> c -> d branch is usable
    let path = engine
        .shortest_path(&store, "proj", "a", "d", 5, Some(&[RelationType::Calls]))
        .unwrap()
        .unwrap();
    assert_eq!(
        path.path,
        vec!["a".to_string(), "c".to_string(), "d".to_string()]
    );
    assert_eq!(path.score, 6.0);
}

#[test]
fn test_all_paths_enumerates_and_sorts_by_score() {
    let store = diamond();
    let engine = QueryEngine::new();

    let paths = engine
        .all_paths(&store, "proj", "a", "d", 5, 10, None)
        .unwrap();
    assert_eq!(paths.len(), 2);
    // Heavier branch first
    assert_eq!(paths[0].score, 6.0);
    assert_eq!(
        paths[0].nodes,
        vec!["a".to_string(), "c".to_string(), "d".to_string()]
    );
    assert_eq!(paths[1].score, 2.0);
}

#[test]
fn test_all_paths_result_cap() {
    let store = diamond();
    let engine = QueryEngine::new();

    let paths = engine
        .all_paths(&store, "proj", "a", "d", 5, 1, None)
        .unwrap();
    assert_eq!(paths.len(), 1);
}

#[test]
fn test_shortest_path_never_longer_than_any_full_path() {
    let store = diamond();
    let engine = QueryEngine::new();

    let shortest = engine
        .shortest_path(&store, "proj", "a", "d", 5, None)
        .unwrap()
        .unwrap();
    let all = engine
        .all_paths(&store, "proj", "a", "d", 5, 10, None)
        .unwrap();

    assert!(!all.is_empty());
    for path in all {
        assert!(shortest.depth <= path.nodes.len() - 1);
    }
}

#[test]
fn test_all_paths_handles_cycles() {
    // a -> b -> c -> a plus c -> d
    let mut graph = KnowledgeGraph::new("proj", "/work/proj");
    for id in ["a", "b", "c", "d"] {
        graph
            .add_node(helpers::file_node(id, id, format!("src/{id}.rs"), "rust"))
            .unwrap();
    }
    graph.add_relationship(helpers::imports("a", "b")).unwrap();
    graph.add_relationship(helpers::imports("b", "c")).unwrap();
    graph.add_relationship(helpers::imports("c", "a")).unwrap();
    graph.add_relationship(helpers::imports("c", "d")).unwrap();
    let mut store = GraphStore::in_memory();
    store.store_graph(&graph).unwrap();

    let engine = QueryEngine::new();
    let paths = engine
        .all_paths(&store, "proj", "a", "d", 10, 100, None)
        .unwrap();

    // Simple paths only: a-b-c-d and a-c-d (via the undirected c -> a edge)
    assert_eq!(paths.len(), 2);
    for path in &paths {
        let mut seen = std::collections::HashSet::new();
        assert!(path.nodes.iter().all(|n| seen.insert(n.clone())));
    }
}

#[test]
fn test_radius_search_distances() {
    let store = linear_chain();
    let engine = QueryEngine::new();

    let distances = engine
        .radius_search(&store, "proj", "b", 2, None)
        .unwrap();

    assert_eq!(distances.get("b"), Some(&0));
    assert_eq!(distances.get("a"), Some(&1));
    assert_eq!(distances.get("c"), Some(&1));
    assert_eq!(distances.get("d"), Some(&2));
}

#[test]
fn test_radius_search_bounds() {
    let store = linear_chain();
    let engine = QueryEngine::new();

    let distances = engine
        .radius_search(&store, "proj", "a", 1, None)
        .unwrap();
    assert_eq!(distances.len(), 2);
    assert!(distances.contains_key("a"));
    assert!(distances.contains_key("b"));
}

#[test]
fn test_radius_search_type_filter() {
    let store = diamond();
    let engine = QueryEngine::new();

    let distances = engine
        .radius_search(&store, "proj", "a", 3, Some(&[RelationType::Imports]))
        .unwrap();
    // Imports only: a, b, d reachable; c is behind Calls edges
    assert_eq!(distances.len(), 3);
    assert!(!distances.contains_key("c"));
}
