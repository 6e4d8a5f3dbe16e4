//! Unit tests for structural analysis.

use codeatlas::{helpers, GraphStore, KnowledgeGraph, QueryEngine};

fn store_from(graph: KnowledgeGraph) -> GraphStore {
    let mut store = GraphStore::in_memory();
    store.store_graph(&graph).unwrap();
    store
}

// Circular imports: a -> b -> c -> a, plus a detached d
fn circular_graph() -> KnowledgeGraph {
    let mut graph = KnowledgeGraph::new("proj", "/work/proj");
    for id in ["a", "b", "c", "d"] {
        graph
            .add_node(helpers::file_node(id, id, format!("src/{id}.rs"), "rust"))
            .unwrap();
    }
    graph.add_relationship(helpers::imports("a", "b")).unwrap();
    graph.add_relationship(helpers::imports("b", "c")).unwrap();
    graph.add_relationship(helpers::imports("c", "a")).unwrap();
    graph
}

#[test]
fn test_degree_centrality_counts_both_directions() {
    let mut graph = KnowledgeGraph::new("proj", "/work/proj");
    for id in ["hub", "x", "y"] {
        graph
            .add_node(helpers::file_node(id, id, format!("src/{id}.rs"), "rust"))
            .unwrap();
    }
    graph.add_relationship(helpers::imports("hub", "x")).unwrap();
    graph.add_relationship(helpers::imports("y", "hub")).unwrap();
    let store = store_from(graph);

    let report = QueryEngine::new().analyze_structure(&store, "proj").unwrap();

    assert_eq!(report.degree_centrality.get("hub"), Some(&2));
    assert_eq!(report.degree_centrality.get("x"), Some(&1));
    assert_eq!(report.degree_centrality.get("y"), Some(&1));
}

#[test]
fn test_degree_distribution() {
    let store = store_from(circular_graph());

    let report = QueryEngine::new().analyze_structure(&store, "proj").unwrap();

    // a, b, c have degree 2; d has degree 0
    assert_eq!(report.degree_distribution.get(&2), Some(&3));
    assert_eq!(report.degree_distribution.get(&0), Some(&1));
}

#[test]
fn test_scc_detects_import_cycle() {
    let store = store_from(circular_graph());

    let report = QueryEngine::new().analyze_structure(&store, "proj").unwrap();

    assert_eq!(report.strongly_connected_components.len(), 1);
    let scc = &report.strongly_connected_components[0];
    assert_eq!(scc.len(), 3);
    for id in ["a", "b", "c"] {
        assert!(scc.contains(&id.to_string()));
    }
    assert_eq!(report.cycles, report.strongly_connected_components);
}

#[test]
fn test_acyclic_graph_has_no_sccs() {
    let mut graph = KnowledgeGraph::new("proj", "/work/proj");
    for id in ["a", "b", "c"] {
        graph
            .add_node(helpers::file_node(id, id, format!("src/{id}.rs"), "rust"))
            .unwrap();
    }
    graph.add_relationship(helpers::imports("a", "b")).unwrap();
    graph.add_relationship(helpers::imports("b", "c")).unwrap();
    let store = store_from(graph);

    let report = QueryEngine::new().analyze_structure(&store, "proj").unwrap();
    assert!(report.strongly_connected_components.is_empty());
    assert!(report.cycles.is_empty());
}

#[test]
fn test_clustering_on_triangle() {
    // Undirected view of the circular triple is a triangle: fully clustered
    let store = store_from(circular_graph());

    let report = QueryEngine::new().analyze_structure(&store, "proj").unwrap();

    // Three triangle nodes at coefficient 1.0, detached d at 0.0
    assert!((report.average_clustering - 0.75).abs() < 1e-9);
}

#[test]
fn test_empty_graph_report() {
    let store = store_from(KnowledgeGraph::new("proj", "/work/proj"));

    let report = QueryEngine::new().analyze_structure(&store, "proj").unwrap();
    assert!(report.degree_centrality.is_empty());
    assert_eq!(report.average_clustering, 0.0);
}
