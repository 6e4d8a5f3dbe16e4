//! Integration tests for the RocksDB-backed store: durability across
//! reopens, atomic replacement, and per-graph isolation.

use codeatlas::{helpers, GraphStore, KnowledgeGraph, NodeFilter, NodeType};
use tempfile::TempDir;

fn sample_graph(id: &str, node_count: usize) -> KnowledgeGraph {
    let mut graph = KnowledgeGraph::new(id, format!("/work/{id}"));
    for i in 0..node_count {
        graph
            .add_node(helpers::file_node(
                format!("f{i}"),
                format!("f{i}"),
                format!("src/f{i}.rs"),
                "rust",
            ))
            .unwrap();
    }
    for i in 1..node_count {
        graph
            .add_relationship(helpers::imports(format!("f{}", i - 1), format!("f{i}")))
            .unwrap();
    }
    graph.recompute_stats();
    graph
}

#[test]
fn test_graph_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("atlas.db");

    {
        let mut store = GraphStore::open(&path).unwrap();
        store.store_graph(&sample_graph("proj", 5)).unwrap();
        store.flush().unwrap();
    }

    let store = GraphStore::open(&path).unwrap();
    let graph = store.load_graph("proj").unwrap().unwrap();
    assert_eq!(graph.nodes.len(), 5);
    assert_eq!(graph.relationships.len(), 4);
    assert_eq!(graph.stats.average_connectivity, 0.8);
}

#[test]
fn test_store_replaces_snapshot_completely() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = GraphStore::open(temp_dir.path()).unwrap();

    store.store_graph(&sample_graph("proj", 8)).unwrap();

    let mut smaller = sample_graph("proj", 3);
    smaller.touch(1_700_000_000);
    store.store_graph(&smaller).unwrap();

    // No leftovers from the larger prior version
    let graph = store.load_graph("proj").unwrap().unwrap();
    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.version, 2);
}

#[test]
fn test_projects_do_not_contend() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = GraphStore::open(temp_dir.path()).unwrap();

    store.store_graph(&sample_graph("alpha", 4)).unwrap();
    store.store_graph(&sample_graph("beta", 2)).unwrap();
    store.delete_graph("alpha").unwrap();

    assert!(store.load_graph("alpha").unwrap().is_none());
    assert_eq!(store.load_graph("beta").unwrap().unwrap().nodes.len(), 2);
}

#[test]
fn test_search_after_reopen_preserves_insertion_order() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("atlas.db");

    {
        let mut store = GraphStore::open(&path).unwrap();
        store.store_graph(&sample_graph("proj", 4)).unwrap();
    }

    let store = GraphStore::open(&path).unwrap();
    let nodes = store
        .search_nodes("proj", &NodeFilter::new().with_type(NodeType::File))
        .unwrap();
    let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["f0", "f1", "f2", "f3"]);
}
