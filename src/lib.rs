//! # codeatlas
//!
//! A durable knowledge graph of your codebase: nodes are source artifacts
//! (files, modules, functions, classes) carrying structural and semantic
//! metadata; relationships are typed, weighted, directed edges between
//! them. Built for navigation, impact analysis, similarity search, and
//! codebase-understanding queries in developer tooling.
//!
//! ## Core Principles
//!
//! - **Generator Agnostic**: bring your own static analysis, we store and query the graph
//! - **Snapshot Isolation**: every query runs against one immutable loaded snapshot
//! - **Bounded Everything**: traversals take explicit depth/result caps, caches have fixed capacity
//! - **Persistence Primary**: durable per-project storage with RocksDB
//!
//! ## Architecture
//!
//! ```text
//! Integration (editors, watchers, generators)
//!     ↓
//! QueryEngine (structured query, traversal, search, similarity, aggregation)
//!     ↓
//! GraphSnapshot (arena + adjacency indices, built per load)
//!     ↓
//! GraphStore (one durable record per project graph)
//!     ↓
//! Storage Backend (RocksDB, memory)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codeatlas::{helpers, GraphQuery, GraphStore, KnowledgeGraph, QueryEngine};
//!
//! # fn main() -> codeatlas::Result<()> {
//! let mut store = GraphStore::in_memory();
//! store.initialize()?;
//!
//! let mut graph = KnowledgeGraph::new("my-project", "/work/my-project");
//! graph.add_node(helpers::file_node("utils", "utils", "src/utils.rs", "rust"))?;
//! graph.add_node(helpers::file_node("main", "main", "src/main.rs", "rust"))?;
//! graph.add_relationship(helpers::imports("main", "utils"))?;
//! store.store_graph(&graph)?;
//!
//! let engine = QueryEngine::new();
//! let result = engine.execute_query(&store, "my-project", &GraphQuery::nodes())?;
//! assert_eq!(result.total_count, 2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod engine;
pub mod error;
pub mod helpers;
pub mod measures;
pub mod model;
pub mod store;

// Re-export main types
pub use engine::{
    AggregateOp, AggregateResult, AggregateSpec, Condition, ConditionOperator, GraphQuery,
    QueryEngine, QueryResult, SearchField, SearchRequest, SimilarityWeights,
};
pub use error::{AtlasError, Result};
pub use model::{
    Direction, KnowledgeGraph, KnowledgeNode, NodeType, RelationType, Relationship, Severity,
};
pub use store::{GraphStore, MemoryBackend, NodeFilter, StorageBackend};
#[cfg(feature = "rocksdb-backend")]
pub use store::RocksDBBackend;
