//! Durable per-project graph persistence.
//!
//! This module defines the [`StorageBackend`] trait and the [`GraphStore`]
//! built on top of it:
//! - [`RocksDBBackend`]: production-ready persistent storage
//! - [`MemoryBackend`]: in-memory storage for testing
//!
//! One durable record per graph id: `graph:{id}` holds the complete JSON
//! snapshot, `meta:{id}` a small version/timestamp header for cheap listing.
//! Graphs are independent — storing one never touches another.
//!
//! ## Design Philosophy
//!
//! - **Persistence Primary**: RocksDB is the default, memory backend only for tests
//! - **Atomic Replacement**: snapshot writes commit in one batch, a reader never
//!   observes a partially written graph
//! - **No Cleverness**: lookup and attribute scans only; traversal and scoring
//!   live in the query engine

mod memory;
#[cfg(feature = "rocksdb-backend")]
mod rocksdb_backend;

pub use memory::MemoryBackend;
#[cfg(feature = "rocksdb-backend")]
pub use rocksdb_backend::RocksDBBackend;

use crate::error::{AtlasError, Result};
use crate::model::{Direction, KnowledgeGraph, KnowledgeNode, NodeType, RelationType, Relationship};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// Key-value pair returned by prefix scans.
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// Trait defining the storage backend interface.
///
/// All operations are explicit and return `Result` to handle failures.
/// Implementations must ensure crash-safety and atomic batch writes.
pub trait StorageBackend: Send + Sync {
    /// Store a key-value pair.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Storage`] if the write fails.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Retrieve a value by key. `Ok(None)` if the key doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Storage`] if the read fails.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Delete a key-value pair. Idempotent — no error for a missing key.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Storage`] if the delete fails.
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    /// Check if a key exists.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Storage`] if the check fails.
    fn exists(&self, key: &[u8]) -> Result<bool>;

    /// All key-value pairs whose keys start with the given prefix.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Storage`] if iteration fails.
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KeyValue>>;

    /// Execute a batch of write operations atomically.
    ///
    /// Either all operations succeed or none do.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Storage`] if any operation in the batch fails.
    fn write_batch(&mut self, operations: Vec<BatchOperation>) -> Result<()>;

    /// Flush any buffered writes to disk. Explicit — no automatic flushing.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Storage`] if flush fails.
    fn flush(&mut self) -> Result<()>;
}

/// Batch write operation for atomic updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BatchOperation {
    /// Put a key-value pair
    Put {
        /// Key to write
        key: Vec<u8>,
        /// Value to write
        value: Vec<u8>,
    },
    /// Delete a key
    Delete {
        /// Key to delete
        key: Vec<u8>,
    },
}

/// Exact-match attribute criteria for node scans.
///
/// Every set field must match; unset fields are ignored. `path_prefix` is
/// the one prefix (not equality) criterion.
#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    node_type: Option<NodeType>,
    name: Option<String>,
    path: Option<String>,
    path_prefix: Option<String>,
    language: Option<String>,
    tag: Option<String>,
}

impl NodeFilter {
    /// Create an empty filter that matches every node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require an exact node type.
    pub fn with_type(mut self, node_type: NodeType) -> Self {
        self.node_type = Some(node_type);
        self
    }

    /// Require an exact name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Require an exact project-relative path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Require the project-relative path to start with a prefix.
    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = Some(prefix.into());
        self
    }

    /// Require an exact language in the metadata block.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Require a tag to be present.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Whether a node satisfies every set criterion.
    pub fn matches(&self, node: &KnowledgeNode) -> bool {
        if let Some(node_type) = self.node_type {
            if node.node_type != node_type {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if &node.name != name {
                return false;
            }
        }
        if let Some(path) = &self.path {
            if &node.path != path {
                return false;
            }
        }
        if let Some(prefix) = &self.path_prefix {
            if !node.path.starts_with(prefix.as_str()) {
                return false;
            }
        }
        if let Some(language) = &self.language {
            if node.metadata.language.as_deref() != Some(language.as_str()) {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !node.tags.contains(tag) {
                return false;
            }
        }
        true
    }
}

/// Version/timestamp header stored next to each graph record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphMeta {
    version: u64,
    updated_at: u64,
}

const FORMAT_KEY: &[u8] = b"atlas:format";
const FORMAT_VERSION: &[u8] = b"1";

fn graph_key(graph_id: &str) -> Vec<u8> {
    format!("graph:{graph_id}").into_bytes()
}

fn meta_key(graph_id: &str) -> Vec<u8> {
    format!("meta:{graph_id}").into_bytes()
}

/// Durable store holding one graph record per project id.
///
/// Provides persistence plus the simple lookup surface consumed by the
/// query engine and the integration layer: attribute scans and
/// relationship lookup by node, type, and direction.
pub struct GraphStore {
    backend: Box<dyn StorageBackend>,
}

impl GraphStore {
    /// Create a store over an explicit backend.
    pub fn with_backend(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Open a persistent store at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Storage`] if the database cannot be opened.
    #[cfg(feature = "rocksdb-backend")]
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        log::info!("Opening graph store at path: {:?}", path.as_ref());
        let backend = RocksDBBackend::open(path)?;
        let mut store = Self::with_backend(Box::new(backend));
        store.initialize()?;
        Ok(store)
    }

    /// Create an in-memory store for testing.
    ///
    /// **Warning**: All data is lost when the store is dropped.
    pub fn in_memory() -> Self {
        Self::with_backend(Box::new(MemoryBackend::new()))
    }

    /// Prepare the storage location. Idempotent, safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Storage`] if the marker write fails.
    pub fn initialize(&mut self) -> Result<()> {
        if !self.backend.exists(FORMAT_KEY)? {
            debug!("Initializing graph store");
            self.backend.put(FORMAT_KEY, FORMAT_VERSION)?;
        }
        Ok(())
    }

    /// Persist a full snapshot keyed by `graph.id`, replacing any prior
    /// version.
    ///
    /// The record and its meta header commit in one atomic batch, so a
    /// reader either sees the previous snapshot or the new one — never a
    /// partial write. On failure the previous version stays intact.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Serialization`] if encoding fails, or
    /// [`AtlasError::Storage`] on I/O failure (retryable).
    pub fn store_graph(&mut self, graph: &KnowledgeGraph) -> Result<()> {
        debug!(
            "Storing graph {} (version {}, {} nodes, {} relationships)",
            graph.id,
            graph.version,
            graph.nodes.len(),
            graph.relationships.len()
        );

        let record = serde_json::to_vec(graph)
            .map_err(|e| AtlasError::serialization("Failed to serialize graph", Some(e)))?;
        let meta = serde_json::to_vec(&GraphMeta {
            version: graph.version,
            updated_at: graph.updated_at,
        })
        .map_err(|e| AtlasError::serialization("Failed to serialize graph meta", Some(e)))?;

        self.backend.write_batch(vec![
            BatchOperation::Put {
                key: graph_key(&graph.id),
                value: record,
            },
            BatchOperation::Put {
                key: meta_key(&graph.id),
                value: meta,
            },
        ])?;
        trace!("Graph {} stored", graph.id);

        Ok(())
    }

    /// Load the current snapshot for a graph id.
    ///
    /// A missing id is a normal outcome: `Ok(None)`, never an error.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Storage`] on I/O failure or
    /// [`AtlasError::Serialization`] if the record cannot be decoded.
    pub fn load_graph(&self, graph_id: &str) -> Result<Option<KnowledgeGraph>> {
        let Some(record) = self.backend.get(&graph_key(graph_id))? else {
            trace!("Graph {graph_id} not found");
            return Ok(None);
        };

        let graph: KnowledgeGraph = serde_json::from_slice(&record)
            .map_err(|e| AtlasError::serialization("Failed to deserialize graph", Some(e)))?;
        Ok(Some(graph))
    }

    /// Delete a graph record. Idempotent — deleting a missing id succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Storage`] on I/O failure.
    pub fn delete_graph(&mut self, graph_id: &str) -> Result<()> {
        debug!("Deleting graph {graph_id}");
        self.backend.write_batch(vec![
            BatchOperation::Delete {
                key: graph_key(graph_id),
            },
            BatchOperation::Delete {
                key: meta_key(graph_id),
            },
        ])
    }

    /// Whether a graph record exists for the id.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Storage`] on I/O failure.
    pub fn contains_graph(&self, graph_id: &str) -> Result<bool> {
        self.backend.exists(&graph_key(graph_id))
    }

    /// Ids of all persisted graphs, in key order.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Storage`] on I/O failure.
    pub fn list_graphs(&self) -> Result<Vec<String>> {
        let entries = self.backend.scan_prefix(b"meta:")?;
        Ok(entries
            .into_iter()
            .filter_map(|(key, _)| {
                String::from_utf8(key)
                    .ok()
                    .and_then(|k| k.strip_prefix("meta:").map(str::to_string))
            })
            .collect())
    }

    /// Scan a graph's nodes for exact-match attribute criteria.
    ///
    /// Matches are returned in original insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::GraphNotFound`] for an unknown graph id.
    pub fn search_nodes(&self, graph_id: &str, filter: &NodeFilter) -> Result<Vec<KnowledgeNode>> {
        let graph = self.require_graph(graph_id)?;
        Ok(graph
            .nodes
            .into_iter()
            .filter(|node| filter.matches(node))
            .collect())
    }

    /// Relationships touching a node, optionally filtered by type and
    /// direction.
    ///
    /// `Outgoing` matches the node as source, `Incoming` as target, and
    /// `Both` (or `None`) either endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::GraphNotFound`] for an unknown graph id.
    pub fn find_relationships(
        &self,
        graph_id: &str,
        node_id: &str,
        rel_type: Option<RelationType>,
        direction: Option<Direction>,
    ) -> Result<Vec<Relationship>> {
        let graph = self.require_graph(graph_id)?;
        let direction = direction.unwrap_or(Direction::Both);

        Ok(graph
            .relationships
            .into_iter()
            .filter(|rel| match direction {
                Direction::Outgoing => rel.from == node_id,
                Direction::Incoming => rel.to == node_id,
                Direction::Both => rel.touches(node_id),
            })
            .filter(|rel| rel_type.is_none_or(|t| rel.rel_type == t))
            .collect())
    }

    /// Explicitly flush buffered writes to disk.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Storage`] on I/O failure.
    pub fn flush(&mut self) -> Result<()> {
        self.backend.flush()
    }

    fn require_graph(&self, graph_id: &str) -> Result<KnowledgeGraph> {
        self.load_graph(graph_id)?
            .ok_or_else(|| AtlasError::GraphNotFound {
                graph_id: graph_id.to_string(),
            })
    }
}
