//! Error types for codeatlas operations.
//!
//! All fallible operations return [`Result<T>`] with context-rich error messages.

use thiserror::Error;

/// Result type alias for codeatlas operations.
pub type Result<T> = std::result::Result<T, AtlasError>;

/// Comprehensive error type for store and query-engine operations.
///
/// Absence of results (no path, no matches) is never an error; only
/// malformed input and storage I/O failures surface here. Storage errors
/// are retryable and propagated unchanged.
#[derive(Error, Debug)]
pub enum AtlasError {
    /// Storage backend error (RocksDB, file I/O, etc.)
    #[error("Storage error: {message}")]
    Storage {
        /// Detailed error message
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error details
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No graph persisted under the given id
    #[error("Graph not found: {graph_id}")]
    GraphNotFound {
        /// Id of the missing graph
        graph_id: String,
    },

    /// Node not found in the graph
    #[error("Node not found: {node_id}")]
    NodeNotFound {
        /// Id of the missing node
        node_id: String,
    },

    /// Malformed query or selector
    #[error("Validation error: {message}")]
    Validation {
        /// Description of what is malformed
        message: String,
    },
}

impl AtlasError {
    /// Create a storage error from a message and optional source.
    pub fn storage<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Create a serialization error from a message and optional source.
    pub fn serialization<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Serialization {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }
}
