//! Error types for the knowledge store.

use thiserror::Error;

/// Result type alias for knowledge operations.
pub type Result<T> = std::result::Result<T, KnowledgeError>;

/// Errors that can occur in the knowledge store and ingestion pipeline.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    /// Persisted store could not be parsed. Recovered internally by falling
    /// back to an empty store; surfaced only in logs.
    #[error("store corrupt: {0}")]
    StoreCorrupt(String),

    /// Write to durable storage failed.
    #[error("persistence failed: {0}")]
    Persistence(String),

    /// Training input looked like training but failed shape validation.
    #[error("malformed training input: {0}")]
    MalformedInput(String),

    /// Embedding error.
    #[error("embedding error: {0}")]
    Embedding(#[from] recall_embeddings::EmbeddingError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
