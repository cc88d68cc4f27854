//! Error types for the retrieval service.

use thiserror::Error;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur in the retrieval service.
///
/// All of these are recoverable at the ingest/query boundary; the host
/// converts them into user-visible messages rather than terminating.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Knowledge store error.
    #[error("knowledge error: {0}")]
    Knowledge(#[from] recall_knowledge::KnowledgeError),

    /// Embedding error.
    #[error("embedding error: {0}")]
    Embedding(#[from] recall_embeddings::EmbeddingError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
