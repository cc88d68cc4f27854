//! # Embeddings
//!
//! Sentence embedding generation and similarity math for the recall
//! retrieval stack.
//!
//! - **Embedding Generation**: turn short text into dense vectors via a
//!   remote API or a deterministic local fallback
//! - **Similarity**: cosine similarity between cached vectors
//!
//! Embedding is the only expensive operation in the stack, so providers are
//! async and callers are expected to cache the result (the knowledge store
//! persists one vector per entry and never recomputes it).

pub mod error;
pub mod provider;
pub mod similarity;

pub use error::{EmbeddingError, Result};
pub use provider::{EmbeddingProvider, HashingProvider, OpenAiProvider};
pub use similarity::{cosine_similarity, normalize};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension of the local hashing provider (matches all-MiniLM-L6-v2).
pub const HASHING_DIMENSION: usize = 384;

/// Dimension of OpenAI's text-embedding-3-small.
pub const OPENAI_SMALL_DIMENSION: usize = 1536;
