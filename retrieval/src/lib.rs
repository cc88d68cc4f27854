//! # Retrieval
//!
//! The retrieval service ties the recall stack together:
//!
//! - **Knowledge Store**: persisted facts and QA pairs with cached embeddings
//! - **Embedding Provider**: query and entry vectorization
//! - **Ranker**: cosine-scored top-k matching with a confidence threshold
//!
//! ## Usage
//!
//! ```rust,ignore
//! use recall_retrieval::{RetrievalConfig, RetrievalService};
//!
//! let config = RetrievalConfig::new("memory.json");
//! let service = RetrievalService::new(config).await?;
//!
//! service.ingest("fact: the backup job runs nightly at 03:00").await?;
//! let reply = service.query("when do backups run?").await?;
//! ```
//!
//! The host (chat platform connection, command parsing, message delivery)
//! stays outside this crate; it maps [`IngestOutcome`] and [`QueryReply`]
//! onto user-visible messages.

pub mod config;
pub mod engine;
pub mod error;
pub mod ranker;

pub use config::{EmbeddingConfig, EmbeddingProviderType, RetrievalConfig};
pub use engine::{IngestOutcome, QueryReply, RetrievalService};
pub use error::{Result, RetrievalError};
pub use ranker::{RankedMatch, rank};

// Re-export from dependencies for convenience
pub use recall_embeddings::{EmbeddingProvider, HashingProvider, OpenAiProvider};
pub use recall_knowledge::{Entry, EntryKind, KnowledgeStore};
