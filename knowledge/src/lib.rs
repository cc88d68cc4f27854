//! # Knowledge
//!
//! The durable knowledge base behind the recall retrieval stack.
//!
//! - **Entry**: the atomic knowledge unit, a fact or a question/answer pair,
//!   carrying its cached embedding
//! - **KnowledgeStore**: an append-only, JSON-persisted sequence of entries
//! - **Ingestion**: parsing of raw training text into entries
//!
//! The store is the sole durable state of the system. After every mutation
//! the in-memory sequence and the file on disk are back in sync; a corrupt
//! file is recovered as an empty store rather than crashing the host.

pub mod entry;
pub mod error;
pub mod ingest;
pub mod store;

pub use entry::{Entry, EntryKind};
pub use error::{KnowledgeError, Result};
pub use ingest::{TrainingInput, parse_train_command, parse_training};
pub use store::KnowledgeStore;
