//! The retrieval service.
//!
//! Owns the knowledge store and the embedding provider, and exposes the
//! three operations the host calls: `ingest`, `query`, and
//! `debug_best_match`. Store mutations are serialized behind a write lock so
//! two appends can never interleave a partial file; queries only take the
//! read lock.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use recall_embeddings::{EmbeddingProvider, HashingProvider, OpenAiProvider};
use recall_knowledge::{EntryKind, KnowledgeError, KnowledgeStore, TrainingInput};
use recall_knowledge::{parse_train_command, parse_training};

use crate::config::{EmbeddingProviderType, RetrievalConfig};
use crate::error::Result;
use crate::ranker::{RankedMatch, rank};

/// Outcome of an ingestion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A fact block was chunked and stored.
    Fact { chunks_saved: usize },

    /// A single QA pair was stored.
    Qa,

    /// The text looked like training input but failed validation; nothing
    /// was stored.
    Rejected { reason: String },

    /// Not training input at all; the host should route it to retrieval.
    Ignored,
}

/// Reply produced for a query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryReply {
    /// The store is empty; there is nothing to match against.
    NoCandidates,

    /// The best match scored below the confidence threshold. The host must
    /// not present it as an answer.
    BelowThreshold { score: f32 },

    /// The top match is a QA pair; its answer is the sole output.
    Answer(String),

    /// Combined context built from the confident facts in the top-k.
    Context(String),
}

/// Retrieval service combining store, embeddings, and ranking.
pub struct RetrievalService {
    /// Configuration.
    config: RetrievalConfig,

    /// The knowledge store, shared with nothing else.
    store: Arc<RwLock<KnowledgeStore>>,

    /// Embedding provider.
    provider: Arc<dyn EmbeddingProvider>,
}

impl RetrievalService {
    /// Create a service from configuration, building the configured
    /// embedding provider.
    pub async fn new(config: RetrievalConfig) -> Result<Self> {
        let provider: Arc<dyn EmbeddingProvider> = match config.embedding.provider {
            EmbeddingProviderType::OpenAi => {
                let mut provider = OpenAiProvider::new();
                if let Some(model) = &config.embedding.model {
                    provider = provider.with_model(model);
                }
                if let Some(base) = &config.embedding.api_base {
                    provider = provider.with_base_url(base);
                }
                Arc::new(provider)
            }
            EmbeddingProviderType::Hashing => Arc::new(HashingProvider::new()),
        };

        Self::with_provider(config, provider).await
    }

    /// Create a service with an explicit provider.
    ///
    /// Loads the store and backfills embeddings for legacy entries before
    /// the service becomes visible to callers, so every stored entry
    /// participates in ranking from the first query on.
    pub async fn with_provider(
        config: RetrievalConfig,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        let mut store = KnowledgeStore::load(&config.store_path).await?;
        store.backfill_embeddings(provider.as_ref()).await?;

        info!(
            "Retrieval service ready: {} entries, provider {}",
            store.len(),
            provider.name()
        );

        Ok(Self {
            config,
            store: Arc::new(RwLock::new(store)),
            provider,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Ingest raw training text.
    ///
    /// Malformed training input is reported as [`IngestOutcome::Rejected`]
    /// with a user-facing reason and mutates nothing. Text that is not
    /// training input at all is [`IngestOutcome::Ignored`].
    pub async fn ingest(&self, raw: &str) -> Result<IngestOutcome> {
        let parsed = match parse_training(raw, self.config.min_chunk_len) {
            Ok(parsed) => parsed,
            Err(KnowledgeError::MalformedInput(reason)) => {
                debug!("Rejected training input: {reason}");
                return Ok(IngestOutcome::Rejected { reason });
            }
            Err(e) => return Err(e.into()),
        };

        match parsed {
            None => Ok(IngestOutcome::Ignored),
            Some(TrainingInput::Facts(chunks)) => {
                let chunks_saved = chunks.len();
                let mut store = self.store.write().await;
                for content in chunks {
                    store
                        .append(EntryKind::Fact { content }, self.provider.as_ref())
                        .await?;
                }
                info!("Stored {chunks_saved} fact chunks");
                Ok(IngestOutcome::Fact { chunks_saved })
            }
            Some(TrainingInput::Qa { question, answer }) => {
                let mut store = self.store.write().await;
                store
                    .append(EntryKind::Qa { question, answer }, self.provider.as_ref())
                    .await?;
                info!("Stored QA pair");
                Ok(IngestOutcome::Qa)
            }
        }
    }

    /// Ingest an admin `question || answer` training command.
    pub async fn ingest_qa_command(&self, text: &str) -> Result<IngestOutcome> {
        let (question, answer) = match parse_train_command(text) {
            Ok(pair) => pair,
            Err(KnowledgeError::MalformedInput(reason)) => {
                return Ok(IngestOutcome::Rejected { reason });
            }
            Err(e) => return Err(e.into()),
        };

        let mut store = self.store.write().await;
        store
            .append(EntryKind::Qa { question, answer }, self.provider.as_ref())
            .await?;
        Ok(IngestOutcome::Qa)
    }

    /// Answer a free-text query from the knowledge store.
    pub async fn query(&self, text: &str) -> Result<QueryReply> {
        let matches = self.ranked_matches(text, self.config.top_k).await?;

        let Some(top) = matches.first() else {
            return Ok(QueryReply::NoCandidates);
        };

        // Non-strict comparison: a score equal to the threshold is confident
        if top.score < self.config.min_similarity {
            debug!("Best match below threshold: {:.2}", top.score);
            return Ok(QueryReply::BelowThreshold { score: top.score });
        }

        if let Some(answer) = top.entry.kind.answer() {
            return Ok(QueryReply::Answer(answer.to_string()));
        }

        // Build combined context from the confident facts in the top-k;
        // below-threshold entries are excluded even though they ranked.
        let lines: Vec<String> = matches
            .iter()
            .filter(|m| m.score >= self.config.min_similarity)
            .filter_map(|m| m.entry.kind.fact_content())
            .map(|content| format!("• {content}"))
            .collect();

        let combined = truncate_reply(lines.join("\n"), self.config.max_reply_len);
        Ok(QueryReply::Context(combined))
    }

    /// Diagnostic: the single best match and its score, if any entry exists.
    pub async fn debug_best_match(&self, text: &str) -> Result<Option<RankedMatch>> {
        let matches = self.ranked_matches(text, 1).await?;
        Ok(matches.into_iter().next())
    }

    async fn ranked_matches(&self, text: &str, k: usize) -> Result<Vec<RankedMatch>> {
        let query_embedding = self.provider.embed(text).await?;
        let store = self.store.read().await;
        rank(&query_embedding, store.entries(), k)
    }
}

/// Cap a combined reply at `max_len` characters, marking the cut.
fn truncate_reply(reply: String, max_len: usize) -> String {
    if reply.chars().count() <= max_len {
        return reply;
    }

    const MARKER: &str = "\n... (truncated)";
    let keep = max_len.saturating_sub(MARKER.chars().count());
    let cut: String = reply.chars().take(keep).collect();
    format!("{cut}{MARKER}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_truncate_reply_short_text_untouched() {
        let reply = truncate_reply("• short".to_string(), 2000);
        assert_eq!(reply, "• short");
    }

    #[test]
    fn test_truncate_reply_marks_the_cut() {
        let long = "x".repeat(100);
        let reply = truncate_reply(long, 50);
        assert!(reply.ends_with("... (truncated)"));
        assert!(reply.chars().count() <= 50);
    }
}
