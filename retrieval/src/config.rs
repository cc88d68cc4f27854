//! Configuration for the retrieval service.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the retrieval service.
///
/// The similarity threshold and chunking bounds varied across historical
/// deployments of this system (0.30 vs 0.45 thresholds, different splitting
/// rules), so all of them are plain configuration rather than constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Path of the persisted knowledge store file.
    pub store_path: PathBuf,

    /// Channel the host routes training submissions from. Routing hint only.
    pub training_channel: String,

    /// Channel the host reports unmatched queries to. Routing hint only.
    pub log_channel: String,

    /// Minimum similarity for a match to count as confident. Non-strict:
    /// a score exactly equal to the threshold is a match.
    pub min_similarity: f32,

    /// Number of ranked matches to consider.
    pub top_k: usize,

    /// Minimum character count for a fact chunk to be stored.
    pub min_chunk_len: usize,

    /// Maximum combined-reply length before truncation.
    pub max_reply_len: usize,

    /// Embedding provider configuration.
    pub embedding: EmbeddingConfig,
}

impl RetrievalConfig {
    /// Create a configuration with default tunables for the given store path.
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            training_channel: "bot-training".to_string(),
            log_channel: "bot-log".to_string(),
            min_similarity: 0.45,
            top_k: 3,
            min_chunk_len: 16,
            max_reply_len: 2000,
            embedding: EmbeddingConfig::default(),
        }
    }

    /// Set the similarity threshold.
    pub fn with_min_similarity(mut self, threshold: f32) -> Self {
        self.min_similarity = threshold;
        self
    }

    /// Set the number of ranked matches to consider.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the embedding configuration.
    pub fn with_embedding(mut self, embedding: EmbeddingConfig) -> Self {
        self.embedding = embedding;
        self
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self::new("memory.json")
    }
}

/// Configuration for the embedding provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Which provider to use.
    pub provider: EmbeddingProviderType,

    /// Model to use (remote providers only).
    pub model: Option<String>,

    /// API base URL override (remote providers only).
    pub api_base: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderType::Hashing,
            model: None,
            api_base: None,
        }
    }
}

/// Type of embedding provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderType {
    /// OpenAI embeddings API.
    OpenAi,
    /// Deterministic local token-hashing embeddings.
    Hashing,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = RetrievalConfig::default();
        assert_eq!(config.min_similarity, 0.45);
        assert_eq!(config.top_k, 3);
        assert_eq!(config.min_chunk_len, 16);
        assert_eq!(config.max_reply_len, 2000);
        assert_eq!(config.training_channel, "bot-training");
    }

    #[test]
    fn test_config_round_trip() {
        let config = RetrievalConfig::new("kb.json").with_min_similarity(0.30);
        let json = serde_json::to_string(&config).unwrap();
        let back: RetrievalConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.min_similarity, 0.30);
        assert_eq!(back.store_path, PathBuf::from("kb.json"));
    }
}
