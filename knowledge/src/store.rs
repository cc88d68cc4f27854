//! Knowledge store persistence.
//!
//! The `KnowledgeStore` owns the ordered entry sequence and keeps it in sync
//! with a single JSON file on disk. The file is pretty-printed so it can be
//! inspected and hand-corrected between runs.

use std::path::{Path, PathBuf};

use recall_embeddings::EmbeddingProvider;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::entry::{Entry, EntryKind};
use crate::error::{KnowledgeError, Result};

/// Append-only store of knowledge entries, persisted as a JSON array.
pub struct KnowledgeStore {
    /// Path of the persisted store file.
    path: PathBuf,

    /// In-memory entry sequence, insertion-ordered.
    entries: Vec<Entry>,
}

impl KnowledgeStore {
    /// Load the store from disk.
    ///
    /// A missing file initializes an empty store and persists it. An
    /// unparsable file is logged and recovered as an empty in-memory store;
    /// the file itself is left untouched so it can be corrected manually
    /// (the next successful mutation rewrites it).
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !fs::try_exists(&path).await? {
            let store = Self {
                path,
                entries: Vec::new(),
            };
            store.persist().await?;
            info!("Initialized empty knowledge store");
            return Ok(store);
        }

        let content = fs::read_to_string(&path).await?;
        let entries = match Self::parse(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("{e} - continuing with an empty store");
                Vec::new()
            }
        };

        info!("Loaded {} knowledge entries", entries.len());
        Ok(Self { path, entries })
    }

    /// Parse the persisted representation, treating mixed embedding
    /// dimensionalities as corruption.
    fn parse(content: &str) -> std::result::Result<Vec<Entry>, KnowledgeError> {
        let entries: Vec<Entry> = serde_json::from_str(content)
            .map_err(|e| KnowledgeError::StoreCorrupt(e.to_string()))?;

        let mut dimension = None;
        for entry in &entries {
            if let Some(emb) = &entry.embedding {
                match dimension {
                    None => dimension = Some(emb.len()),
                    Some(d) if d != emb.len() => {
                        return Err(KnowledgeError::StoreCorrupt(format!(
                            "mixed embedding dimensions: {d} and {}",
                            emb.len()
                        )));
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(entries)
    }

    /// The stored entries, in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compute the entry's embedding, append it, and persist.
    ///
    /// The append is atomic from the caller's point of view: if the persist
    /// fails the in-memory push is rolled back and the error is returned, so
    /// memory and disk never diverge.
    pub async fn append(
        &mut self,
        kind: EntryKind,
        provider: &dyn EmbeddingProvider,
    ) -> Result<()> {
        let embedding = provider.embed(kind.canonical_text()).await?;
        self.entries.push(Entry::new(kind, embedding));

        if let Err(e) = self.persist().await {
            self.entries.pop();
            return Err(e);
        }

        debug!("Appended entry {} to knowledge store", self.entries.len());
        Ok(())
    }

    /// Compute embeddings for legacy entries that lack one.
    ///
    /// Persists once, batched, if anything was backfilled. Returns the
    /// number of entries updated.
    pub async fn backfill_embeddings(
        &mut self,
        provider: &dyn EmbeddingProvider,
    ) -> Result<usize> {
        let mut backfilled = 0;

        for entry in &mut self.entries {
            if entry.embedding.is_none() {
                let embedding = provider.embed(entry.kind.canonical_text()).await?;
                entry.embedding = Some(embedding);
                backfilled += 1;
            }
        }

        if backfilled > 0 {
            self.persist().await?;
            info!("Backfilled embeddings for {backfilled} legacy entries");
        }

        Ok(backfilled)
    }

    /// Write the full store to disk atomically (temp file + rename).
    async fn persist(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.entries)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    KnowledgeError::Persistence(format!("{}: {e}", parent.display()))
                })?;
            }
        }

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &content)
            .await
            .map_err(|e| KnowledgeError::Persistence(format!("{}: {e}", temp_path.display())))?;

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| KnowledgeError::Persistence(format!("{}: {e}", self.path.display())))?;

        debug!("Persisted {} entries", self.entries.len());
        Ok(())
    }
}
