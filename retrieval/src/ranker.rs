//! Similarity ranking over the knowledge store.

use ordered_float::OrderedFloat;
use recall_embeddings::{Embedding, cosine_similarity};
use recall_knowledge::Entry;
use tracing::warn;

use crate::error::Result;

/// A scored match from the knowledge store.
#[derive(Debug, Clone)]
pub struct RankedMatch {
    /// Cosine similarity to the query, nominally in [-1, 1].
    pub score: f32,

    /// The matched entry.
    pub entry: Entry,
}

/// Rank entries by cosine similarity to the query embedding, descending,
/// truncated to the top `k`.
///
/// The sort is stable, so ties keep store order (earlier entries win).
/// Entries without a cached embedding are skipped; after the store's
/// backfill pass there should be none.
pub fn rank(query: &Embedding, entries: &[Entry], k: usize) -> Result<Vec<RankedMatch>> {
    let mut scored: Vec<(OrderedFloat<f32>, &Entry)> = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(embedding) = &entry.embedding else {
            warn!("Skipping entry without embedding: {}", entry.canonical_text());
            continue;
        };
        let score = cosine_similarity(query, embedding)?;
        scored.push((OrderedFloat(score), entry));
    }

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(k);

    Ok(scored
        .into_iter()
        .map(|(score, entry)| RankedMatch {
            score: score.0,
            entry: entry.clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use recall_knowledge::EntryKind;

    fn fact(content: &str, embedding: Embedding) -> Entry {
        Entry::new(
            EntryKind::Fact {
                content: content.to_string(),
            },
            embedding,
        )
    }

    #[test]
    fn test_rank_orders_by_score_descending() {
        let entries = vec![
            fact("orthogonal entry", vec![0.0, 1.0, 0.0]),
            fact("exact entry", vec![1.0, 0.0, 0.0]),
            fact("partial entry", vec![0.7, 0.7, 0.0]),
        ];

        let query = vec![1.0, 0.0, 0.0];
        let matches = rank(&query, &entries, 2).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].entry.canonical_text(), "exact entry");
        assert_eq!(matches[1].entry.canonical_text(), "partial entry");
    }

    #[test]
    fn test_rank_ties_keep_store_order() {
        let entries = vec![
            fact("first of the tie", vec![1.0, 0.0]),
            fact("second of the tie", vec![1.0, 0.0]),
        ];

        let query = vec![1.0, 0.0];
        let matches = rank(&query, &entries, 2).unwrap();
        assert_eq!(matches[0].entry.canonical_text(), "first of the tie");
        assert_eq!(matches[1].entry.canonical_text(), "second of the tie");
    }

    #[test]
    fn test_rank_empty_store() {
        let query = vec![1.0, 0.0];
        let matches = rank(&query, &[], 3).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_rank_is_deterministic() {
        let entries = vec![
            fact("entry number one", vec![0.9, 0.1]),
            fact("entry number two", vec![0.5, 0.5]),
            fact("entry number three", vec![0.1, 0.9]),
        ];
        let query = vec![1.0, 0.0];

        let first = rank(&query, &entries, 3).unwrap();
        let second = rank(&query, &entries, 3).unwrap();

        let texts = |matches: &[RankedMatch]| {
            matches
                .iter()
                .map(|m| (m.entry.canonical_text().to_string(), m.score))
                .collect::<Vec<_>>()
        };
        assert_eq!(texts(&first), texts(&second));
    }
}
