//! The atomic knowledge unit.

use recall_embeddings::Embedding;
use serde::{Deserialize, Serialize};

/// The two kinds of knowledge an entry can carry.
///
/// A closed tagged union: the variant and its fields are checked at compile
/// time, so there is no "key missing" failure mode in the persisted format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryKind {
    /// A standalone statement.
    Fact { content: String },

    /// A direct question/answer pair.
    Qa { question: String, answer: String },
}

impl EntryKind {
    /// The text that gets embedded and matched against queries:
    /// the content for a fact, the question for a QA pair.
    pub fn canonical_text(&self) -> &str {
        match self {
            EntryKind::Fact { content } => content,
            EntryKind::Qa { question, .. } => question,
        }
    }

    /// The answer text, if this is a QA pair.
    pub fn answer(&self) -> Option<&str> {
        match self {
            EntryKind::Fact { .. } => None,
            EntryKind::Qa { answer, .. } => Some(answer),
        }
    }

    /// The fact content, if this is a fact.
    pub fn fact_content(&self) -> Option<&str> {
        match self {
            EntryKind::Fact { content } => Some(content),
            EntryKind::Qa { .. } => None,
        }
    }
}

/// One record in the knowledge store.
///
/// The embedding is computed once at ingestion time and cached here; it is
/// only ever recomputed for legacy records persisted before embedding
/// support (`emb` absent), which the store backfills on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// The knowledge payload.
    #[serde(flatten)]
    pub kind: EntryKind,

    /// Cached embedding of the canonical text.
    #[serde(rename = "emb", default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Embedding>,
}

impl Entry {
    /// Create an entry with a cached embedding.
    pub fn new(kind: EntryKind, embedding: Embedding) -> Self {
        Self {
            kind,
            embedding: Some(embedding),
        }
    }

    /// Create a fact entry.
    pub fn fact(content: impl Into<String>, embedding: Embedding) -> Self {
        Self::new(
            EntryKind::Fact {
                content: content.into(),
            },
            embedding,
        )
    }

    /// Create a QA entry.
    pub fn qa(
        question: impl Into<String>,
        answer: impl Into<String>,
        embedding: Embedding,
    ) -> Self {
        Self::new(
            EntryKind::Qa {
                question: question.into(),
                answer: answer.into(),
            },
            embedding,
        )
    }

    /// The text this entry is matched on.
    pub fn canonical_text(&self) -> &str {
        self.kind.canonical_text()
    }

    /// Whether this entry is a QA pair.
    pub fn is_qa(&self) -> bool {
        matches!(self.kind, EntryKind::Qa { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fact_round_trip() {
        let entry = Entry::fact("water boils at 100C", vec![0.5, 0.5]);
        let json = serde_json::to_string(&entry).unwrap();
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }

    #[test]
    fn test_persisted_field_names() {
        let entry = Entry::qa("q", "a", vec![1.0]);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "qa");
        assert_eq!(value["question"], "q");
        assert_eq!(value["answer"], "a");
        assert_eq!(value["emb"][0], 1.0);
    }

    #[test]
    fn test_legacy_record_without_embedding() {
        let json = r#"{"type": "fact", "content": "legacy statement"}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.canonical_text(), "legacy statement");
        assert!(entry.embedding.is_none());
    }

    #[test]
    fn test_canonical_text_is_question_for_qa() {
        let entry = Entry::qa("server wont start", "check your config.cfg", vec![1.0]);
        assert_eq!(entry.canonical_text(), "server wont start");
        assert_eq!(entry.kind.answer(), Some("check your config.cfg"));
    }
}
