//! Training-input parsing.
//!
//! Raw text submitted for training takes one of two shapes: a `fact:` block
//! that is chunked into standalone statements, or a `Q:`/`A:` pair. Anything
//! else is not training input and is left to the retrieval path.

use regex_lite::Regex;
use tracing::debug;

use crate::error::{KnowledgeError, Result};

/// Boundaries a fact block is split on: newlines, carriage returns, bullet
/// characters, and a period followed by whitespace.
const CHUNK_BOUNDARY: &str = r"[\r\n•]|-\s|\.\s";

/// A parsed training submission.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingInput {
    /// One or more fact chunks, each stored as its own entry.
    Facts(Vec<String>),

    /// A single question/answer pair.
    Qa { question: String, answer: String },
}

/// Parse raw text as training input.
///
/// Returns `Ok(None)` when the text is not training input at all. Returns
/// `KnowledgeError::MalformedInput` when the text looks like training input
/// but fails shape validation; the caller must not mutate anything in that
/// case.
pub fn parse_training(raw: &str, min_chunk_len: usize) -> Result<Option<TrainingInput>> {
    let trimmed = raw.trim();

    // Fact marker is case-insensitive
    if let Some(marker) = trimmed.get(..5) {
        if marker.eq_ignore_ascii_case("fact:") {
            let chunks = chunk_facts(&trimmed[5..], min_chunk_len);
            if chunks.is_empty() {
                return Err(KnowledgeError::MalformedInput(format!(
                    "no fact chunks of at least {min_chunk_len} characters"
                )));
            }
            debug!("Parsed fact block into {} chunks", chunks.len());
            return Ok(Some(TrainingInput::Facts(chunks)));
        }
    }

    // QA prefixes are case-sensitive, unlike the fact marker
    if trimmed.starts_with("Q:") {
        let Some((first_line, rest)) = trimmed.split_once('\n') else {
            return Err(KnowledgeError::MalformedInput(
                "expected 'A:' on the following line".to_string(),
            ));
        };
        let Some(answer_part) = rest.strip_prefix("A:") else {
            return Err(KnowledgeError::MalformedInput(
                "second line must start with 'A:'".to_string(),
            ));
        };

        let question = first_line["Q:".len()..].trim();
        let answer = answer_part.trim();
        if question.is_empty() || answer.is_empty() {
            return Err(KnowledgeError::MalformedInput(
                "question and answer must be non-empty".to_string(),
            ));
        }

        return Ok(Some(TrainingInput::Qa {
            question: question.to_string(),
            answer: answer.to_string(),
        }));
    }

    Ok(None)
}

/// Parse an admin `question || answer` training command.
pub fn parse_train_command(text: &str) -> Result<(String, String)> {
    let Some((question, answer)) = text.split_once("||") else {
        return Err(KnowledgeError::MalformedInput(
            "usage: question || answer".to_string(),
        ));
    };

    let question = question.trim();
    let answer = answer.trim();
    if question.is_empty() || answer.is_empty() {
        return Err(KnowledgeError::MalformedInput(
            "question and answer must be non-empty".to_string(),
        ));
    }

    Ok((question.to_string(), answer.to_string()))
}

/// Split a fact block into candidate chunks and drop the ones too short to
/// carry standalone meaning.
fn chunk_facts(text: &str, min_chunk_len: usize) -> Vec<String> {
    let boundaries: Vec<(usize, usize)> = match Regex::new(CHUNK_BOUNDARY) {
        Ok(re) => re.find_iter(text).map(|m| (m.start(), m.end())).collect(),
        // Unreachable for a valid literal pattern; fall back to line splits
        Err(_) => text
            .match_indices('\n')
            .map(|(i, s)| (i, i + s.len()))
            .collect(),
    };

    let mut chunks = Vec::new();
    let mut last = 0;
    for (start, end) in boundaries {
        chunks.push(&text[last..start]);
        last = end;
    }
    chunks.push(&text[last..]);

    chunks
        .into_iter()
        .map(str::trim)
        .filter(|c| c.chars().count() >= min_chunk_len)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MIN_CHUNK_LEN: usize = 16;

    #[test]
    fn test_fact_chunking_drops_short_chunks() {
        let input = "fact: First idea. Second much longer idea here. No";
        let parsed = parse_training(input, MIN_CHUNK_LEN).unwrap();
        assert_eq!(
            parsed,
            Some(TrainingInput::Facts(vec![
                "Second much longer idea here".to_string()
            ]))
        );
    }

    #[test]
    fn test_fact_marker_is_case_insensitive() {
        let parsed = parse_training("FACT: the config file lives in /etc", MIN_CHUNK_LEN).unwrap();
        assert_eq!(
            parsed,
            Some(TrainingInput::Facts(vec![
                "the config file lives in /etc".to_string()
            ]))
        );
    }

    #[test]
    fn test_fact_block_splits_on_bullets_and_newlines() {
        let input = "fact:\n• restarts clear the cache completely\n- logs rotate every single night";
        let parsed = parse_training(input, MIN_CHUNK_LEN).unwrap();
        assert_eq!(
            parsed,
            Some(TrainingInput::Facts(vec![
                "restarts clear the cache completely".to_string(),
                "logs rotate every single night".to_string(),
            ]))
        );
    }

    #[test]
    fn test_fact_block_with_no_usable_chunks_is_rejected() {
        let err = parse_training("fact: tiny. no", MIN_CHUNK_LEN).unwrap_err();
        assert!(matches!(err, KnowledgeError::MalformedInput(_)));
    }

    #[test]
    fn test_qa_pair_parses() {
        let parsed = parse_training("Q: server wont start\nA: check your config.cfg", MIN_CHUNK_LEN)
            .unwrap();
        assert_eq!(
            parsed,
            Some(TrainingInput::Qa {
                question: "server wont start".to_string(),
                answer: "check your config.cfg".to_string(),
            })
        );
    }

    #[test]
    fn test_qa_without_answer_line_is_rejected() {
        let err = parse_training("Q: What is X?\nNot an answer", MIN_CHUNK_LEN).unwrap_err();
        assert!(matches!(err, KnowledgeError::MalformedInput(_)));
    }

    #[test]
    fn test_qa_without_line_break_is_rejected() {
        let err = parse_training("Q: What is X?", MIN_CHUNK_LEN).unwrap_err();
        assert!(matches!(err, KnowledgeError::MalformedInput(_)));
    }

    #[test]
    fn test_qa_prefix_is_case_sensitive() {
        let parsed = parse_training("q: what\na: thing", MIN_CHUNK_LEN).unwrap();
        assert_eq!(parsed, None);
    }

    #[test]
    fn test_empty_answer_is_rejected() {
        let err = parse_training("Q: What is X?\nA:   ", MIN_CHUNK_LEN).unwrap_err();
        assert!(matches!(err, KnowledgeError::MalformedInput(_)));
    }

    #[test]
    fn test_plain_text_is_not_training() {
        let parsed = parse_training("how do I restart the server?", MIN_CHUNK_LEN).unwrap();
        assert_eq!(parsed, None);
    }

    #[test]
    fn test_train_command() {
        let (q, a) = parse_train_command("how to reset || hold the button").unwrap();
        assert_eq!(q, "how to reset");
        assert_eq!(a, "hold the button");
    }

    #[test]
    fn test_train_command_without_separator_is_rejected() {
        let err = parse_train_command("just some text").unwrap_err();
        assert!(matches!(err, KnowledgeError::MalformedInput(_)));
    }
}
