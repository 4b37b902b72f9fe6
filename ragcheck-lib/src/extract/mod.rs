//! Extractive answering
//!
//! An [`AnswerExtractor`] takes a question and one context passage and
//! returns a span of that passage as the answer. The assessment harness only
//! depends on this trait; [`RerankExtractor`] is the bundled implementation.
//!
//! Candidate spans come from [`candidate_spans`]: every sentence of the
//! context plus the clauses inside it. Delimiters only count when followed by
//! whitespace, so "27.3 days" and "13,000 miles" stay intact.

use serde::{Deserialize, Serialize};

use crate::Result;

/// An answer extracted from a context passage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// The extracted text
    pub text: String,
    /// Model confidence, when the extractor provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Answer {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Trait for extractive question answering
pub trait AnswerExtractor: Send + Sync {
    /// Extract an answer to `question` from `context`.
    fn extract(&mut self, question: &str, context: &str) -> Result<Answer>;

    /// Returns the model name/identifier
    fn model_name(&self) -> &str;
}

const SENTENCE_END: &[char] = &['.', '!', '?'];
const CLAUSE_END: &[char] = &[',', ';', ':', '.', '!', '?'];

/// Split `context` into sentence and clause spans, first occurrence order.
///
/// Spans are trimmed of surrounding whitespace and trailing punctuation.
/// Duplicates (a sentence made of a single clause) appear once.
pub fn candidate_spans(context: &str) -> Vec<&str> {
    let mut spans = Vec::new();

    for sentence in split_after(context, SENTENCE_END) {
        push_span(&mut spans, sentence);
        for clause in split_after(sentence, CLAUSE_END) {
            push_span(&mut spans, clause);
        }
    }

    spans
}

fn push_span<'a>(spans: &mut Vec<&'a str>, raw: &'a str) {
    let span = raw.trim().trim_end_matches(CLAUSE_END).trim_end();
    if !span.is_empty() && !spans.contains(&span) {
        spans.push(span);
    }
}

/// Split after each delimiter that is followed by whitespace or ends the text.
fn split_after<'a>(text: &'a str, delims: &[char]) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !delims.contains(&c) {
            continue;
        }
        let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
        if at_boundary {
            let end = i + c.len_utf8();
            parts.push(&text[start..end]);
            start = end;
        }
    }

    if start < text.len() {
        parts.push(&text[start..]);
    }
    parts
}

mod rerank;

pub use rerank::*;
