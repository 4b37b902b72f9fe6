use fastembed::{RerankInitOptions, RerankerModel, TextRerank};
use tracing::debug;

use crate::extract::{candidate_spans, Answer, AnswerExtractor};
use crate::{Error, Result};

/// Extractor using the BAAI/bge-reranker-base cross-encoder.
///
/// Scores every candidate span of the context against the question and
/// answers with the highest scoring span. The raw reranker score is reported
/// as the answer's confidence.
pub struct RerankExtractor {
    model: TextRerank,
}

impl RerankExtractor {
    /// Create a new reranking extractor.
    ///
    /// Downloads the model on first use (~300MB).
    pub fn new() -> Result<Self> {
        let opts = RerankInitOptions::new(RerankerModel::BGERerankerBase)
            .with_show_download_progress(true);

        TextRerank::try_new(opts)
            .map(|model| Self { model })
            .map_err(|e| Error::Extraction(e.to_string()))
    }
}

impl AnswerExtractor for RerankExtractor {
    fn model_name(&self) -> &str {
        "BAAI/bge-reranker-base"
    }

    fn extract(&mut self, question: &str, context: &str) -> Result<Answer> {
        let spans = candidate_spans(context);
        if spans.is_empty() {
            return Err(Error::Extraction("context has no candidate spans".to_string()));
        }

        let results = self
            .model
            .rerank(question, &spans, false, None)
            .map_err(|e| Error::Extraction(e.to_string()))?;

        // first of equal scores wins, matching retrieval tie-breaking
        let best = results
            .into_iter()
            .reduce(|best, rr| if rr.score > best.score { rr } else { best })
            .ok_or_else(|| Error::Extraction("reranker returned no scores".to_string()))?;

        let text = spans.get(best.index).ok_or_else(|| {
            Error::Extraction(format!("reranker returned unknown span index {}", best.index))
        })?;
        debug!(spans = spans.len(), score = best.score, answer = *text, "extracted answer");

        Ok(Answer::new(*text).with_confidence(best.score))
    }
}
