//! Self-assessment harness
//!
//! Runs labeled test cases through retrieval and extraction, checks each
//! stage with a case-insensitive containment predicate, and collects a
//! [`ScoreReport`]. Every case is worth two points: one for retrieving a
//! passage containing the expected keyword, one for an answer containing the
//! expected answer.
//!
//! A failing case never aborts the run. Retrieval errors withhold both
//! points; extraction errors withhold the answer point only. Either way the
//! error is recorded on the case and the next case proceeds.
//!
//! # Usage
//!
//! ```ignore
//! use ragcheck_lib::assess::{Assessor, TestCase};
//!
//! let mut assessor = Assessor::new(embedder, extractor);
//! let store = assessor.index(passages)?;
//!
//! let cases = vec![TestCase::new("What is the highest mountain?", "Everest", "Mount Everest")];
//! let report = assessor.assess(&cases, &store);
//! println!("{} / {}", report.points_earned(), report.points_possible());
//! ```

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::embed::Embedder;
use crate::extract::{Answer, AnswerExtractor};
use crate::search::Retriever;
use crate::store::KnowledgeStore;
use crate::{Error, Result};

mod report;

pub use report::*;

/// A labeled question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub question: String,
    /// Must appear in the retrieved passage
    pub expected_keyword: String,
    /// Must appear in the extracted answer
    pub expected_answer: String,
}

impl TestCase {
    #[must_use]
    pub fn new(
        question: impl Into<String>,
        expected_keyword: impl Into<String>,
        expected_answer: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            expected_keyword: expected_keyword.into(),
            expected_answer: expected_answer.into(),
        }
    }
}

/// True if `expected` occurs in `produced`, ignoring case.
///
/// An empty `expected` always matches.
pub fn answer_matches(produced: &str, expected: &str) -> bool {
    contains_ignore_case(produced, expected)
}

/// True if `expected_keyword` occurs in `retrieved_passage`, ignoring case.
pub fn retrieval_matches(retrieved_passage: &str, expected_keyword: &str) -> bool {
    contains_ignore_case(retrieved_passage, expected_keyword)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Drives test cases through a retriever and an extractor.
pub struct Assessor<E: Embedder, X: AnswerExtractor> {
    retriever: Retriever<E>,
    extractor: X,
}

impl<E: Embedder, X: AnswerExtractor> Assessor<E, X> {
    #[must_use]
    pub fn new(embedder: E, extractor: X) -> Self {
        Self {
            retriever: Retriever::new(embedder),
            extractor,
        }
    }

    /// Build a fresh store from `passages` with the assessor's embedder.
    pub fn index<I, S>(&mut self, passages: I) -> Result<KnowledgeStore>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.retriever.index(passages)
    }

    /// Assess every case against `store`, in order.
    pub fn assess(&mut self, cases: &[TestCase], store: &KnowledgeStore) -> ScoreReport {
        let results: Vec<CaseResult> = cases
            .iter()
            .map(|case| self.assess_case(case, store))
            .collect();

        let report = ScoreReport::new(results);
        info!(
            earned = report.points_earned(),
            possible = report.points_possible(),
            store_version = store.version(),
            "assessment complete"
        );
        report
    }

    /// Assess a single case. Errors are captured in the result.
    pub fn assess_case(&mut self, case: &TestCase, store: &KnowledgeStore) -> CaseResult {
        let retrieval = match self.retriever.retrieve(&case.question, store) {
            Ok(retrieval) => retrieval,
            Err(e) => {
                warn!(question = %case.question, error = %e, "retrieval failed");
                return CaseResult {
                    case: case.clone(),
                    retrieved: None,
                    answer: None,
                    retrieval_correct: false,
                    answer_correct: false,
                    failure: Some(CaseFailure::new(Stage::Retrieval, &e)),
                };
            }
        };

        let retrieval_correct = retrieval_matches(retrieval.passage, &case.expected_keyword);
        let retrieved = RetrievedPassage::from(&retrieval);

        let (answer, answer_correct, failure) =
            match self.extract(&case.question, retrieval.passage) {
                Ok(answer) => {
                    let correct = answer_matches(&answer.text, &case.expected_answer);
                    (Some(answer), correct, None)
                }
                Err(e) => {
                    warn!(question = %case.question, error = %e, "extraction failed");
                    (None, false, Some(CaseFailure::new(Stage::Extraction, &e)))
                }
            };

        info!(
            question = %case.question,
            passage = retrieved.index,
            retrieval_correct,
            answer_correct,
            "assessed case"
        );

        CaseResult {
            case: case.clone(),
            retrieved: Some(retrieved),
            answer,
            retrieval_correct,
            answer_correct,
            failure,
        }
    }

    /// Returns a mutable reference to the extractor.
    pub fn extractor_mut(&mut self) -> &mut X {
        &mut self.extractor
    }

    fn extract(&mut self, question: &str, context: &str) -> Result<Answer> {
        let answer = self.extractor.extract(question, context)?;
        if answer.text.trim().is_empty() {
            return Err(Error::Extraction("extractor returned an empty answer".to_string()));
        }
        Ok(answer)
    }
}
