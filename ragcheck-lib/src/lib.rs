//! ragcheck - single-passage RAG with a built-in self-assessment harness
//!
//! # Architecture
//!
//! ```text
//! Passages -> Embedder -> KnowledgeStore
//!                               |
//! Question -> Embedder -> Retriever (cosine, top-1)
//!                               |
//!                          best passage -> AnswerExtractor -> Answer
//!                               |                               |
//!                       retrieval_matches               answer_matches
//!                               \______________ _______________/
//!                                              v
//!                                         ScoreReport
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ragcheck_lib::{
//!     assess::Assessor,
//!     embed::{EmbedModel, FastEmbedder},
//!     extract::RerankExtractor,
//!     suite::builtin_suites,
//! };
//!
//! let mut assessor = Assessor::new(FastEmbedder::new(EmbedModel::MiniLm)?, RerankExtractor::new()?);
//!
//! for suite in builtin_suites()? {
//!     let store = assessor.index(suite.passages.iter().cloned())?;
//!     let report = assessor.assess(&suite.cases, &store);
//!     println!("{}: {} / {}", suite.name, report.points_earned(), report.points_possible());
//! }
//! ```

pub mod assess;
pub mod embed;
pub mod error;
pub mod extract;
pub mod search;
pub mod store;
pub mod suite;

pub use error::{Error, Result};
