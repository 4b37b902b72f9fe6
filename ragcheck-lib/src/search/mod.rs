//! Single-passage retrieval
//!
//! Embeds a query and scores it against every passage in a
//! [`KnowledgeStore`] with cosine similarity. The best passage wins; on equal
//! scores the earliest passage wins, so results are reproducible.
//!
//! # Usage
//!
//! ```ignore
//! use ragcheck_lib::search::Retriever;
//!
//! let mut retriever = Retriever::new(embedder);
//! let store = retriever.index(passages)?;
//!
//! let best = retriever.retrieve("What is the highest mountain?", &store)?;
//! println!("#{} ({:.4}) {}", best.index, best.score, best.passage);
//!
//! // Top 3 for inspection
//! let ranked = retriever.rank("What is the highest mountain?", &store, 3)?;
//! ```

use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::embed::Embedder;
use crate::store::KnowledgeStore;
use crate::{Error, Result};

/// A passage selected from a store, with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Retrieval<'a> {
    /// Position of the passage in the store
    pub index: usize,
    /// The passage text
    pub passage: &'a str,
    /// Cosine similarity to the query, in [-1, 1]
    pub score: f32,
}

/// Retriever owning an embedding model.
///
/// Stores are passed in by reference, so one retriever can serve several
/// independent stores.
pub struct Retriever<E: Embedder> {
    embedder: E,
}

impl<E: Embedder> Retriever<E> {
    #[must_use]
    pub fn new(embedder: E) -> Self {
        Self { embedder }
    }

    /// Build a fresh store from `passages` using this retriever's embedder.
    pub fn index<I, S>(&mut self, passages: I) -> Result<KnowledgeStore>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KnowledgeStore::build(&mut self.embedder, passages)
    }

    /// Return the passage most similar to `query`.
    pub fn retrieve<'s>(&mut self, query: &str, store: &'s KnowledgeStore) -> Result<Retrieval<'s>> {
        let query_embedding = self.embed_query(query, store)?;
        best_match(&query_embedding, store)
    }

    /// Return up to `k` passages ordered by descending similarity.
    ///
    /// Ties keep insertion order, so `rank(q, s, 1)[0]` equals `retrieve(q, s)`.
    pub fn rank<'s>(
        &mut self,
        query: &str,
        store: &'s KnowledgeStore,
        k: usize,
    ) -> Result<Vec<Retrieval<'s>>> {
        let query_embedding = self.embed_query(query, store)?;
        let mut scored = score_all(&query_embedding, store)?;

        // stable sort keeps lower indices first among equal scores
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    /// Returns a reference to the embedder.
    #[must_use]
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    fn embed_query(&mut self, query: &str, store: &KnowledgeStore) -> Result<Vec<f32>> {
        if query.trim().is_empty() {
            return Err(Error::InvalidInput("query must not be empty".to_string()));
        }
        // check before paying for the embedding call
        if store.is_empty() {
            return Err(Error::EmptyStore);
        }
        self.embedder.embed_query(query)
    }
}

/// Select the passage with the highest cosine similarity to `query`.
///
/// The first passage reaching the maximum score is returned.
pub fn best_match<'s>(query: &[f32], store: &'s KnowledgeStore) -> Result<Retrieval<'s>> {
    let mut best: Option<Retrieval<'s>> = None;

    for candidate in score_all(query, store)? {
        match &best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }

    best.ok_or(Error::EmptyStore)
}

fn score_all<'s>(query: &[f32], store: &'s KnowledgeStore) -> Result<Vec<Retrieval<'s>>> {
    if store.is_empty() {
        return Err(Error::EmptyStore);
    }
    if query.len() != store.dimension() {
        return Err(Error::DimensionMismatch {
            expected: store.dimension(),
            found: query.len(),
        });
    }

    Ok(store
        .iter()
        .map(|(index, passage, embedding)| {
            let score = cosine_similarity(query, embedding);
            debug!(index, score, "scored passage");
            Retrieval {
                index,
                passage,
                score,
            }
        })
        .collect())
}

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 means identical direction, or 0 when
/// either vector has zero magnitude or a non-finite component.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a * norm_b);
    // scores must stay totally ordered for the tie-break
    if similarity.is_nan() {
        return 0.0;
    }
    similarity
}
