//! Knowledge store
//!
//! An ordered, immutable set of passages with one precomputed embedding per
//! passage. A passage is identified only by its index, so insertion order is
//! significant and preserved.
//!
//! Stores are never updated in place. Adding passages produces a new store
//! with every passage re-embedded; older stores remain valid until dropped.
//!
//! # Usage
//!
//! ```ignore
//! use ragcheck_lib::store::KnowledgeStore;
//!
//! let store = KnowledgeStore::build(&mut embedder, [
//!     "The capital of France is Paris.",
//!     "Mount Everest is the highest mountain on Earth.",
//! ])?;
//!
//! let bigger = store.extend(&mut embedder, ["The Moon orbits the Earth."])?;
//! assert_eq!(bigger.version(), store.version() + 1);
//! ```

use tracing::debug;

use crate::embed::{Embedder, Embedding};
use crate::{Error, Result};

/// Passages and their embeddings, index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeStore {
    passages: Vec<String>,
    embeddings: Vec<Embedding>,
    dimension: usize,
    version: u32,
}

impl KnowledgeStore {
    /// Embed `passages` in order and build a store from them.
    ///
    /// Fails with [`Error::InvalidInput`] when no passages are given, and
    /// with [`Error::Embedding`] when the embedder does not return exactly
    /// one vector per passage.
    pub fn build<E, I, S>(embedder: &mut E, passages: I) -> Result<Self>
    where
        E: Embedder + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let passages: Vec<String> = passages.into_iter().map(Into::into).collect();
        if passages.is_empty() {
            return Err(Error::InvalidInput(
                "cannot build a knowledge store from zero passages".to_string(),
            ));
        }

        let texts: Vec<&str> = passages.iter().map(String::as_str).collect();
        let embeddings = embedder.embed_documents(&texts)?;
        if embeddings.len() != passages.len() {
            return Err(Error::Embedding(format!(
                "embedder returned {} vectors for {} passages",
                embeddings.len(),
                passages.len()
            )));
        }

        let store = Self::from_parts(passages, embeddings)?;
        debug!(
            passages = store.len(),
            dimension = store.dimension,
            model = embedder.model_name(),
            "built knowledge store"
        );
        Ok(store)
    }

    /// Assemble a store from precomputed embeddings.
    ///
    /// `embeddings[i]` must belong to `passages[i]` and every vector must
    /// have the same non-zero length.
    pub fn from_parts(passages: Vec<String>, embeddings: Vec<Embedding>) -> Result<Self> {
        if passages.is_empty() {
            return Err(Error::InvalidInput(
                "cannot build a knowledge store from zero passages".to_string(),
            ));
        }
        if passages.len() != embeddings.len() {
            return Err(Error::InvalidInput(format!(
                "{} passages but {} embeddings",
                passages.len(),
                embeddings.len()
            )));
        }

        let dimension = embeddings[0].len();
        if dimension == 0 {
            return Err(Error::Embedding("embeddings must not be empty".to_string()));
        }
        if let Some(bad) = embeddings.iter().find(|e| e.len() != dimension) {
            return Err(Error::DimensionMismatch {
                expected: dimension,
                found: bad.len(),
            });
        }

        Ok(Self {
            passages,
            embeddings,
            dimension,
            version: 1,
        })
    }

    /// Build a new store holding this store's passages followed by `more`.
    ///
    /// All passages are embedded again; `self` is left untouched.
    pub fn extend<E, I, S>(&self, embedder: &mut E, more: I) -> Result<Self>
    where
        E: Embedder + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let passages = self
            .passages
            .iter()
            .cloned()
            .chain(more.into_iter().map(Into::into));

        let mut next = Self::build(embedder, passages)?;
        next.version = self.version + 1;
        Ok(next)
    }

    /// Number of passages in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Length of every embedding in the store, `0` for an empty store.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Build generation: `1` for a fresh store, incremented by [`extend`](Self::extend).
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[must_use]
    pub fn passage(&self, index: usize) -> Option<&str> {
        self.passages.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn passages(&self) -> &[String] {
        &self.passages
    }

    #[must_use]
    pub fn embeddings(&self) -> &[Embedding] {
        &self.embeddings
    }

    /// Iterate `(index, passage, embedding)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, &[f32])> {
        self.passages
            .iter()
            .zip(&self.embeddings)
            .enumerate()
            .map(|(i, (p, e))| (i, p.as_str(), e.as_slice()))
    }
}
