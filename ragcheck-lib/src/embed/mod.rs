//! Text embedding using local models
//!
//! The default model is sentence-transformers/all-MiniLM-L6-v2 via the
//! fastembed crate (ONNX runtime). BGE models are available for comparison.
//!
//! # Models
//!
//! | Name        | Model                    | Dimensions |
//! |-------------|--------------------------|------------|
//! | `minilm`    | all-MiniLM-L6-v2         | 384        |
//! | `bge-small` | BAAI/bge-small-en-v1.5   | 384        |
//! | `bge-large` | BAAI/bge-large-en-v1.5   | 1024       |
//!
//! # Usage
//!
//! ```ignore
//! use ragcheck_lib::embed::{Embedder, EmbedModel, FastEmbedder};
//!
//! let mut embedder = FastEmbedder::new(EmbedModel::MiniLm)?;
//!
//! // Embed passages (for building a knowledge store)
//! let passage_embeddings = embedder.embed_documents(&["Mount Everest is...", "Paris is..."])?;
//!
//! // Embed a query (for retrieval)
//! let query_embedding = embedder.embed_query("What is the highest mountain?")?;
//! ```

use crate::Result;

/// A vector embedding - fixed size array of floats
pub type Embedding = Vec<f32>;

/// Trait for text embedding models
pub trait Embedder: Send + Sync {
    /// Embed multiple documents for indexing
    ///
    /// Must return exactly one embedding per input text, in input order.
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Embed a single query for searching
    ///
    /// Note: Some models (like BGE) use different prompts for queries vs documents.
    /// This method handles that distinction.
    fn embed_query(&mut self, text: &str) -> Result<Embedding>;

    /// Returns the embedding dimension
    fn dimension(&self) -> usize;

    /// Returns the model name/identifier
    fn model_name(&self) -> &str;
}

mod fast;
pub use fast::*;
