use std::fmt;
use std::str::FromStr;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::debug;

use crate::embed::{Embedder, Embedding};
use crate::{Error, Result};

/// Embedding models supported by [`FastEmbedder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmbedModel {
    /// sentence-transformers/all-MiniLM-L6-v2, 384 dimensions
    #[default]
    MiniLm,
    /// BAAI/bge-small-en-v1.5, 384 dimensions
    BgeSmall,
    /// BAAI/bge-large-en-v1.5, 1024 dimensions
    BgeLarge,
}

impl EmbedModel {
    /// Canonical model identifier.
    #[must_use]
    pub fn model_name(self) -> &'static str {
        match self {
            Self::MiniLm => "sentence-transformers/all-MiniLM-L6-v2",
            Self::BgeSmall => "BAAI/bge-small-en-v1.5",
            Self::BgeLarge => "BAAI/bge-large-en-v1.5",
        }
    }

    #[must_use]
    pub fn dimension(self) -> usize {
        match self {
            Self::MiniLm | Self::BgeSmall => 384,
            Self::BgeLarge => 1024,
        }
    }

    /// BGE models are trained with an instruction prefix on queries.
    fn query_prefix(self) -> Option<&'static str> {
        match self {
            Self::MiniLm => None,
            Self::BgeSmall | Self::BgeLarge => {
                Some("Represent this sentence for searching relevant passages: ")
            }
        }
    }

    fn fastembed_model(self) -> EmbeddingModel {
        match self {
            Self::MiniLm => EmbeddingModel::AllMiniLML6V2,
            Self::BgeSmall => EmbeddingModel::BGESmallENV15,
            Self::BgeLarge => EmbeddingModel::BGELargeENV15,
        }
    }
}

impl FromStr for EmbedModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "minilm" | "all-minilm-l6-v2" => Ok(Self::MiniLm),
            "bge-small" | "bge-small-en-v1.5" => Ok(Self::BgeSmall),
            "bge-large" | "bge-large-en-v1.5" => Ok(Self::BgeLarge),
            other => Err(Error::InvalidInput(format!(
                "unknown embedding model '{other}' (expected minilm, bge-small or bge-large)"
            ))),
        }
    }
}

impl fmt::Display for EmbedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model_name())
    }
}

/// Local embedder backed by fastembed.
///
/// Uses ONNX-based inference; the model is downloaded on first use.
pub struct FastEmbedder {
    model: TextEmbedding,
    kind: EmbedModel,
}

impl FastEmbedder {
    /// Create a new embedder for the given model.
    pub fn new(kind: EmbedModel) -> Result<Self> {
        debug!(model = kind.model_name(), "loading embedding model");
        let opts = InitOptions::new(kind.fastembed_model()).with_show_download_progress(true);

        TextEmbedding::try_new(opts)
            .map(|model| Self { model, kind })
            .map_err(|e| Error::Embedding(e.to_string()))
    }

    #[must_use]
    pub fn kind(&self) -> EmbedModel {
        self.kind
    }
}

impl Embedder for FastEmbedder {
    fn model_name(&self) -> &str {
        self.kind.model_name()
    }

    fn dimension(&self) -> usize {
        self.kind.dimension()
    }

    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
        self.model
            .embed(texts, None)
            .map_err(|e| Error::Embedding(e.to_string()))
    }

    fn embed_query(&mut self, text: &str) -> Result<Embedding> {
        let query_text = match self.kind.query_prefix() {
            Some(prefix) => format!("{prefix}{text}"),
            None => text.to_string(),
        };

        self.model
            .embed(vec![query_text], None)
            .map_err(|e| Error::Embedding(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("model returned no embeddings".to_string()))
    }
}
