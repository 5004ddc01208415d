//! Dense embedding models.
//!
//! The [`Embedder`] trait abstracts text-to-vector conversion for both
//! ingestion (batch) and serving (single query). The default implementation
//! runs fastembed ONNX models locally behind the `local-embeddings` feature.

use crate::types::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Converts text into dense vectors for similarity search.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, preserving order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Dimensionality of the produced vectors.
    fn dimensions(&self) -> usize;

    /// Model identifier.
    fn model_name(&self) -> &str;
}

/// Create the configured embedder.
///
/// # Errors
///
/// Returns an error if the model name is unknown, model initialization
/// fails, or the crate was built without an embedding backend.
pub fn create_embedder(model_name: &str) -> Result<Arc<dyn Embedder>> {
    #[cfg(feature = "local-embeddings")]
    {
        Ok(Arc::new(local::LocalEmbedder::new(model_name)?))
    }

    #[cfg(not(feature = "local-embeddings"))]
    {
        let _ = model_name;
        Err(crate::types::AppError::Config(
            "Built without an embedding backend. Enable the `local-embeddings` feature.".into(),
        ))
    }
}

#[cfg(feature = "local-embeddings")]
mod local {
    use super::Embedder;
    use crate::types::{AppError, Result};
    use async_trait::async_trait;
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use parking_lot::Mutex;

    /// Local ONNX embedding model via fastembed.
    ///
    /// fastembed embeds through `&mut self`, so the model sits behind a
    /// mutex; embedding is CPU-bound and fast enough for the corpus sizes
    /// this assistant serves.
    pub struct LocalEmbedder {
        model: Mutex<TextEmbedding>,
        model_name: String,
        dimensions: usize,
    }

    impl LocalEmbedder {
        /// Initialize the named model, downloading it on first use.
        pub fn new(model_name: &str) -> Result<Self> {
            let (model, dimensions) = match model_name {
                "BAAI/bge-small-en-v1.5" => (EmbeddingModel::BGESmallENV15, 384),
                "BAAI/bge-base-en-v1.5" => (EmbeddingModel::BGEBaseENV15, 768),
                "sentence-transformers/all-MiniLM-L6-v2" => (EmbeddingModel::AllMiniLML6V2, 384),
                other => {
                    return Err(AppError::Config(format!(
                        "Unknown embedding model '{}'. Supported: BAAI/bge-small-en-v1.5, \
                         BAAI/bge-base-en-v1.5, sentence-transformers/all-MiniLM-L6-v2",
                        other
                    )));
                }
            };

            let model = TextEmbedding::try_new(
                InitOptions::new(model).with_show_download_progress(true),
            )
            .map_err(|e| AppError::Embedding(format!("Failed to init {}: {}", model_name, e)))?;

            Ok(Self {
                model: Mutex::new(model),
                model_name: model_name.to_string(),
                dimensions,
            })
        }
    }

    #[async_trait]
    impl Embedder for LocalEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let mut embeddings = self
                .model
                .lock()
                .embed(vec![text], None)
                .map_err(|e| AppError::Embedding(e.to_string()))?;
            embeddings
                .pop()
                .ok_or_else(|| AppError::Embedding("Model returned no embedding".into()))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if texts.is_empty() {
                return Ok(Vec::new());
            }
            self.model
                .lock()
                .embed(texts.to_vec(), None)
                .map_err(|e| AppError::Embedding(e.to_string()))
        }

        fn dimensions(&self) -> usize {
            self.dimensions
        }

        fn model_name(&self) -> &str {
            &self.model_name
        }
    }
}
