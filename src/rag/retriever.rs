//! Top-k semantic retrieval over the vector index.

use crate::db::VectorStore;
use crate::rag::embeddings::Embedder;
use crate::types::{Result, RetrievedChunk};
use std::sync::Arc;
use tracing::{debug, warn};

/// Retrieves the most similar indexed chunks for a query.
///
/// Ranking is the index's concern; the retriever embeds the query, passes
/// `k` through, and preserves the index's descending-score order. Too few
/// results - including none at all - is a normal, representable state, not
/// an error.
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    collection: String,
}

impl Retriever {
    /// Create a retriever over `collection` in the given store.
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            embedder,
            collection: collection.into(),
        }
    }

    /// Return up to `k` chunks ordered by descending similarity.
    ///
    /// A missing or empty collection yields an empty result.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        if !self.store.collection_exists(&self.collection).await? {
            warn!(
                collection = %self.collection,
                "Collection not found; retrieval returns no context"
            );
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;
        let results = self
            .store
            .search(&self.collection, &query_embedding, k)
            .await?;

        debug!(
            collection = %self.collection,
            k,
            hits = results.len(),
            "Retrieved context"
        );

        Ok(results
            .into_iter()
            .map(|r| RetrievedChunk {
                text: r.document.content,
                source: r.document.metadata.source,
                score: r.score,
            })
            .collect())
    }

    /// Name of the collection this retriever reads.
    pub fn collection(&self) -> &str {
        &self.collection
    }
}
