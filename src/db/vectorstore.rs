//! Vector Store Abstraction Layer
//!
//! This module provides a unified interface for vector index operations, so
//! the retrieval pipeline can work with different backends through a common
//! trait. The index is append-only during ingestion and read-only during
//! serving; similarity ranking is the store's concern, not the caller's.
//!
//! # Example
//!
//! ```rust,ignore
//! use sage::db::{VectorStore, VectorStoreProvider};
//!
//! // Create a local, JSON-backed store (default)
//! let store = VectorStoreProvider::Local {
//!     path: "./data/vectors".into(),
//! }.create_store().await?;
//!
//! store.create_collection("documents", 384).await?;
//! store.upsert("documents", &documents).await?;
//! let results = store.search("documents", &query_embedding, 3).await?;
//! ```

use crate::types::{AppError, Document, Result, SearchResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Vector Store Provider Configuration
// ============================================================================

/// Configuration for vector store providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum VectorStoreProvider {
    /// In-memory store. Data is lost when the process exits.
    Memory,

    /// Local store persisted as JSON snapshots under a directory.
    Local {
        /// Path to the data directory.
        path: String,
    },
}

impl VectorStoreProvider {
    /// Create a vector store instance from this provider configuration.
    pub async fn create_store(&self) -> Result<Box<dyn VectorStore>> {
        match self {
            VectorStoreProvider::Memory => Ok(Box::new(MemoryVectorStore::new())),
            VectorStoreProvider::Local { path } => {
                let store = super::local::LocalVectorStore::open(path)?;
                Ok(Box::new(store))
            }
        }
    }

    /// Create a provider from environment variables.
    ///
    /// `SAGE_VECTOR_PATH` selects a local store at that path; otherwise the
    /// store is in-memory.
    pub fn from_env() -> Self {
        if let Ok(path) = std::env::var("SAGE_VECTOR_PATH") {
            if !path.is_empty() {
                return VectorStoreProvider::Local { path };
            }
        }
        VectorStoreProvider::Memory
    }
}

// ============================================================================
// Vector Store Trait
// ============================================================================

/// Abstract trait for vector index operations.
///
/// # Implementors
///
/// - [`LocalVectorStore`](super::local::LocalVectorStore) - JSON-backed (default)
/// - [`MemoryVectorStore`] - ephemeral, used in tests
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Get the name of this vector store provider.
    fn provider_name(&self) -> &'static str;

    /// Create a new collection with the specified vector dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection already exists.
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Delete a collection and all its data.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection doesn't exist.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Check if a collection exists.
    async fn collection_exists(&self, name: &str) -> Result<bool>;

    /// Count documents in a collection.
    async fn count(&self, collection: &str) -> Result<usize>;

    /// Upsert documents with their embeddings into a collection.
    ///
    /// Documents are identified by their `id` field; an existing id is
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if any document is missing an embedding or the
    /// collection does not exist.
    async fn upsert(&self, collection: &str, documents: &[Document]) -> Result<usize>;

    /// Search for the most similar documents in a collection.
    ///
    /// Returns at most `limit` results ordered by descending cosine
    /// similarity. A collection with fewer entries than `limit` returns
    /// whatever is available; an empty collection returns an empty vector.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>>;
}

/// Cosine similarity between two vectors of equal length.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Rank a collection's documents against a query embedding.
pub(crate) fn rank_documents(
    documents: &HashMap<String, Document>,
    embedding: &[f32],
    limit: usize,
) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = documents
        .values()
        .filter_map(|doc| {
            let doc_embedding = doc.embedding.as_ref()?;
            let score = cosine_similarity(embedding, doc_embedding);
            Some(SearchResult {
                document: Document {
                    id: doc.id.clone(),
                    content: doc.content.clone(),
                    metadata: doc.metadata.clone(),
                    // Embeddings are not returned in results
                    embedding: None,
                },
                score,
            })
        })
        .collect();

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(limit);
    results
}

// ============================================================================
// In-Memory Vector Store
// ============================================================================

/// In-memory vector store.
///
/// Data is not persisted and will be lost when the process exits. Uses
/// cosine similarity for ranking.
pub struct MemoryVectorStore {
    collections: RwLock<HashMap<String, MemoryCollection>>,
}

struct MemoryCollection {
    dimensions: usize,
    documents: HashMap<String, Document>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    fn provider_name(&self) -> &'static str {
        "memory"
    }

    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write();
        if collections.contains_key(name) {
            return Err(AppError::InvalidInput(format!(
                "Collection '{}' already exists",
                name
            )));
        }
        collections.insert(
            name.to_string(),
            MemoryCollection {
                dimensions,
                documents: HashMap::new(),
            },
        );
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write();
        collections
            .remove(name)
            .ok_or_else(|| AppError::NotFound(format!("Collection '{}' not found", name)))?;
        Ok(())
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        let collections = self.collections.read();
        Ok(collections.contains_key(name))
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        let collections = self.collections.read();
        let col = collections
            .get(collection)
            .ok_or_else(|| AppError::NotFound(format!("Collection '{}' not found", collection)))?;
        Ok(col.documents.len())
    }

    async fn upsert(&self, collection: &str, documents: &[Document]) -> Result<usize> {
        let mut collections = self.collections.write();
        let col = collections
            .get_mut(collection)
            .ok_or_else(|| AppError::NotFound(format!("Collection '{}' not found", collection)))?;

        let mut count = 0;
        for doc in documents {
            match doc.embedding.as_deref() {
                None => {
                    return Err(AppError::InvalidInput(format!(
                        "Document '{}' is missing embedding",
                        doc.id
                    )));
                }
                Some(embedding) if embedding.len() != col.dimensions => {
                    return Err(AppError::InvalidInput(format!(
                        "Document '{}' has {} dimensions, collection expects {}",
                        doc.id,
                        embedding.len(),
                        col.dimensions
                    )));
                }
                Some(_) => {}
            }
            col.documents.insert(doc.id.clone(), doc.clone());
            count += 1;
        }

        Ok(count)
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read();
        let col = collections
            .get(collection)
            .ok_or_else(|| AppError::NotFound(format!("Collection '{}' not found", collection)))?;

        Ok(rank_documents(&col.documents, embedding, limit))
    }
}

// ============================================================================
// Tests
// ============================================================================
