//! Local JSON-backed vector store.
//!
//! Each collection is persisted as a single JSON snapshot under the data
//! directory (`<path>/<collection>.json`) and loaded eagerly on open. Writes
//! go through the in-memory map and are flushed to disk on every mutation,
//! so a finished ingestion run survives the process. At serving time the
//! store is read-only.

use crate::db::vectorstore::{rank_documents, VectorStore};
use crate::types::{AppError, Document, Result, SearchResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// On-disk snapshot of one collection.
#[derive(Serialize, Deserialize)]
struct CollectionSnapshot {
    dimensions: usize,
    documents: HashMap<String, Document>,
}

/// JSON-backed vector store rooted at a data directory.
pub struct LocalVectorStore {
    root: PathBuf,
    collections: RwLock<HashMap<String, CollectionSnapshot>>,
}

impl LocalVectorStore {
    /// Open a store at `path`, creating the directory if needed and loading
    /// any existing collection snapshots.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .map_err(|e| AppError::VectorStore(format!("Failed to create {}: {}", root.display(), e)))?;

        let mut collections = HashMap::new();
        for entry in fs::read_dir(&root)
            .map_err(|e| AppError::VectorStore(format!("Failed to read {}: {}", root.display(), e)))?
        {
            let entry = entry.map_err(|e| AppError::VectorStore(e.to_string()))?;
            let file = entry.path();
            if file.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = file.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let raw = fs::read_to_string(&file)
                .map_err(|e| AppError::VectorStore(format!("Failed to read {}: {}", file.display(), e)))?;
            let snapshot: CollectionSnapshot = serde_json::from_str(&raw).map_err(|e| {
                AppError::VectorStore(format!("Corrupt snapshot {}: {}", file.display(), e))
            })?;

            debug!(
                collection = name,
                documents = snapshot.documents.len(),
                "Loaded collection snapshot"
            );
            collections.insert(name.to_string(), snapshot);
        }

        info!(
            path = %root.display(),
            collections = collections.len(),
            "Opened local vector store"
        );

        Ok(Self {
            root,
            collections: RwLock::new(collections),
        })
    }

    fn snapshot_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.json", name))
    }

    fn persist(&self, name: &str, snapshot: &CollectionSnapshot) -> Result<()> {
        let path = self.snapshot_path(name);
        let raw = serde_json::to_string(snapshot)
            .map_err(|e| AppError::VectorStore(format!("Failed to serialize '{}': {}", name, e)))?;
        fs::write(&path, raw)
            .map_err(|e| AppError::VectorStore(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    fn provider_name(&self) -> &'static str {
        "local"
    }

    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write();
        if collections.contains_key(name) {
            return Err(AppError::InvalidInput(format!(
                "Collection '{}' already exists",
                name
            )));
        }

        let snapshot = CollectionSnapshot {
            dimensions,
            documents: HashMap::new(),
        };
        self.persist(name, &snapshot)?;
        collections.insert(name.to_string(), snapshot);
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write();
        collections
            .remove(name)
            .ok_or_else(|| AppError::NotFound(format!("Collection '{}' not found", name)))?;

        let path = self.snapshot_path(name);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                AppError::VectorStore(format!("Failed to remove {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        Ok(self.collections.read().contains_key(name))
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

        self.persist(collection, col)?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentMetadata;
    use chrono::Utc;

    fn doc(id: &str, content: &str, embedding: Vec<f32>) -> Document {
        Document {
            id: id.to_string(),
            content: content.to_string(),
            metadata: DocumentMetadata {
                title: id.to_string(),
                source: "test".to_string(),
                created_at: Utc::now(),
                tags: vec![],
            },
            embedding: Some(embedding),
        }
    }

    #[tokio::test]
    async fn snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = LocalVectorStore::open(dir.path()).unwrap();
            store.create_collection("docs", 3).await.unwrap();
            store
                .upsert("docs", &[doc("a", "alpha", vec![1.0, 0.0, 0.0])])
                .await
                .unwrap();
        }

        let reopened = LocalVectorStore::open(dir.path()).unwrap();
        assert!(reopened.collection_exists("docs").await.unwrap());
        assert_eq!(reopened.count("docs").await.unwrap(), 1);

        let results = reopened.search("docs", &[1.0, 0.0, 0.0], 3).await.unwrap();
        assert_eq!(results[0].document.content, "alpha");
    }

    #[tokio::test]
    async fn delete_collection_removes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::open(dir.path()).unwrap();

        store.create_collection("docs", 3).await.unwrap();
        assert!(dir.path().join("docs.json").exists());

        store.delete_collection("docs").await.unwrap();
        assert!(!dir.path().join("docs.json").exists());
    }
}
