//! One-shot document ingestion: load, split, embed, index.

use crate::db::VectorStore;
use crate::rag::chunker::TextChunker;
use crate::rag::embeddings::Embedder;
use crate::types::{AppError, Document, DocumentMetadata, IngestReport, Result};
use chrono::Utc;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

/// File extensions treated as ingestable text.
const TEXT_EXTENSIONS: &[&str] = &["txt", "md"];

/// A raw source document before chunking.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Source path, kept as chunk provenance.
    pub source: String,
    /// File stem used as the title.
    pub title: String,
    /// Full text content.
    pub text: String,
}

/// Runs the offline ingestion pipeline against a vector store collection.
///
/// Re-running on the same input replaces the collection rather than merging
/// into it, so ingestion stays deterministic for a fixed corpus.
pub struct IngestPipeline {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    chunker: TextChunker,
    collection: String,
}

impl IngestPipeline {
    /// Create a pipeline writing to `collection`.
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        chunker: TextChunker,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            embedder,
            chunker,
            collection: collection.into(),
        }
    }

    /// Ingest a file or directory of text documents.
    pub async fn run(&self, path: &Path) -> Result<IngestReport> {
        let start = Instant::now();

        let documents = load_documents(path)?;
        if documents.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "No text documents found under {}",
                path.display()
            )));
        }
        info!(documents = documents.len(), path = %path.display(), "Loaded documents");

        let mut chunk_texts = Vec::new();
        let mut chunk_meta = Vec::new();
        for doc in &documents {
            let chunks = self.chunker.chunk(&doc.text);
            if chunks.is_empty() {
                warn!(source = %doc.source, "Document produced no chunks");
            }
            for chunk in chunks {
                chunk_texts.push(chunk);
                chunk_meta.push((doc.title.clone(), doc.source.clone()));
            }
        }
        if chunk_texts.is_empty() {
            return Err(AppError::InvalidInput(
                "Corpus produced no chunks; nothing to index".into(),
            ));
        }
        info!(chunks = chunk_texts.len(), "Split documents into chunks");

        let embeddings = self.embedder.embed_batch(&chunk_texts).await?;

        // Fresh index on every run: replace, not merge.
        if self.store.collection_exists(&self.collection).await? {
            self.store.delete_collection(&self.collection).await?;
        }
        self.store
            .create_collection(&self.collection, self.embedder.dimensions())
            .await?;

        let base_id = Uuid::new_v4().to_string();
        let entries: Vec<Document> = chunk_texts
            .into_iter()
            .zip(embeddings)
            .zip(chunk_meta)
            .enumerate()
            .map(|(i, ((content, embedding), (title, source)))| Document {
                id: format!("{}_{}", base_id, i),
                content,
                metadata: DocumentMetadata {
                    title,
                    source,
                    created_at: Utc::now(),
                    tags: Vec::new(),
                },
                embedding: Some(embedding),
            })
            .collect();

        let written = self.store.upsert(&self.collection, &entries).await?;

        info!(
            collection = %self.collection,
            chunks = written,
            duration_ms = start.elapsed().as_millis() as u64,
            "Ingestion complete"
        );

        Ok(IngestReport {
            documents: documents.len(),
            chunks: written,
            collection: self.collection.clone(),
        })
    }
}

/// Load ingestable documents from a file or directory (recursive).
pub fn load_documents(path: &Path) -> Result<Vec<SourceDocument>> {
    if !path.exists() {
        return Err(AppError::NotFound(format!("{} does not exist", path.display())));
    }

    let mut documents = Vec::new();

    if path.is_file() {
        documents.push(read_document(path)?);
        return Ok(documents);
    }

    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|e| AppError::Io(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file = entry.path();
        let ext = file
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        if ext.as_deref().is_some_and(|e| TEXT_EXTENSIONS.contains(&e)) {
            documents.push(read_document(file)?);
        }
    }

    Ok(documents)
}

fn read_document(path: &Path) -> Result<SourceDocument> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .to_string();

    Ok(SourceDocument {
        source: path.display().to_string(),
        title,
        text,
    })
}
