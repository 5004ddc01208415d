//! Core types (documents, messages, search results, errors).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============= Conversation Types =============

/// A single turn in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Who produced this turn.
    pub role: MessageRole,
    /// The turn's text content.
    pub content: String,
    /// When the turn was appended.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a user message stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an assistant message stamped with the current time.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Role of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions.
    System,
    /// End-user input.
    User,
    /// Model output.
    Assistant,
}

// ============= RAG Types =============

/// An indexed unit of text with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier within a collection.
    pub id: String,
    /// The chunk text.
    pub content: String,
    /// Provenance metadata.
    pub metadata: DocumentMetadata,
    /// Dense embedding; must be set before upserting.
    pub embedding: Option<Vec<f32>>,
}

/// Provenance metadata attached to an indexed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Human-readable title.
    pub title: String,
    /// Source path or identifier the chunk came from.
    pub source: String,
    /// Ingestion timestamp.
    pub created_at: DateTime<Utc>,
    /// Free-form tags.
    pub tags: Vec<String>,
}

/// A single similarity-search hit.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched document (embedding stripped).
    pub document: Document,
    /// Cosine similarity to the query vector.
    pub score: f32,
}

/// A retrieved passage handed to the prompt assembler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// The chunk text.
    pub text: String,
    /// Source path or identifier of the originating document.
    pub source: String,
    /// Similarity score, descending within a retrieval.
    pub score: f32,
}

/// Summary of one ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// Number of source documents loaded.
    pub documents: usize,
    /// Number of chunks written to the index.
    pub chunks: usize,
    /// Target collection name.
    pub collection: String,
}

// ============= Error Types =============

/// Application error taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or other I/O failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// Embedding model failure.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector store failure.
    #[error("Vector store error: {0}")]
    VectorStore(String),

    /// LLM provider failure.
    #[error("LLM error: {0}")]
    LLM(String),

    /// A named resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller-supplied input was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unclassified internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AppError>;
