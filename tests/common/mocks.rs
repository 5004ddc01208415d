//! Mock implementations for testing.
//!
//! Provides a scripted LLM client and a deterministic embedder so the
//! answer pipeline can be exercised end-to-end without network access or
//! model downloads.

use async_trait::async_trait;
use parking_lot::Mutex;
use sage::llm::LLMClient;
use sage::rag::embeddings::Embedder;
use sage::types::{AppError, Result};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Mock LLM client with a scripted response.
///
/// Can be configured to return a fixed answer, to fail, or to capture the
/// prompts it receives for later assertions.
#[derive(Clone)]
pub struct MockLLMClient {
    response: String,
    should_fail: bool,
    captured: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockLLMClient {
    /// Create a mock client that returns the given response.
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            should_fail: false,
            captured: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            response: String::new(),
            should_fail: true,
            captured: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the `(system, user)` prompt pairs this client received.
    pub fn captured(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.captured)
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        self.captured
            .lock()
            .push((system.to_string(), prompt.to_string()));
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

/// Deterministic bag-of-words embedder.
///
/// Hashes lowercased tokens into a small fixed-dimension vector, so texts
/// sharing vocabulary get high cosine similarity. No model download, fully
/// reproducible.
pub struct MockEmbedder {
    dims: usize,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self { dims: 32 }
    }

    pub fn vector(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0_f32; self.dims];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            token.to_lowercase().hash(&mut hasher);
            v[(hasher.finish() as usize) % self.dims] += 1.0;
        }
        v
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_name(&self) -> &str {
        "mock-bag-of-words"
    }
}

/// Embedder that always fails, for exercising degraded retrieval.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(AppError::Embedding("Mock embedder failure".to_string()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(AppError::Embedding("Mock embedder failure".to_string()))
    }

    fn dimensions(&self) -> usize {
        32
    }

    fn model_name(&self) -> &str {
        "mock-failing"
    }
}
