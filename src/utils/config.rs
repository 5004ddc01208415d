//! TOML-based configuration for S.A.G.E.
//!
//! Declarative configuration for the assistant, guardrails, retrieval, and
//! the LLM provider via a TOML file (`sage.toml`). Every field has a default,
//! so a missing section falls back to a working local setup. Configuration is
//! static: it is loaded once per process and never reloaded.
//!
//! Secrets never live in the file; the `[llm]` section names the environment
//! variable holding the API key, and `.env` is loaded at startup.

use crate::db::VectorStoreProvider;
use crate::guardrails::GuardrailPolicy;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration structure loaded from sage.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SageConfig {
    /// Assistant behavior (greeting, retrieval breadth).
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Safety filter tables.
    #[serde(default)]
    pub guardrails: GuardrailPolicy,

    /// Ingestion and retrieval settings.
    #[serde(default)]
    pub rag: RagConfig,

    /// LLM provider selection and parameters.
    #[serde(default)]
    pub llm: LlmConfig,
}

// ============= Assistant Configuration =============

/// Assistant-level behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Greeting printed when an interactive session starts. Presentation
    /// only; never part of the conversation log.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Number of chunks retrieved per turn.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_greeting() -> String {
    "Hello! I'm your school assistant. How can I help you today?".to_string()
}

fn default_top_k() -> usize {
    3
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            top_k: default_top_k(),
        }
    }
}

// ============= RAG Configuration =============

/// Ingestion and retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// Embedding model identifier.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Maximum chunk size in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between neighboring chunks in characters.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Vector store collection holding the corpus.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Data directory for the local vector store. Empty selects the
    /// in-memory store.
    #[serde(default = "default_vector_path")]
    pub vector_path: String,
}

fn default_embedding_model() -> String {
    "BAAI/bge-small-en-v1.5".to_string()
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    150
}

fn default_collection() -> String {
    "school_docs".to_string()
}

fn default_vector_path() -> String {
    "./data/vectors".to_string()
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            embedding_model: default_embedding_model(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            collection: default_collection(),
            vector_path: default_vector_path(),
        }
    }
}

// ============= LLM Configuration =============

/// LLM provider selection and inference parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name: `groq` or `ollama`.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Provider base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Environment variable name containing the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_provider() -> String {
    "groq".to_string()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_api_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.0
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

// ============= Configuration Loading & Validation =============

impl SageConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!(
                "Cannot read {} ({}). Run `sage init` to create one.",
                path.display(),
                e
            ))
        })?;
        let config: SageConfig = toml::from_str(&raw)
            .map_err(|e| AppError::Config(format!("Invalid {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if self.assistant.top_k == 0 {
            return Err(AppError::Config("assistant.top_k must be at least 1".into()));
        }
        if self.rag.chunk_overlap >= self.rag.chunk_size {
            return Err(AppError::Config(format!(
                "rag.chunk_overlap ({}) must be smaller than rag.chunk_size ({})",
                self.rag.chunk_overlap, self.rag.chunk_size
            )));
        }
        if self.rag.collection.is_empty() {
            return Err(AppError::Config("rag.collection must not be empty".into()));
        }
        if self.guardrails.max_query_length == 0 {
            return Err(AppError::Config(
                "guardrails.max_query_length must be at least 1".into(),
            ));
        }
        if !matches!(self.llm.provider.as_str(), "groq" | "ollama") {
            return Err(AppError::Config(format!(
                "Unknown llm.provider '{}'. Use: groq, ollama",
                self.llm.provider
            )));
        }
        Ok(())
    }

    /// Vector store provider implied by `rag.vector_path`.
    pub fn vector_store_provider(&self) -> VectorStoreProvider {
        if self.rag.vector_path.is_empty() {
            VectorStoreProvider::Memory
        } else {
            VectorStoreProvider::Local {
                path: self.rag.vector_path.clone(),
            }
        }
    }
}
