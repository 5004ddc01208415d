//! # S.A.G.E - School Assistant Grounded Engine
//!
//! A retrieval-augmented question answering assistant over a school document
//! corpus, with mandatory input/output safety guardrails around generation.
//!
//! ## Overview
//!
//! S.A.G.E can be used in two ways:
//!
//! 1. **As a CLI** - run the `sage` binary (`ingest`, `ask`, `chat`, `eval`)
//! 2. **As a library** - wire the pipeline components into your own project
//!
//! ## Pipelines
//!
//! Ingestion (offline, one-shot): load → chunk → embed → index.
//! Serving (per turn): screen input → retrieve → assemble → generate →
//! screen output → log.
//!
//! ```rust,ignore
//! use sage::{ChatSession, GuardrailPolicy, Provider, Retriever, TurnOutcome};
//! use sage::db::VectorStoreProvider;
//! use sage::rag::embeddings::create_embedder;
//! use std::sync::Arc;
//!
//! let store: Arc<dyn sage::VectorStore> =
//!     Arc::from(VectorStoreProvider::Local { path: "./data/vectors".into() }
//!         .create_store()
//!         .await?);
//! let embedder = create_embedder("BAAI/bge-small-en-v1.5")?;
//! let retriever = Retriever::new(store, embedder, "school_docs");
//! let llm = Provider::Ollama {
//!     base_url: "http://localhost:11434".into(),
//!     model: "llama3.2".into(),
//! }
//! .create_client()
//! .await?;
//!
//! let mut session = ChatSession::new(GuardrailPolicy::default(), retriever, llm, 3);
//! match session.handle_turn("When is the Hindi exam for SA1?").await {
//!     TurnOutcome::Delivered { answer, .. } => println!("{}", answer),
//!     TurnOutcome::Rejected { reason, .. } => eprintln!("{}", reason),
//!     TurnOutcome::Failed { error } => eprintln!("{}", error),
//! }
//! ```
//!
//! ## Safety model
//!
//! Guardrails run as a mandatory gate *around* generation, not inside it: an
//! unsafe query never reaches the retriever or the model, and an
//! unsafe-looking answer never reaches the caller. The policy is
//! table-driven configuration, auditable and testable independently of any
//! model. See [`guardrails`].
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama local inference (default) |
//! | `local-embeddings` | fastembed ONNX embedding models (default) |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Answer orchestration, prompt assembly, and conversation state.
pub mod chat;
/// Command-line interface parsing and output helpers.
pub mod cli;
/// Vector store backends.
pub mod db;
/// Offline evaluation harness.
pub mod eval;
/// Input and output safety guardrails.
pub mod guardrails;
/// LLM provider clients and abstractions.
pub mod llm;
/// Retrieval Augmented Generation (RAG) pipeline.
pub mod rag;
/// Core types (documents, messages, search results, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use chat::{ChatSession, TurnOutcome};
pub use db::{VectorStore, VectorStoreProvider};
pub use guardrails::{GuardrailPolicy, SafetyVerdict};
pub use llm::{LLMClient, Provider};
pub use rag::{IngestPipeline, Retriever, TextChunker};
pub use types::{AppError, Result};
pub use utils::config::SageConfig;
