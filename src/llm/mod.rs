//! LLM provider clients and abstractions.
//!
//! A single [`LLMClient`] trait fronts every provider so the answer pipeline
//! never depends on a concrete API. Two providers are supported:
//!
//! - **Groq** - hosted inference over the OpenAI-compatible chat-completions
//!   endpoint (always built in; the default)
//! - **Ollama** - local inference via an Ollama server (`ollama` feature)
//!
//! Providers are selected at runtime through the [`Provider`] enum, built
//! either directly or from the `[llm]` configuration section.

/// Core LLM client trait and provider selection.
pub mod client;
/// Groq chat-completions client.
pub mod groq;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use client::{LLMClient, ModelParams, Provider};
pub use groq::GroqClient;
