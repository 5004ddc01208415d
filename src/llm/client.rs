//! LLM client abstractions and provider management.

use crate::types::{AppError, Result};
use crate::utils::config::LlmConfig;
use async_trait::async_trait;

/// Generic LLM client trait for provider abstraction.
///
/// All providers implement this trait, allowing the answer pipeline to swap
/// providers without code changes. Generation is a synchronous call from the
/// pipeline's point of view; streaming is not part of the contract.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with a system prompt.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name/identifier.
    fn model_name(&self) -> &str;
}

/// Model inference parameters applied per request.
#[derive(Debug, Clone, Default)]
pub struct ModelParams {
    /// Sampling temperature; provider default when unset.
    pub temperature: Option<f32>,
    /// Maximum tokens to generate; provider default when unset.
    pub max_tokens: Option<u32>,
}

/// Provider enum for runtime selection.
#[derive(Debug, Clone)]
pub enum Provider {
    /// Groq hosted inference (OpenAI-compatible chat completions).
    Groq {
        /// API key.
        api_key: String,
        /// Base URL, e.g. `https://api.groq.com/openai/v1`.
        api_base: String,
        /// Model identifier, e.g. `llama-3.3-70b-versatile`.
        model: String,
        /// Inference parameters.
        params: ModelParams,
    },

    /// Ollama local LLM provider.
    Ollama {
        /// Server base URL, e.g. `http://localhost:11434`.
        base_url: String,
        /// Model identifier, e.g. `llama3.2`.
        model: String,
    },
}

impl Provider {
    /// Create a client instance for this provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider was not compiled in or client
    /// construction fails.
    pub async fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            Provider::Groq {
                api_key,
                api_base,
                model,
                params,
            } => Ok(Box::new(super::groq::GroqClient::with_params(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
                params.clone(),
            ))),

            #[cfg(feature = "ollama")]
            Provider::Ollama { base_url, model } => Ok(Box::new(
                super::ollama::OllamaClient::new(base_url.clone(), model.clone()).await?,
            )),

            #[cfg(not(feature = "ollama"))]
            Provider::Ollama { .. } => Err(AppError::LLM(
                "Built without Ollama support. Enable the `ollama` feature.".into(),
            )),
        }
    }

    /// Get a human-readable name for this provider.
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Groq { .. } => "Groq",
            Provider::Ollama { .. } => "Ollama",
        }
    }

    /// Build a provider from the `[llm]` configuration section.
    ///
    /// For Groq the API key is read from the environment variable named by
    /// `api_key_env` (loaded from `.env` at startup).
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let params = ModelParams {
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
        };

        match config.provider.as_str() {
            "groq" => {
                let api_key = std::env::var(&config.api_key_env).map_err(|_| {
                    AppError::Config(format!(
                        "API key not found: set the {} environment variable (or put it in .env)",
                        config.api_key_env
                    ))
                })?;
                Ok(Provider::Groq {
                    api_key,
                    api_base: config.api_base.clone(),
                    model: config.model.clone(),
                    params,
                })
            }
            "ollama" => Ok(Provider::Ollama {
                base_url: config.api_base.clone(),
                model: config.model.clone(),
            }),
            other => Err(AppError::Config(format!(
                "Unknown LLM provider '{}'. Use: groq, ollama",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name() {
        let groq = Provider::Groq {
            api_key: "test".to_string(),
            api_base: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            params: ModelParams::default(),
        };
        assert_eq!(groq.name(), "Groq");

        let ollama = Provider::Ollama {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
        };
        assert_eq!(ollama.name(), "Ollama");
    }

    #[test]
    fn test_from_config_unknown_provider() {
        let config = LlmConfig {
            provider: "frontier".to_string(),
            ..LlmConfig::default()
        };
        assert!(Provider::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_ollama() {
        let config = LlmConfig {
            provider: "ollama".to_string(),
            api_base: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            ..LlmConfig::default()
        };

        match Provider::from_config(&config).unwrap() {
            Provider::Ollama { base_url, model } => {
                assert_eq!(base_url, "http://localhost:11434");
                assert_eq!(model, "llama3.2");
            }
            other => panic!("Expected Ollama provider, got {}", other.name()),
        }
    }
}
