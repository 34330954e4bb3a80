//! Shared LLM service with two profiles: `chat` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Provider clients are built eagerly, so a bad config fails at startup
//!   rather than on the first request.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::LlmServiceProfiles;
//! use ai_llm_service::config::default_config::{default_chat_config, default_embedding_config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmServiceProfiles::new(
//!     default_chat_config(),
//!     default_embedding_config(),
//! )?);
//!
//! let txt = svc.generate("Hello world", None).await?;
//! let emb = svc.embed("Ferris").await?;
//! println!("{txt} / dim = {}", emb.len());
//! # Ok(()) }
//! ```

use tracing::info;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// A provider client bound to one profile.
#[derive(Debug)]
enum ProviderClient {
    Ollama(OllamaService),
    OpenAI(OpenAiService),
}

impl ProviderClient {
    fn build(cfg: &LlmModelConfig) -> Result<Self, AiLlmError> {
        cfg.validate()?;
        Ok(match cfg.provider {
            LlmProvider::Ollama => ProviderClient::Ollama(OllamaService::new(cfg.clone())?),
            LlmProvider::OpenAI => ProviderClient::OpenAI(OpenAiService::new(cfg.clone())?),
        })
    }
}

/// Shared service that manages the **chat** and **embedding** profiles.
#[derive(Debug)]
pub struct LlmServiceProfiles {
    chat: ProviderClient,
    embedding: ProviderClient,
}

impl LlmServiceProfiles {
    /// Creates a new service with both profiles.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if either config is invalid or its HTTP client
    /// cannot be built.
    pub fn new(chat: LlmModelConfig, embedding: LlmModelConfig) -> Result<Self, AiLlmError> {
        let chat_client = ProviderClient::build(&chat)?;
        let embedding_client = ProviderClient::build(&embedding)?;

        info!(
            chat_provider = ?chat.provider,
            chat_model = %chat.model,
            embedding_provider = ?embedding.provider,
            embedding_model = %embedding.model,
            "LLM profiles initialized"
        );

        Ok(Self {
            chat: chat_client,
            embedding: embedding_client,
        })
    }

    /// Generates text using the **chat** profile.
    ///
    /// # Arguments
    /// - `prompt`: user prompt.
    /// - `system`: optional system instruction.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if generation fails.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        match &self.chat {
            ProviderClient::Ollama(cli) => cli.generate(prompt, system).await,
            ProviderClient::OpenAI(cli) => cli.generate(prompt, system).await,
        }
    }

    /// Computes an embedding using the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if embedding fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match &self.embedding {
            ProviderClient::Ollama(cli) => cli.embeddings(input).await,
            ProviderClient::OpenAI(cli) => cli.embeddings(input).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config::{default_chat_config, default_embedding_config};

    #[test]
    fn each_profile_gets_its_own_provider_client() {
        let mut chat = default_chat_config();
        chat.provider = LlmProvider::OpenAI;
        chat.endpoint = "https://api.openai.com".into();
        chat.api_key = Some("sk-test".into());

        let svc = LlmServiceProfiles::new(chat, default_embedding_config())
            .expect("profiles are valid");
        assert!(matches!(svc.chat, ProviderClient::OpenAI(_)));
        assert!(matches!(svc.embedding, ProviderClient::Ollama(_)));
    }

    #[test]
    fn invalid_profile_fails_fast() {
        let mut chat = default_chat_config();
        chat.endpoint = "ftp://nope".into();
        assert!(LlmServiceProfiles::new(chat, default_embedding_config()).is_err());
    }
}
