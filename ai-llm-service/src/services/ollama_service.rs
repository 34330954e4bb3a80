//! Ollama client: `POST /api/generate` (with `stream=false`) for answers and
//! `POST /api/embeddings` for vectors.
//!
//! ```no_run
//! use ai_llm_service::config::default_config::default_chat_config;
//! use ai_llm_service::services::ollama_service::OllamaService;
//!
//! # async fn demo() -> Result<(), ai_llm_service::AiLlmError> {
//! let svc = OllamaService::new(default_chat_config())?;
//! let answer = svc.generate("What is Qdrant?", Some("Answer in one line.")).await?;
//! # Ok(()) }
//! ```

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{Provider, ProviderError, ProviderErrorKind, Result};
use crate::services::http::JsonClient;

#[derive(Debug)]
pub struct OllamaService {
    http: JsonClient,
    cfg: LlmModelConfig,
    url_generate: String,
    url_embeddings: String,
}

impl OllamaService {
    /// # Errors
    /// `InvalidProvider` for a non-Ollama profile, `InvalidEndpoint` for a
    /// URL without http(s) scheme.
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(
                ProviderError::new(Provider::Ollama, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let http = JsonClient::new(Provider::Ollama, &cfg, HeaderMap::new())?;
        Ok(Self {
            url_generate: http.url("/api/generate"),
            url_embeddings: http.url("/api/embeddings"),
            http,
            cfg,
        })
    }

    /// One-shot completion. `max_tokens` is sent as `num_predict`.
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        debug!(prompt_len = prompt.len(), has_system = system.is_some(), "generate");
        let body = GenerateRequest::from_cfg(&self.cfg, prompt, system);
        let out: GenerateResponse = self.http.post(&self.url_generate, &body).await?;
        Ok(out.response)
    }

    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>> {
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            prompt: input,
        };
        let out: EmbeddingsResponse = self.http.post(&self.url_embeddings, &body).await?;
        if out.embedding.is_empty() {
            return Err(self
                .http
                .fail(ProviderErrorKind::Decode("empty embedding vector".into())));
        }
        Ok(out.embedding)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: GenerateOptions,
}

impl<'a> GenerateRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str, system: Option<&'a str>) -> Self {
        Self {
            model: &cfg.model,
            prompt,
            system,
            stream: false,
            options: GenerateOptions {
                temperature: cfg.temperature,
                top_p: cfg.top_p,
                num_predict: cfg.max_tokens,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}
