//! OpenAI-compatible client (`/v1/chat/completions`, `/v1/embeddings`).
//!
//! The endpoint is a base URL such as `https://api.openai.com`; vLLM,
//! LM Studio and other compatible servers work the same way.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::{Provider, ProviderError, ProviderErrorKind, Result};
use crate::services::http::JsonClient;

#[derive(Debug)]
pub struct OpenAiService {
    http: JsonClient,
    cfg: LlmModelConfig,
    url_chat: String,
    url_embeddings: String,
}

impl OpenAiService {
    /// Build a client that sends `Authorization: Bearer <api_key>` on every call.
    ///
    /// # Errors
    /// `InvalidProvider`, `MissingApiKey` or `InvalidEndpoint` for a bad
    /// profile; a transport error if the HTTP client cannot be built.
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        let fail = |kind| ProviderError::new(Provider::OpenAI, kind);

        if cfg.provider != LlmProvider::OpenAI {
            return Err(fail(ProviderErrorKind::InvalidProvider).into());
        }
        let api_key = cfg
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| fail(ProviderErrorKind::MissingApiKey))?;

        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| fail(ProviderErrorKind::Decode(format!("API key header: {e}"))))?;
        bearer.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        let http = JsonClient::new(Provider::OpenAI, &cfg, headers)?;
        Ok(Self {
            url_chat: http.url("/v1/chat/completions"),
            url_embeddings: http.url("/v1/embeddings"),
            http,
            cfg,
        })
    }

    /// Single chat completion: optional system message, then the user prompt.
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        debug!(prompt_len = prompt.len(), has_system = system.is_some(), "chat completion");
        let body = ChatRequest::from_cfg(&self.cfg, prompt, system);
        let out: ChatResponse = self.http.post(&self.url_chat, &body).await?;

        out.choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or_else(|| self.http.fail(ProviderErrorKind::EmptyChoices))
    }

    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>> {
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input,
        };
        let out: EmbeddingsResponse = self.http.post(&self.url_embeddings, &body).await?;

        out.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| {
                self.http
                    .fail(ProviderErrorKind::Decode("no data in embeddings response".into()))
            })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str, system: Option<&'a str>) -> Self {
        let messages = system
            .map(|content| Message {
                role: "system",
                content,
            })
            .into_iter()
            .chain([Message {
                role: "user",
                content: prompt,
            }])
            .collect();

        Self {
            model: &cfg.model,
            messages,
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_tokens: cfg.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}
