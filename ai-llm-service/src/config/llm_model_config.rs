use serde::{Deserialize, Serialize};

use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, ConfigError, Result};

/// Configuration for an LLM model invocation.
///
/// One instance describes one profile (chat or embedding). Optional sampling
/// knobs are forwarded to the provider only when set.
///
/// # Fields
///
/// - `provider`: Which backend to use (Ollama, OpenAI).
/// - `model`: The model identifier (e.g., `"llama3.1:8b"`, `"gpt-4o-mini"`).
/// - `endpoint`: Base URL of the provider (no path suffix).
/// - `api_key`: API key for providers that require authentication.
/// - `max_tokens`: Maximum number of tokens to generate.
/// - `temperature`: Controls randomness (0.0 = deterministic).
/// - `top_p`: Nucleus sampling cutoff.
/// - `timeout_secs`: Request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::OpenAI,
///     model: "gpt-4o-mini".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: Some(512),
///     temperature: Some(0.2),
///     top_p: None,
///     timeout_secs: Some(60),
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmModelConfig {
    /// The LLM provider/backend.
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// Inference endpoint base URL.
    pub endpoint: String,

    /// Optional API key for authentication (required by OpenAI).
    #[serde(default)]
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    #[serde(default)]
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Checks the invariants every provider client relies on.
    ///
    /// # Errors
    /// - [`ConfigError::EmptyModel`] if `model` is blank
    /// - [`ConfigError::InvalidFormat`] if `endpoint` is not http(s)
    /// - [`ConfigError::OutOfRange`] for `temperature` outside `0.0..=2.0`
    ///   or `top_p` outside `0.0..=1.0`
    /// - [`ConfigError::MissingVar`] if an OpenAI profile has no API key
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        if !is_http_url(self.endpoint.trim()) {
            return Err(ConfigError::InvalidFormat {
                var: "endpoint",
                reason: "must start with http:// or https://",
            }
            .into());
        }
        check_range("temperature", self.temperature, 0.0, 2.0)?;
        check_range("top_p", self.top_p, 0.0, 1.0)?;
        if self.provider == LlmProvider::OpenAI
            && self.api_key.as_deref().is_none_or(|k| k.trim().is_empty())
        {
            return Err(AiLlmError::Config(ConfigError::MissingVar("OPENAI_API_KEY")));
        }
        Ok(())
    }
}

pub(crate) fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn check_range(field: &'static str, value: Option<f32>, min: f32, max: f32) -> Result<()> {
    match value {
        Some(v) if !(v.is_finite() && (min..=max).contains(&v)) => Err(ConfigError::OutOfRange {
            field,
            value: v,
            min,
            max,
        }
        .into()),
        _ => Ok(()),
    }
}
