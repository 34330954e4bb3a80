//! Errors of the LLM layer.
//!
//! [`AiLlmError`] is what callers see. It wraps either a startup problem
//! ([`ConfigError`]) or a failed call to a backend ([`ProviderError`]).

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AiLlmError>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("llm transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    #[error("llm call timed out after {0:?}")]
    Timeout(Duration),
}

impl AiLlmError {
    /// Client-side timeouts become [`AiLlmError::Timeout`]; anything else
    /// stays a transport error.
    pub fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            AiLlmError::Timeout(timeout)
        } else {
            AiLlmError::HttpTransport(err)
        }
    }
}

/// Bad chat/embedding profile or bad `LLM_*` / `OLLAMA_*` / `OPENAI_*` variable.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    MissingVar(&'static str),

    #[error("invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    #[error("unsupported llm provider: {0}")]
    UnsupportedProvider(String),

    #[error("invalid {var}: {reason}")]
    InvalidFormat {
        var: &'static str,
        reason: &'static str,
    },

    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("model name must not be empty")]
    EmptyModel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Ollama,
    OpenAI,
}

#[derive(Debug, Clone, Error)]
pub enum ProviderErrorKind {
    #[error("client built for another provider")]
    InvalidProvider,

    #[error("missing API key")]
    MissingApiKey,

    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),

    /// Non-2xx answer; `snippet` is the start of the body.
    #[error("HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    #[error("cannot decode response: {0}")]
    Decode(String),

    #[error("response contained no choices")]
    EmptyChoices,
}

#[derive(Debug, Error)]
#[error("{provider:?}: {kind}")]
pub struct ProviderError {
    pub provider: Provider,
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: Provider, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_name_code_and_body() {
        let err: AiLlmError = ProviderError::new(
            Provider::Ollama,
            ProviderErrorKind::HttpStatus {
                status: StatusCode::NOT_FOUND,
                url: "http://localhost:11434/api/generate".into(),
                snippet: "model not found".into(),
            },
        )
        .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Ollama: HTTP 404"), "{msg}");
        assert!(msg.contains("model not found"), "{msg}");
    }

    #[test]
    fn range_error_reports_bounds() {
        let msg = ConfigError::OutOfRange {
            field: "temperature",
            value: 3.0,
            min: 0.0,
            max: 2.0,
        }
        .to_string();
        assert_eq!(msg, "temperature must be within 0..=2, got 3");
    }
}
