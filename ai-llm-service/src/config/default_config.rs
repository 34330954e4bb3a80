//! Default LLM profiles and their environment overrides.
//!
//! The config file may omit the `llm` section entirely; these defaults point
//! at a local Ollama with a small chat model and a 768-d embedding model.
//!
//! # Environment variables
//!
//! - `LLM_KIND`         = chat provider (`ollama` | `openai`)
//! - `LLM_MODEL`        = chat model name
//! - `LLM_MAX_TOKENS`   = optional max tokens (u32)
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint for every Ollama profile
//! - `EMBEDDING_MODEL`  = embedding model name
//! - `OPENAI_API_KEY`   = API key for every OpenAI profile without one
//! - `OPENAI_BASE_URL`  = endpoint for every OpenAI profile

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError},
};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// Chat profile used when the config file has none.
///
/// # Defaults
/// - `temperature = Some(0.2)`
/// - `timeout_secs = Some(120)`
pub fn default_chat_config() -> LlmModelConfig {
    LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: "llama3.1:8b".into(),
        endpoint: DEFAULT_OLLAMA_URL.into(),
        api_key: None,
        max_tokens: None,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: Some(120),
    }
}

/// Embedding profile used when the config file has none.
///
/// # Defaults
/// - `temperature = Some(0.0)` (deterministic)
/// - `timeout_secs = Some(30)`
pub fn default_embedding_config() -> LlmModelConfig {
    LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: "nomic-embed-text".into(),
        endpoint: DEFAULT_OLLAMA_URL.into(),
        api_key: None,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(30),
    }
}

/// Variable source: the process environment in production, a fixed table in tests.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Resolves the Ollama endpoint, if overridden.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// # Errors
/// [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is not a valid port.
fn ollama_endpoint(lookup: EnvLookup<'_>) -> Result<Option<String>, AiLlmError> {
    if let Some(url) = var(lookup, "OLLAMA_URL") {
        return Ok(Some(url));
    }
    if let Some(port) = var(lookup, "OLLAMA_PORT") {
        let port: u16 = port.parse().map_err(|_| ConfigError::InvalidNumber {
            var: "OLLAMA_PORT",
            reason: "expected u16 (1..=65535)",
        })?;
        return Ok(Some(format!("http://localhost:{port}")));
    }
    Ok(None)
}

/// Applies process environment overrides to the chat and embedding profiles.
///
/// # Errors
/// Returns [`AiLlmError::Config`] on unparsable values.
pub fn apply_env_overrides(
    chat: &mut LlmModelConfig,
    embedding: &mut LlmModelConfig,
) -> Result<(), AiLlmError> {
    apply_overrides(chat, embedding, &|key| std::env::var(key).ok())
}

/// Applies overrides read through `lookup`; blank values count as unset.
///
/// Switching the chat provider through `LLM_KIND` also resets its endpoint
/// to that provider's default unless an explicit URL variable is set.
/// `OPENAI_API_KEY` only fills OpenAI profiles that have no key yet.
///
/// # Errors
/// Returns [`AiLlmError::Config`] on unparsable values.
pub fn apply_overrides(
    chat: &mut LlmModelConfig,
    embedding: &mut LlmModelConfig,
    lookup: EnvLookup<'_>,
) -> Result<(), AiLlmError> {
    if let Some(kind) = var(lookup, "LLM_KIND") {
        let provider: LlmProvider = kind.parse()?;
        if provider != chat.provider {
            chat.provider = provider;
            chat.endpoint = match provider {
                LlmProvider::Ollama => DEFAULT_OLLAMA_URL.into(),
                LlmProvider::OpenAI => DEFAULT_OPENAI_URL.into(),
            };
        }
    }
    if let Some(model) = var(lookup, "LLM_MODEL") {
        chat.model = model;
    }
    if let Some(raw) = var(lookup, "LLM_MAX_TOKENS") {
        let max = raw.parse::<u32>().map_err(|_| ConfigError::InvalidNumber {
            var: "LLM_MAX_TOKENS",
            reason: "expected u32",
        })?;
        chat.max_tokens = Some(max);
    }
    if let Some(model) = var(lookup, "EMBEDDING_MODEL") {
        embedding.model = model;
    }

    let ollama_url = ollama_endpoint(lookup)?;
    let openai_url = var(lookup, "OPENAI_BASE_URL");
    let openai_key = var(lookup, "OPENAI_API_KEY");

    for cfg in [chat, embedding] {
        match cfg.provider {
            LlmProvider::Ollama => {
                if let Some(url) = &ollama_url {
                    cfg.endpoint = url.clone();
                }
            }
            LlmProvider::OpenAI => {
                if let Some(url) = &openai_url {
                    cfg.endpoint = url.clone();
                }
                if cfg.api_key.is_none() {
                    cfg.api_key = openai_key.clone();
                }
            }
        }
    }

    Ok(())
}

fn var(lookup: EnvLookup<'_>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_ollama_profiles() {
        let chat = default_chat_config();
        let embedding = default_embedding_config();
        assert_eq!(chat.provider, LlmProvider::Ollama);
        assert!(chat.validate().is_ok());
        assert!(embedding.validate().is_ok());
        assert_ne!(chat.model, embedding.model);
    }

    fn table(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn llm_kind_switches_provider_and_endpoint() {
        let mut chat = default_chat_config();
        let mut embedding = default_embedding_config();
        apply_overrides(
            &mut chat,
            &mut embedding,
            &table(&[
                ("LLM_KIND", "openai"),
                ("LLM_MODEL", "gpt-4o-mini"),
                ("LLM_MAX_TOKENS", "512"),
                ("OPENAI_API_KEY", "sk-env"),
                ("OLLAMA_PORT", "11500"),
            ]),
        )
        .unwrap();

        assert_eq!(chat.provider, LlmProvider::OpenAI);
        assert_eq!(chat.endpoint, DEFAULT_OPENAI_URL);
        assert_eq!(chat.model, "gpt-4o-mini");
        assert_eq!(chat.max_tokens, Some(512));
        assert_eq!(chat.api_key.as_deref(), Some("sk-env"));

        assert_eq!(embedding.provider, LlmProvider::Ollama);
        assert_eq!(embedding.endpoint, "http://localhost:11500");
        assert_eq!(embedding.api_key, None);
    }

    #[test]
    fn env_key_does_not_replace_a_configured_one() {
        let mut chat = default_chat_config();
        chat.provider = LlmProvider::OpenAI;
        chat.api_key = Some("sk-file".into());
        let mut embedding = default_embedding_config();
        embedding.provider = LlmProvider::OpenAI;

        apply_overrides(
            &mut chat,
            &mut embedding,
            &table(&[
                ("OPENAI_API_KEY", "sk-env"),
                ("OPENAI_BASE_URL", "http://vllm:8000"),
            ]),
        )
        .unwrap();

        assert_eq!(chat.api_key.as_deref(), Some("sk-file"));
        assert_eq!(embedding.api_key.as_deref(), Some("sk-env"));
        assert_eq!(chat.endpoint, "http://vllm:8000");
        assert_eq!(embedding.endpoint, "http://vllm:8000");
    }

    #[test]
    fn bad_numbers_and_providers_are_rejected() {
        let cases: [(&str, &str); 3] = [
            ("LLM_MAX_TOKENS", "lots"),
            ("OLLAMA_PORT", "70000"),
            ("LLM_KIND", "bard"),
        ];
        for (key, value) in cases {
            let mut chat = default_chat_config();
            let mut embedding = default_embedding_config();
            let err = apply_overrides(&mut chat, &mut embedding, &|k: &str| {
                (k == key).then(|| value.to_string())
            })
            .unwrap_err();
            assert!(matches!(err, AiLlmError::Config(_)), "{key}: {err}");
        }
    }
}
