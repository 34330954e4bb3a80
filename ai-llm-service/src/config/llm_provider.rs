use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error_handler::ConfigError;

/// Backend used for chat completion or embeddings.
///
/// The name is accepted case-insensitively from config files and from the
/// `LLM_KIND` environment variable.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmProvider;
///
/// let p: LlmProvider = "ollama".parse().unwrap();
/// assert_eq!(p, LlmProvider::Ollama);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LlmProvider {
    /// Local Ollama runtime.
    #[serde(alias = "ollama")]
    Ollama,
    /// OpenAI or any OpenAI-compatible REST API.
    #[serde(alias = "openai", alias = "chatgpt", alias = "ChatGpt")]
    OpenAI,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(LlmProvider::Ollama),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}
