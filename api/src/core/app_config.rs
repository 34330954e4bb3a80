//! Application configuration: one YAML file plus environment overrides.
//!
//! Every section is optional; missing sections fall back to defaults that
//! target a local Ollama and Qdrant. The config is loaded once in `main` and
//! passed down explicitly.

use std::path::{Path, PathBuf};

use ai_llm_service::{
    AiLlmError, LlmModelConfig,
    config::default_config::{apply_overrides, default_chat_config, default_embedding_config},
};
use contextor::ChainConfig;
use rag_base::{errors::rag_base_error::RagBaseError, structs::rag_base_config::RagConfig};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or validating the config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in config file: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("failed to parse env variable: {key} = '{value}'")]
    Env { key: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error(transparent)]
    Rag(#[from] RagBaseError),
}

/// Output format of the stdout log layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. `info,rag_base=debug`).
    pub level: String,
    pub format: LogFormat,
    /// Optional log file; written without ANSI colors.
    pub path: Option<PathBuf>,
    /// Colors on stdout (only honoured when stdout is a terminal).
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Compact,
            path: None,
            ansi: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// CORS policy. `"*"` in a list means "anything".
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub allow_credentials: bool,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: vec!["*".into()],
            allow_credentials: false,
            allow_methods: vec!["*".into()],
            allow_headers: vec!["*".into()],
        }
    }
}

/// Chat and embedding model profiles.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_chat_config")]
    pub chat: LlmModelConfig,
    #[serde(default = "default_embedding_config")]
    pub embedding: LlmModelConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            chat: default_chat_config(),
            embedding: default_embedding_config(),
        }
    }
}

/// Where [`AppConfig::load`] took its base values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// The file did not exist.
    Defaults,
}

/// Root of the YAML config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub llm: LlmConfig,
    pub rag: RagConfig,
    pub chain: ChainConfig,
}

impl AppConfig {
    /// Load `path`, apply env overrides and validate.
    ///
    /// A missing file is not an error: defaults are used instead, reported
    /// as [`ConfigSource::Defaults`] so the caller can log it once logging
    /// is up.
    pub fn load(path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        Self::load_from(path, &|key| std::env::var(key).ok())
    }

    /// [`Self::load`] with variables read through `lookup`.
    pub fn load_from(
        path: &Path,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<(Self, ConfigSource), ConfigError> {
        let (mut cfg, source) = if path.exists() {
            (Self::from_file(path)?, ConfigSource::File)
        } else {
            (Self::default(), ConfigSource::Defaults)
        };
        cfg.apply_overrides(lookup)?;
        cfg.validate()?;
        Ok((cfg, source))
    }

    /// Parse a config file without overrides or validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(text)?)
    }

    /// Overlay environment variables:
    /// `SERVER_HOST`, `SERVER_PORT`, `LOG_LEVEL`, `LOG_FORMAT`, `LOG_PATH`,
    /// plus the `rag` and `llm` variables handled by their own crates.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(&|key| std::env::var(key).ok())
    }

    /// [`Self::apply_env_overrides`] with variables read through `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(host) = var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("SERVER_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::Env {
                key: "SERVER_PORT",
                value: port.clone(),
            })?;
        }
        if let Some(level) = var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("LOG_FORMAT") {
            self.logging.format = match format.to_lowercase().as_str() {
                "compact" => LogFormat::Compact,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::Env {
                        key: "LOG_FORMAT",
                        value: format,
                    });
                }
            };
        }
        if let Some(path) = var("LOG_PATH") {
            self.logging.path = Some(PathBuf::from(path));
        }

        self.rag.apply_overrides(lookup)?;
        apply_overrides(&mut self.llm.chat, &mut self.llm.embedding, lookup)?;
        Ok(())
    }

    /// Startup checks; nothing is contacted over the network here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("server.host must not be empty".into()));
        }
        if self.chain.max_context_chars == 0 {
            return Err(ConfigError::Invalid(
                "chain.max_context_chars must be > 0".into(),
            ));
        }
        self.llm.chat.validate()?;
        self.llm.embedding.validate()?;
        self.rag.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = AppConfig::from_yaml("").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.server.addr(), "0.0.0.0:8080");
        assert_eq!(cfg.rag.qdrant.collection, "main");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn reads_every_section() {
        let yaml = r#"
logging:
  level: debug
  format: json
  path: logs/app.log
server:
  port: 9000
cors:
  allow_origins: ["http://localhost:3000"]
  allow_credentials: true
llm:
  chat:
    provider: openai
    model: gpt-4o-mini
    endpoint: https://api.openai.com
    api_key: sk-test
rag:
  qdrant:
    collection: docs
  search:
    top_k: 6
chain:
  max_context_chars: 1000
"#;
        let cfg = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.logging.path.as_deref(), Some(Path::new("logs/app.log")));
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9000);
        assert!(cfg.cors.allow_credentials);
        assert_eq!(cfg.cors.allow_methods, ["*"]);
        assert_eq!(cfg.llm.chat.model, "gpt-4o-mini");
        assert_eq!(cfg.llm.embedding, default_embedding_config());
        assert_eq!(cfg.rag.qdrant.collection, "docs");
        assert_eq!(cfg.rag.search.top_k, 6);
        assert_eq!(cfg.chain.max_context_chars, 1000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn openai_without_key_fails_validation() {
        let yaml = "llm:\n  chat:\n    provider: openai\n    model: gpt-4o-mini\n    endpoint: https://api.openai.com\n";
        let cfg = AppConfig::from_yaml(yaml).unwrap();
        assert!(matches!(cfg.validate(), Err(ConfigError::Llm(_))));
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (cfg, source) = AppConfig::load_from(&dir.path().join("nope.yaml"), &no_env).unwrap();
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(cfg, AppConfig::default());

        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "server:\n  port: 9001\n").unwrap();
        let (cfg, source) = AppConfig::load_from(&path, &no_env).unwrap();
        assert_eq!(source, ConfigSource::File);
        assert_eq!(cfg.server.port, 9001);
    }

    #[test]
    fn env_overrides_every_layer() {
        fn env(key: &str) -> Option<String> {
            let value = match key {
                "SERVER_HOST" => "127.0.0.1",
                "SERVER_PORT" => "9100",
                "LOG_FORMAT" => "JSON",
                "LOG_PATH" => "logs/x.log",
                "QDRANT_COLLECTION" => "kb",
                "EMBEDDING_MODEL" => "mxbai-embed-large",
                "LOG_LEVEL" => "   ",
                _ => return None,
            };
            Some(value.to_string())
        }
        let mut cfg = AppConfig::default();
        cfg.apply_overrides(&env).unwrap();
        assert_eq!(cfg.server.addr(), "127.0.0.1:9100");
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.logging.path.as_deref(), Some(Path::new("logs/x.log")));
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.rag.qdrant.collection, "kb");
        assert_eq!(cfg.llm.embedding.model, "mxbai-embed-large");
    }

    #[test]
    fn bad_env_values_are_config_errors() {
        let cases = [
            ("SERVER_PORT", "abc"),
            ("LOG_FORMAT", "xml"),
            ("EMBEDDING_DIM", "x"),
            ("LLM_MAX_TOKENS", "-3"),
        ];
        for (key, value) in cases {
            let mut cfg = AppConfig::default();
            let err = cfg
                .apply_overrides(&|k: &str| (k == key).then(|| value.to_string()))
                .unwrap_err();
            let expected = match key {
                "EMBEDDING_DIM" => matches!(err, ConfigError::Rag(_)),
                "LLM_MAX_TOKENS" => matches!(err, ConfigError::Llm(_)),
                _ => matches!(err, ConfigError::Env { key: k, .. } if k == key),
            };
            assert!(expected, "{key}={value}: {err}");
        }
    }

    #[test]
    fn missing_file_is_reported_by_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::from_file(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
