//! Shared LLM access for the chat backend.
//!
//! Two profiles are used by the rest of the workspace:
//! - **chat**: answers a prompt (optionally with a system instruction)
//! - **embedding**: turns text into a dense vector
//!
//! Each profile is described by an [`LlmModelConfig`] and served by a
//! provider client (Ollama or an OpenAI-compatible API).

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::AiLlmError;
pub use service_profiles::LlmServiceProfiles;
