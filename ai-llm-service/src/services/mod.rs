pub(crate) mod http;
pub mod ollama_service;
pub mod open_ai_service;
