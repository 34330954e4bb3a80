//! Typed error for the contextor crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// Embedding or vector search failed.
    #[error("retrieval error: {0}")]
    Retrieval(#[from] rag_base::errors::rag_base_error::RagBaseError),

    /// Chat model call failed.
    #[error("LLM error: {0}")]
    Llm(#[from] ai_llm_service::AiLlmError),

    /// The model answered with nothing but whitespace.
    #[error("LLM returned an empty answer")]
    EmptyAnswer,
}
