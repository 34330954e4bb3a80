//! Unified error type for the rag-base crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the RAG base module.
#[derive(Debug, Error)]
pub enum RagBaseError {
    // ── Configuration / environment ──────────────────────────────────────────
    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Configuration combination is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Seed file ───────────────────────────────────────────────────────────
    /// Seed file could not be read (missing, unreadable).
    #[error("cannot read seed file {}: {source}", path.display())]
    SeedRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Seed file is not valid YAML/JSON.
    #[error("seed file is not valid YAML: {0}")]
    Yaml(#[from] serde_yml::Error),

    /// Seed file parsed but has the wrong shape or an unusable entry.
    #[error("malformed seed file: {0}")]
    SeedFormat(String),

    // ── Qdrant client / transport ───────────────────────────────────────────
    /// Transport / client error from Qdrant.
    #[error("qdrant error: {0}")]
    Qdrant(String),

    /// Point payload could not be built from a document.
    #[error("payload error: {0}")]
    Payload(String),

    /// Document id is not the sequential numeric id the index expects.
    #[error("document id '{0}' is not a sequential index")]
    InvalidDocumentId(String),

    // ── Embeddings backend ──────────────────────────────────────────────────
    /// Embedding backend failed to embed inputs.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Embedding vector length differs from the collection dimension.
    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}
