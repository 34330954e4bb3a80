use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use contextor::RetrievalQa;
use rag_base::{QdrantIndex, VectorStore};

use crate::{core::app_config::AppConfig, error_handler::AppError};

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Retrieval-QA chain; read-only after startup.
    pub chain: Arc<RetrievalQa>,
}

impl AppState {
    pub fn new(chain: Arc<RetrievalQa>) -> Self {
        Self { chain }
    }

    /// Wire the production chain: LLM profiles, Qdrant index, vector store.
    ///
    /// No network call happens here; the Qdrant and LLM clients connect lazily.
    pub fn from_config(cfg: &AppConfig) -> Result<Self, AppError> {
        let llm = Arc::new(
            LlmServiceProfiles::new(cfg.llm.chat.clone(), cfg.llm.embedding.clone()).map_err(
                |e| AppError::Init {
                    component: "llm",
                    reason: e.to_string(),
                },
            )?,
        );
        let index = QdrantIndex::connect(&cfg.rag.qdrant).map_err(|e| AppError::Init {
            component: "qdrant",
            reason: e.to_string(),
        })?;

        let store = VectorStore::new(
            Arc::new(index),
            llm.clone(),
            cfg.rag.embedding.clone(),
            cfg.rag.search.clone(),
        );
        let chain = RetrievalQa::new(Arc::new(store), llm, cfg.chain.clone());
        Ok(Self::new(Arc::new(chain)))
    }
}
