//! Query-side handle over the vector store.

use std::sync::Arc;

use tracing::{debug, info};

use crate::embedding::{EmbeddingsProvider, embed_one};
use crate::errors::rag_base_error::RagBaseError;
use crate::structs::rag_base_config::{EmbeddingConfig, SearchConfig};
use crate::structs::rag_store::SearchHit;
use crate::vector_db::DocumentIndex;

/// Embeds queries and runs similarity search against one collection.
///
/// Built once at startup and shared behind an `Arc`; all fields are
/// read-only after construction.
#[derive(Clone)]
pub struct VectorStore {
    index: Arc<dyn DocumentIndex>,
    embedder: Arc<dyn EmbeddingsProvider>,
    embedding: EmbeddingConfig,
    search: SearchConfig,
}

impl VectorStore {
    pub fn new(
        index: Arc<dyn DocumentIndex>,
        embedder: Arc<dyn EmbeddingsProvider>,
        embedding: EmbeddingConfig,
        search: SearchConfig,
    ) -> Self {
        Self {
            index,
            embedder,
            embedding,
            search,
        }
    }

    /// Top-k search with the configured `top_k` and `min_score`.
    pub async fn similarity_search(&self, query: &str) -> Result<Vec<SearchHit>, RagBaseError> {
        self.similarity_search_k(query, self.search.top_k).await
    }

    /// Top-k search with an explicit `k`.
    ///
    /// # Errors
    /// Embedding failures, dimension mismatches and Qdrant errors.
    pub async fn similarity_search_k(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchHit>, RagBaseError> {
        debug!(
            target: "rag_base::search",
            query_len = query.chars().count(),
            k,
            "similarity_search: start"
        );

        let vector = embed_one(self.embedder.as_ref(), query, self.embedding.dim).await?;
        let hits = self
            .index
            .search(vector, k, self.search.min_score)
            .await?;

        info!(
            target: "rag_base::search",
            hits = hits.len(),
            top_score = hits.first().map(|h| h.score),
            "similarity_search: finished"
        );
        Ok(hits)
    }
}
