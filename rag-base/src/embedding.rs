//! Embedding provider seam and batch helpers.

use std::{future::Future, pin::Pin};

use ai_llm_service::LlmServiceProfiles;
use futures::{StreamExt, TryStreamExt, stream};
use tracing::debug;

use crate::errors::rag_base_error::RagBaseError;

/// Provider interface for embedding generation.
///
/// Async because real providers (Ollama, OpenAI) perform HTTP requests.
pub trait EmbeddingsProvider: Send + Sync {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagBaseError>> + Send + 'a>>;
}

impl EmbeddingsProvider for LlmServiceProfiles {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagBaseError>> + Send + 'a>> {
        Box::pin(async move {
            LlmServiceProfiles::embed(self, text)
                .await
                .map_err(|e| RagBaseError::Embedding(e.to_string()))
        })
    }
}

/// Embeds a single text and checks its dimension.
pub async fn embed_one(
    embedder: &dyn EmbeddingsProvider,
    text: &str,
    dim: usize,
) -> Result<Vec<f32>, RagBaseError> {
    let v = embedder.embed(text).await?;
    check_dim(&v, dim)?;
    Ok(v)
}

/// Embeds `texts` with at most `concurrency` requests in flight.
///
/// Output order matches input order. Fails on the first provider error or
/// the first vector whose length differs from `dim`.
pub async fn embed_all(
    embedder: &dyn EmbeddingsProvider,
    texts: &[&str],
    dim: usize,
    concurrency: usize,
) -> Result<Vec<Vec<f32>>, RagBaseError> {
    let vectors: Vec<Vec<f32>> = stream::iter(texts.iter().map(|t| embedder.embed(t)))
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    for v in &vectors {
        check_dim(v, dim)?;
    }
    debug!(count = vectors.len(), dim, "embedded batch");
    Ok(vectors)
}

fn check_dim(v: &[f32], dim: usize) -> Result<(), RagBaseError> {
    if v.len() != dim {
        return Err(RagBaseError::DimensionMismatch {
            expected: dim,
            got: v.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::HashEmbedder;

    #[tokio::test]
    async fn keeps_input_order_under_concurrency() {
        let embedder = HashEmbedder::new(8);
        let texts = ["alpha", "beta", "gamma", "delta", "epsilon"];
        let all = embed_all(&embedder, &texts, 8, 3).await.unwrap();
        for (t, v) in texts.iter().zip(&all) {
            assert_eq!(v, &embedder.vector(t));
        }
    }

    #[tokio::test]
    async fn rejects_wrong_dimension() {
        let embedder = HashEmbedder::new(8);
        let err = embed_one(&embedder, "alpha", 16).await.unwrap_err();
        assert!(matches!(
            err,
            RagBaseError::DimensionMismatch {
                expected: 16,
                got: 8
            }
        ));
    }
}
