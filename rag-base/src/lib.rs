//! Public API:
//! - `seed_collection`: drop+create collection, embed documents, upsert in batches.
//! - `seed_from_file`: read a seed file, then `seed_collection`.
//! - `VectorStore::similarity_search`: embed query, top-k vector search.

pub mod embedding;
pub mod errors;
pub mod seed_reader;
pub mod store;
pub mod structs;
pub mod vector_db;

#[cfg(test)]
mod test_support;

use std::path::Path;
use std::time::Instant;

use tracing::info;

use embedding::{EmbeddingsProvider, embed_all};
use errors::rag_base_error::RagBaseError;
use structs::rag_base_config::RagConfig;
use structs::rag_store::{Document, IndexStats};
use vector_db::DocumentIndex;

pub use store::VectorStore;
pub use vector_db::QdrantIndex;

/// Build a fresh collection from `documents`.
///
/// The collection is dropped when it exists and created again, so running
/// this twice with the same input leaves the same points behind.
///
/// # Errors
/// Any embedding or vector-store failure aborts the run.
pub async fn seed_collection(
    index: &dyn DocumentIndex,
    embedder: &dyn EmbeddingsProvider,
    cfg: &RagConfig,
    documents: Vec<Document>,
) -> Result<IndexStats, RagBaseError> {
    info!(
        target: "rag_base::index",
        collection = %cfg.qdrant.collection,
        documents = documents.len(),
        "seed_collection: start"
    );
    let started = Instant::now();

    index.recreate_collection(cfg.embedding.dim).await?;

    let mut indexed = 0usize;
    for batch in documents.chunks(cfg.qdrant.batch_size.max(1)) {
        let texts: Vec<&str> = batch.iter().map(|d| d.body.as_str()).collect();
        let vectors = embed_all(
            embedder,
            &texts,
            cfg.embedding.dim,
            cfg.embedding.concurrency,
        )
        .await?;

        let points = batch.iter().cloned().zip(vectors).collect::<Vec<_>>();
        indexed += index.upsert(points).await?;
    }

    let total = index.count().await?;
    let stats = IndexStats {
        indexed,
        total,
        duration_ms: started.elapsed().as_millis(),
    };

    info!(
        target: "rag_base::index",
        collection = %cfg.qdrant.collection,
        indexed = stats.indexed,
        total = stats.total,
        duration_ms = stats.duration_ms,
        "seed_collection: finished"
    );

    Ok(stats)
}

/// Read the seed file at `path` and index it.
pub async fn seed_from_file(
    path: &Path,
    index: &dyn DocumentIndex,
    embedder: &dyn EmbeddingsProvider,
    cfg: &RagConfig,
) -> Result<IndexStats, RagBaseError> {
    let documents = seed_reader::read_seed_file(path)?;
    seed_collection(index, embedder, cfg, documents).await
}
