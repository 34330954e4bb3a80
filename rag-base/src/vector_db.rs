//! Qdrant vector DB access: collection reset, batched upserts, counting and
//! top-K search using the builder API of `qdrant_client`.
//!
//! The [`DocumentIndex`] trait is the seam the seeder and the retriever talk
//! to; [`QdrantIndex`] is the production implementation.
//!
//! Point layout:
//! - id: numeric, equal to the document's sequential index
//! - vector: embedding of the document body
//! - payload: `{doc_id, title, source, body}`

use std::{collections::HashMap, future::Future, pin::Pin};

use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, ScoredPoint,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QValue, VectorParamsBuilder,
    point_id::PointIdOptions, value::Kind,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::json;
use tracing::{debug, info};

use crate::errors::rag_base_error::RagBaseError;
use crate::structs::rag_base_config::{DistanceMetric, QdrantConfig};
use crate::structs::rag_store::{Document, SearchHit};

/// Boxed future returned by [`DocumentIndex`] methods.
pub type IndexFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RagBaseError>> + Send + 'a>>;

/// Storage operations needed by seeding and retrieval.
pub trait DocumentIndex: Send + Sync {
    /// Drop the collection if present, then create it with vectors of `dim`.
    fn recreate_collection(&self, dim: usize) -> IndexFuture<'_, ()>;

    /// Write documents with their vectors. Returns the number written.
    fn upsert(&self, points: Vec<(Document, Vec<f32>)>) -> IndexFuture<'_, usize>;

    /// Exact number of points in the collection.
    fn count(&self) -> IndexFuture<'_, u64>;

    /// k-NN search; hits below `min_score` are dropped.
    fn search(
        &self,
        vector: Vec<f32>,
        k: usize,
        min_score: Option<f32>,
    ) -> IndexFuture<'_, Vec<SearchHit>>;
}

/// Qdrant-backed [`DocumentIndex`] bound to a single collection.
pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
    distance: DistanceMetric,
}

impl QdrantIndex {
    /// Build a gRPC client for `cfg.url`.
    ///
    /// This call **does not** touch any collections.
    ///
    /// # Errors
    /// Returns `RagBaseError::Qdrant` if the client cannot be constructed.
    pub fn connect(cfg: &QdrantConfig) -> Result<Self, RagBaseError> {
        let client = Qdrant::from_url(&cfg.url)
            .api_key(cfg.api_key.clone())
            .build()
            .map_err(|e| RagBaseError::Qdrant(format!("client build: {e}")))?;
        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            distance: cfg.distance,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl DocumentIndex for QdrantIndex {
    fn recreate_collection(&self, dim: usize) -> IndexFuture<'_, ()> {
        Box::pin(async move {
            let exists = self
                .client
                .collection_exists(&self.collection)
                .await
                .map_err(|e| RagBaseError::Qdrant(format!("collection_exists: {e}")))?;

            if exists {
                self.client
                    .delete_collection(&self.collection)
                    .await
                    .map_err(|e| RagBaseError::Qdrant(format!("delete_collection: {e}")))?;
                info!(
                    target: "rag_base::index",
                    collection = %self.collection,
                    "dropped existing collection"
                );
            }

            let distance = match self.distance {
                DistanceMetric::Cosine => Distance::Cosine,
                DistanceMetric::Dot => Distance::Dot,
                DistanceMetric::Euclid => Distance::Euclid,
            };

            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection)
                        .vectors_config(VectorParamsBuilder::new(dim as u64, distance)),
                )
                .await
                .map_err(|e| RagBaseError::Qdrant(format!("create_collection: {e}")))?;

            Ok(())
        })
    }

    fn upsert(&self, points: Vec<(Document, Vec<f32>)>) -> IndexFuture<'_, usize> {
        Box::pin(async move {
            if points.is_empty() {
                return Ok(0);
            }

            let mut structs: Vec<PointStruct> = Vec::with_capacity(points.len());
            for (doc, vector) in points {
                let num: u64 = doc
                    .id
                    .parse()
                    .map_err(|_| RagBaseError::InvalidDocumentId(doc.id.clone()))?;
                structs.push(PointStruct::new(num, vector, document_payload(&doc)?));
            }

            let written = structs.len();
            self.client
                .upsert_points(UpsertPointsBuilder::new(&self.collection, structs).wait(true))
                .await
                .map_err(|e| RagBaseError::Qdrant(format!("upsert_points: {e}")))?;

            debug!(collection = %self.collection, written, "upserted batch");
            Ok(written)
        })
    }

    fn count(&self) -> IndexFuture<'_, u64> {
        Box::pin(async move {
            let resp = self
                .client
                .count(CountPointsBuilder::new(&self.collection).exact(true))
                .await
                .map_err(|e| RagBaseError::Qdrant(format!("count: {e}")))?;
            Ok(resp.result.map(|r| r.count).unwrap_or(0))
        })
    }

    fn search(
        &self,
        vector: Vec<f32>,
        k: usize,
        min_score: Option<f32>,
    ) -> IndexFuture<'_, Vec<SearchHit>> {
        Box::pin(async move {
            let mut builder =
                SearchPointsBuilder::new(&self.collection, vector, k as u64).with_payload(true);
            if let Some(t) = min_score {
                builder = builder.score_threshold(t);
            }

            let resp = self
                .client
                .search_points(builder)
                .await
                .map_err(|e| RagBaseError::Qdrant(format!("search_points: {e}")))?;

            Ok(resp.result.into_iter().map(scored_point_to_hit).collect())
        })
    }
}

/// Convert a document into a Qdrant [`Payload`] via JSON.
fn document_payload(doc: &Document) -> Result<Payload, RagBaseError> {
    json!({
        "doc_id": doc.id,
        "title": doc.title,
        "source": doc.source,
        "body": doc.body,
    })
    .try_into()
    .map_err(|e| RagBaseError::Payload(format!("{e}")))
}

/// Map a `ScoredPoint` into a [`SearchHit`]; missing payload fields become
/// empty strings.
fn scored_point_to_hit(sp: ScoredPoint) -> SearchHit {
    let point_id = match sp.id.and_then(|p| p.point_id_options) {
        Some(PointIdOptions::Num(n)) => n.to_string(),
        Some(PointIdOptions::Uuid(s)) => s,
        None => String::new(),
    };

    let payload = &sp.payload;
    let id = payload_str(payload, "doc_id").unwrap_or(point_id);

    SearchHit {
        id,
        score: sp.score,
        title: payload_str(payload, "title").unwrap_or_default(),
        source: payload_str(payload, "source").unwrap_or_default(),
        body: payload_str(payload, "body").unwrap_or_default(),
    }
}

fn payload_str(payload: &HashMap<String, QValue>, key: &str) -> Option<String> {
    match payload.get(key).and_then(|v| v.kind.as_ref()) {
        Some(Kind::StringValue(s)) => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use qdrant_client::qdrant::PointId;

    use super::*;

    fn doc() -> Document {
        Document {
            id: "0".into(),
            title: "A".into(),
            source: "http://x".into(),
            body: "hello world".into(),
        }
    }

    #[test]
    fn payload_carries_metadata_and_body() {
        let payload = document_payload(&doc()).unwrap();
        let map: HashMap<String, QValue> = payload.into();
        assert_eq!(payload_str(&map, "doc_id").as_deref(), Some("0"));
        assert_eq!(payload_str(&map, "title").as_deref(), Some("A"));
        assert_eq!(payload_str(&map, "source").as_deref(), Some("http://x"));
        assert_eq!(payload_str(&map, "body").as_deref(), Some("hello world"));
    }

    #[test]
    fn hit_falls_back_to_numeric_point_id() {
        let sp = ScoredPoint {
            id: Some(PointId::from(7u64)),
            score: 0.5,
            ..Default::default()
        };
        let hit = scored_point_to_hit(sp);
        assert_eq!(hit.id, "7");
        assert!(hit.title.is_empty());
    }

    #[test]
    fn hit_reads_payload() {
        let map: HashMap<String, QValue> = document_payload(&doc()).unwrap().into();
        let sp = ScoredPoint {
            id: Some(PointId::from(0u64)),
            payload: map,
            score: 0.9,
            ..Default::default()
        };
        let hit = scored_point_to_hit(sp);
        assert_eq!(hit.id, "0");
        assert_eq!(hit.source, "http://x");
        assert!((hit.score - 0.9).abs() < f32::EPSILON);
    }
}
