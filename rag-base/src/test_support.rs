//! In-memory fakes shared by the unit tests.

use std::{future::Future, pin::Pin, sync::Mutex};

use crate::embedding::EmbeddingsProvider;
use crate::errors::rag_base_error::RagBaseError;
use crate::structs::rag_store::{Document, SearchHit};
use crate::vector_db::{DocumentIndex, IndexFuture};

/// Deterministic bag-of-bytes embedder.
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    pub fn vector(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0; self.dim];
        for (i, b) in text.to_lowercase().bytes().enumerate() {
            v[(b as usize + i) % self.dim] += 1.0;
        }
        v
    }
}

impl EmbeddingsProvider for HashEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagBaseError>> + Send + 'a>> {
        let v = self.vector(text);
        Box::pin(async move { Ok(v) })
    }
}

/// Vector index kept in a `Vec`, scored by cosine similarity.
#[derive(Default)]
pub struct MemoryIndex {
    pub points: Mutex<Vec<(Document, Vec<f32>)>>,
    pub recreated: Mutex<usize>,
}

impl MemoryIndex {
    pub fn ids(&self) -> Vec<String> {
        let points = self.points.lock().unwrap();
        points.iter().map(|(d, _)| d.id.clone()).collect()
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 { 0.0 } else { dot / (na * nb) }
}

impl DocumentIndex for MemoryIndex {
    fn recreate_collection(&self, _dim: usize) -> IndexFuture<'_, ()> {
        self.points.lock().unwrap().clear();
        *self.recreated.lock().unwrap() += 1;
        Box::pin(async { Ok(()) })
    }

    fn upsert(&self, points: Vec<(Document, Vec<f32>)>) -> IndexFuture<'_, usize> {
        let n = points.len();
        let mut stored = self.points.lock().unwrap();
        for (doc, v) in points {
            stored.retain(|(d, _)| d.id != doc.id);
            stored.push((doc, v));
        }
        Box::pin(async move { Ok(n) })
    }

    fn count(&self) -> IndexFuture<'_, u64> {
        let n = self.points.lock().unwrap().len() as u64;
        Box::pin(async move { Ok(n) })
    }

    fn search(
        &self,
        vector: Vec<f32>,
        k: usize,
        min_score: Option<f32>,
    ) -> IndexFuture<'_, Vec<SearchHit>> {
        let mut hits: Vec<SearchHit> = self
            .points
            .lock()
            .unwrap()
            .iter()
            .map(|(d, v)| SearchHit {
                id: d.id.clone(),
                score: cosine(&vector, v),
                title: d.title.clone(),
                source: d.source.clone(),
                body: d.body.clone(),
            })
            .filter(|h| min_score.is_none_or(|m| h.score >= m))
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        Box::pin(async move { Ok(hits) })
    }
}
