//! Configuration layer for the vector store: Qdrant connectivity, embedding
//! shape, and search knobs.
//!
//! Values come from the `rag` section of the YAML config file; every field
//! has a default, and a handful of environment variables override the file
//! (see [`RagConfig::apply_env_overrides`]).

use serde::{Deserialize, Serialize};

use crate::errors::rag_base_error::RagBaseError;

/// Distance metric supported by Qdrant for primary vector space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DistanceMetric {
    #[default]
    #[serde(alias = "cosine")]
    Cosine,
    #[serde(alias = "dot")]
    Dot,
    #[serde(alias = "euclid", alias = "l2")]
    Euclid,
}

impl DistanceMetric {
    /// Parse a metric name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cosine" => Some(DistanceMetric::Cosine),
            "dot" | "dotproduct" => Some(DistanceMetric::Dot),
            "euclid" | "l2" => Some(DistanceMetric::Euclid),
            _ => None,
        }
    }
}

/// Embedding shape and ingestion concurrency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding vector dimensionality (768 for `nomic-embed-text`).
    pub dim: usize,
    /// Max concurrent embedding requests while seeding.
    pub concurrency: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dim: 768,
            concurrency: 4,
        }
    }
}

/// Qdrant connectivity and collection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QdrantConfig {
    /// gRPC URL for Qdrant (e.g., "http://localhost:6334").
    pub url: String,
    /// Optional API key for managed Qdrant.
    pub api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Vector distance metric (Cosine by default).
    pub distance: DistanceMetric,
    /// Batch size for upserts (vectors + payloads).
    pub batch_size: usize,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            api_key: None,
            collection: "main".to_string(),
            distance: DistanceMetric::Cosine,
            batch_size: 64,
        }
    }
}

/// Search behavior knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of documents retrieved per query.
    pub top_k: usize,
    /// Optional minimum similarity score; weaker hits are dropped by Qdrant.
    pub min_score: Option<f32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            min_score: None,
        }
    }
}

/// Top-level runtime configuration for the RAG module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Qdrant connectivity & collection settings.
    pub qdrant: QdrantConfig,
    /// Embedding shape.
    pub embedding: EmbeddingConfig,
    /// Search behavior settings.
    pub search: SearchConfig,
}

impl RagConfig {
    /// Overlay process environment variables on top of the file values.
    ///
    /// Environment variables used:
    /// - `QDRANT_URL`
    /// - `QDRANT_API_KEY`
    /// - `QDRANT_COLLECTION`
    /// - `QDRANT_DISTANCE` (values: "Cosine" | "Dot" | "Euclid")
    /// - `QDRANT_BATCH_SIZE`
    /// - `EMBEDDING_DIM`
    /// - `EMBEDDING_CONCURRENCY`
    /// - `RAG_TOP_K`
    /// - `RAG_MIN_SCORE`
    ///
    /// # Errors
    /// `EnvParse` when a numeric or enum variable is set but unparsable.
    pub fn apply_env_overrides(&mut self) -> Result<(), RagBaseError> {
        self.apply_overrides(&|key| std::env::var(key).ok())
    }

    /// Same as [`Self::apply_env_overrides`] with variables read through
    /// `lookup`. Blank values count as unset.
    pub fn apply_overrides(
        &mut self,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<(), RagBaseError> {
        let env = EnvReader(lookup);

        if let Some(url) = env.text("QDRANT_URL") {
            self.qdrant.url = url;
        }
        if let Some(key) = env.text("QDRANT_API_KEY") {
            self.qdrant.api_key = Some(key);
        }
        if let Some(name) = env.text("QDRANT_COLLECTION") {
            self.qdrant.collection = name;
        }
        if let Some(raw) = env.text("QDRANT_DISTANCE") {
            self.qdrant.distance =
                DistanceMetric::parse(&raw).ok_or_else(|| RagBaseError::EnvParse {
                    key: "QDRANT_DISTANCE".into(),
                    value: raw.clone(),
                })?;
        }
        if let Some(n) = env.parsed("QDRANT_BATCH_SIZE")? {
            self.qdrant.batch_size = n;
        }
        if let Some(n) = env.parsed("EMBEDDING_DIM")? {
            self.embedding.dim = n;
        }
        if let Some(n) = env.parsed("EMBEDDING_CONCURRENCY")? {
            self.embedding.concurrency = n;
        }
        if let Some(n) = env.parsed("RAG_TOP_K")? {
            self.search.top_k = n;
        }
        if let Some(s) = env.parsed::<f32>("RAG_MIN_SCORE")? {
            self.search.min_score = Some(s);
        }
        Ok(())
    }

    /// Basic validations run once at startup.
    ///
    /// # Errors
    /// `InvalidConfig` naming the offending field.
    pub fn validate(&self) -> Result<(), RagBaseError> {
        let url = self.qdrant.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(RagBaseError::InvalidConfig(format!(
                "rag.qdrant.url must start with http:// or https://, got '{url}'"
            )));
        }
        if self.qdrant.collection.trim().is_empty() {
            return Err(RagBaseError::InvalidConfig(
                "rag.qdrant.collection must not be empty".into(),
            ));
        }
        if self.qdrant.batch_size == 0 {
            return Err(RagBaseError::InvalidConfig(
                "rag.qdrant.batch_size must be > 0".into(),
            ));
        }
        if self.embedding.dim == 0 {
            return Err(RagBaseError::InvalidConfig(
                "rag.embedding.dim must be > 0".into(),
            ));
        }
        if self.search.top_k == 0 {
            return Err(RagBaseError::InvalidConfig(
                "rag.search.top_k must be > 0".into(),
            ));
        }
        if let Some(s) = self.search.min_score
            && !s.is_finite()
        {
            return Err(RagBaseError::InvalidConfig(
                "rag.search.min_score must be a finite number".into(),
            ));
        }
        Ok(())
    }
}

struct EnvReader<'a>(&'a dyn Fn(&str) -> Option<String>);

impl EnvReader<'_> {
    fn text(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>, RagBaseError> {
        match self.text(key) {
            Some(v) => v.parse().map(Some).map_err(|_| RagBaseError::EnvParse {
                key: key.into(),
                value: v,
            }),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = RagConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.qdrant.collection, "main");
        assert_eq!(cfg.search.top_k, 4);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg: RagConfig = serde_yml::from_str(
            "qdrant:\n  collection: docs\n  distance: dot\nsearch:\n  top_k: 2\n",
        )
        .unwrap();
        assert_eq!(cfg.qdrant.collection, "docs");
        assert_eq!(cfg.qdrant.distance, DistanceMetric::Dot);
        assert_eq!(cfg.qdrant.url, "http://localhost:6334");
        assert_eq!(cfg.search.top_k, 2);
        assert_eq!(cfg.embedding.dim, 768);
    }

    #[test]
    fn rejects_zero_dim_and_top_k() {
        let mut cfg = RagConfig::default();
        cfg.embedding.dim = 0;
        assert!(matches!(cfg.validate(), Err(RagBaseError::InvalidConfig(_))));

        let mut cfg = RagConfig::default();
        cfg.search.top_k = 0;
        assert!(matches!(cfg.validate(), Err(RagBaseError::InvalidConfig(_))));
    }

    fn vars(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn env_values_override_the_file() {
        let mut cfg = RagConfig::default();
        cfg.apply_overrides(&vars(&[
            ("QDRANT_URL", " http://qdrant:6334 "),
            ("QDRANT_COLLECTION", "docs"),
            ("QDRANT_DISTANCE", "dot"),
            ("QDRANT_API_KEY", ""),
            ("EMBEDDING_DIM", "384"),
            ("RAG_TOP_K", "8"),
            ("RAG_MIN_SCORE", "0.25"),
        ]))
        .unwrap();

        assert_eq!(cfg.qdrant.url, "http://qdrant:6334");
        assert_eq!(cfg.qdrant.collection, "docs");
        assert_eq!(cfg.qdrant.distance, DistanceMetric::Dot);
        assert_eq!(cfg.qdrant.api_key, None);
        assert_eq!(cfg.qdrant.batch_size, 64);
        assert_eq!(cfg.embedding.dim, 384);
        assert_eq!(cfg.search.top_k, 8);
        assert_eq!(cfg.search.min_score, Some(0.25));
    }

    #[test]
    fn unparsable_env_values_are_errors() {
        for (key, value) in [
            ("EMBEDDING_DIM", "x"),
            ("QDRANT_BATCH_SIZE", "-1"),
            ("RAG_MIN_SCORE", "high"),
            ("QDRANT_DISTANCE", "manhattan"),
        ] {
            let mut cfg = RagConfig::default();
            let err = cfg
                .apply_overrides(&|k: &str| (k == key).then(|| value.to_string()))
                .unwrap_err();
            assert!(
                matches!(&err, RagBaseError::EnvParse { key: k, value: v } if k == key && v == value),
                "{key}: {err}"
            );
        }
    }

    #[test]
    fn parses_distance_names() {
        assert_eq!(DistanceMetric::parse("L2"), Some(DistanceMetric::Euclid));
        assert_eq!(DistanceMetric::parse(" cosine "), Some(DistanceMetric::Cosine));
        assert_eq!(DistanceMetric::parse("manhattan"), None);
    }
}
