use serde::{Deserialize, Serialize};

/// A document ready for indexing.
///
/// `id` is the positional index in the seed file rendered as a string
/// (`"0"`, `"1"`, ...). `body` is the text that gets embedded; `title` and
/// `source` travel along as metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub source: String,
    pub body: String,
}

/// One similarity-search match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub title: String,
    pub source: String,
    pub body: String,
}

/// Summary statistics for a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Points written during this run.
    pub indexed: usize,
    /// Points reported by the collection after the run.
    pub total: u64,
    pub duration_ms: u128,
}
