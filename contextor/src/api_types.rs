//! Public API types re-used by external crates (e.g., the HTTP API layer).

use serde::{Deserialize, Serialize};

/// Longest accepted query, counted in Unicode scalar values.
pub const MAX_QUERY_CHARS: usize = 250;

/// A user question.
///
/// # Example
/// ```
/// use contextor::Query;
/// let q = Query { query: "What is Rust?".into() };
/// assert!(q.query.chars().count() <= contextor::MAX_QUERY_CHARS);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub query: String,
}

/// One retrieved document that was fed to the model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub id: String,
    pub title: String,
    pub source: String,
    pub score: f32,
}

/// Final answer together with the documents it was grounded on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    pub sources: Vec<SourceRef>,
}
