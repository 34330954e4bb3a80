//! Retrieval seam: fetch the documents a question should be answered from.

use std::{future::Future, pin::Pin};

use rag_base::VectorStore;
use rag_base::structs::rag_store::SearchHit;

use crate::error::ContextorError;

pub trait Retriever: Send + Sync {
    fn retrieve<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SearchHit>, ContextorError>> + Send + 'a>>;
}

impl Retriever for VectorStore {
    fn retrieve<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SearchHit>, ContextorError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.similarity_search(query).await?) })
    }
}
