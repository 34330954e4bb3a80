//! Retrieval-augmented question answering.
//!
//! Public API: [`RetrievalQa::chat`]. It retrieves the nearest documents for
//! the question, stuffs their bodies into a single prompt, asks the chat
//! model, and returns the answer together with the sources used.

pub mod cfg;
mod error;
pub mod llm;
pub mod prompt;
pub mod retrieve;

mod api_types;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

pub use api_types::{ChatResponse, MAX_QUERY_CHARS, Query, SourceRef};
pub use cfg::ChainConfig;
pub use error::ContextorError;
pub use llm::LanguageModel;
pub use retrieve::Retriever;

/// The "stuff" retrieval-QA chain.
///
/// Built once at startup; every field is shared read-only between requests.
///
/// # Example
/// ```no_run
/// # use std::sync::Arc;
/// # use contextor::{ChainConfig, Query, RetrievalQa, Retriever, LanguageModel};
/// # async fn demo(retriever: Arc<dyn Retriever>, llm: Arc<dyn LanguageModel>) {
/// let qa = RetrievalQa::new(retriever, llm, ChainConfig::default());
/// let resp = qa.chat(&Query { query: "What is Qdrant?".into() }).await.unwrap();
/// println!("{} ({} sources)", resp.answer, resp.sources.len());
/// # }
/// ```
pub struct RetrievalQa {
    retriever: Arc<dyn Retriever>,
    llm: Arc<dyn LanguageModel>,
    cfg: ChainConfig,
}

impl RetrievalQa {
    pub fn new(retriever: Arc<dyn Retriever>, llm: Arc<dyn LanguageModel>, cfg: ChainConfig) -> Self {
        Self {
            retriever,
            llm,
            cfg,
        }
    }

    /// Answer `query` from the retrieved documents.
    ///
    /// `sources` lists only the hits that fit into the context budget.
    ///
    /// # Errors
    /// Propagates retrieval and LLM failures; an all-whitespace answer is
    /// reported as [`ContextorError::EmptyAnswer`].
    pub async fn chat(&self, query: &Query) -> Result<ChatResponse, ContextorError> {
        let started = Instant::now();
        let question = query.query.trim();

        let mut hits = self.retriever.retrieve(question).await?;
        debug!(hits = hits.len(), "retrieved context");

        let user_prompt = prompt::build_user_prompt(question, &hits, self.cfg.max_context_chars);
        if user_prompt.used < hits.len() {
            debug!(
                used = user_prompt.used,
                dropped = hits.len() - user_prompt.used,
                "context budget exhausted"
            );
        }
        hits.truncate(user_prompt.used);

        let raw = self
            .llm
            .complete(&self.cfg.system_prompt, &user_prompt.text)
            .await?;

        let answer = raw.trim();
        if answer.is_empty() {
            return Err(ContextorError::EmptyAnswer);
        }

        let sources = hits
            .into_iter()
            .map(|h| SourceRef {
                id: h.id,
                title: h.title,
                source: h.source,
                score: h.score,
            })
            .collect::<Vec<_>>();

        info!(
            sources = sources.len(),
            prompt_chars = user_prompt.text.len(),
            latency_ms = started.elapsed().as_millis(),
            "chat answered"
        );

        Ok(ChatResponse {
            answer: answer.to_string(),
            sources,
        })
    }
}
