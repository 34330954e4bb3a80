//! Chat model seam.

use std::{future::Future, pin::Pin};

use ai_llm_service::LlmServiceProfiles;

use crate::error::ContextorError;

/// Something that turns a `(system, user)` prompt pair into text.
pub trait LanguageModel: Send + Sync {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ContextorError>> + Send + 'a>>;
}

impl LanguageModel for LlmServiceProfiles {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ContextorError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.generate(user, Some(system)).await?) })
    }
}
