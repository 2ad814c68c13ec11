//! Generate Title use case
//!
//! Best-effort conversation title generation. Runs concurrently with the
//! three-stage pipeline on the first message of a conversation, bounded by
//! its own short timeout. Failure is never an error: the fixed fallback
//! title is returned instead.

use crate::ports::llm_gateway::LlmGateway;
use council_domain::{Message, ModelSpec, PromptTemplate, TITLE_FALLBACK};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Maximum title length in characters.
const MAX_TITLE_LEN: usize = 50;

/// Use case for generating a short conversation title
pub struct GenerateTitleUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    spec: Option<ModelSpec>,
    timeout: Duration,
}

impl<G: LlmGateway + 'static> GenerateTitleUseCase<G> {
    pub fn new(gateway: Arc<G>, spec: Option<ModelSpec>, timeout: Duration) -> Self {
        Self {
            gateway,
            spec,
            timeout,
        }
    }

    /// Generate a title for the given user query.
    ///
    /// Infallible by contract: any gateway failure, missing title model, or
    /// empty completion yields [`TITLE_FALLBACK`].
    pub async fn execute(&self, query: &str) -> String {
        let Some(spec) = &self.spec else {
            return TITLE_FALLBACK.to_string();
        };

        let messages = vec![Message::user(PromptTemplate::title_prompt(query))];

        match self.gateway.complete(spec, &messages, self.timeout).await {
            Ok(reply) => normalize_title(&reply.content),
            Err(e) => {
                warn!("Title generation via {} failed: {}", spec.name, e);
                TITLE_FALLBACK.to_string()
            }
        }
    }
}

/// Strip surrounding whitespace and quotes, then truncate to
/// [`MAX_TITLE_LEN`] characters.
fn normalize_title(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches(['"', '\'']).trim();
    if trimmed.is_empty() {
        return TITLE_FALLBACK.to_string();
    }
    trimmed.chars().take(MAX_TITLE_LEN).collect()
}
