//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers.

use async_trait::async_trait;
use council_domain::{Message, ModelReply, ModelSpec};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during a provider call
///
/// Every transport problem, non-2xx status, or malformed response body is
/// converted into one of these variants close to its source. The
/// orchestrator treats them all identically: the call contributed nothing.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    #[error("Request timed out")]
    Timeout,
}

/// Gateway for LLM communication
///
/// This port defines how the application layer reaches LLM providers.
/// Implementations (adapters) live in the infrastructure layer, one wire
/// format per provider, all normalized to [`ModelReply`].
///
/// Exactly one attempt per call - no caching, no retry. Retries are
/// deliberately not this layer's responsibility so fan-out latency stays
/// bounded by the per-call timeout.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send one conversational prompt to one model and return the
    /// normalized reply. `timeout` bounds the whole call.
    async fn complete(
        &self,
        spec: &ModelSpec,
        messages: &[Message],
        timeout: Duration,
    ) -> Result<ModelReply, GatewayError>;
}
