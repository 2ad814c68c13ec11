//! Anthropic messages-API adapter
//!
//! Anthropic takes the system prompt as a separate top-level field rather
//! than a message, so the adapter splits it out of the message array.

use super::{map_transport_error, truncate_body, ProviderSettings};
use council_application::ports::llm_gateway::GatewayError;
use council_domain::{Message, ModelReply, ModelSpec, Role, TokenUsage};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub(super) async fn invoke(
    client: &reqwest::Client,
    settings: &ProviderSettings,
    spec: &ModelSpec,
    messages: &[Message],
    timeout: Duration,
) -> Result<ModelReply, GatewayError> {
    let key = settings.resolve_key()?;
    let payload = build_payload(&spec.model_id, messages, settings.max_tokens);

    let response = client
        .post(&settings.base_url)
        .header("x-api-key", key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .json(&payload)
        .timeout(timeout)
        .send()
        .await
        .map_err(map_transport_error)?;

    let status = response.status();
    let body = response.text().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(GatewayError::Api {
            status: status.as_u16(),
            body: truncate_body(body),
        });
    }

    parse_response(&body, settings.max_tokens)
}

/// System-message extraction: system content moves to the top-level
/// `system` field, remaining messages pass through.
fn build_payload(model_id: &str, messages: &[Message], max_tokens: u32) -> Value {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();

    let chat: Vec<Value> = messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| json!({"role": "user", "content": m.content}))
        .collect();

    let mut payload = json!({
        "model": model_id,
        "max_tokens": max_tokens,
        "messages": chat,
    });
    if !system.is_empty() {
        payload["system"] = Value::String(system.join("\n\n"));
    }
    payload
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<MessagesUsage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct MessagesUsage {
    input_tokens: u32,
    output_tokens: u32,
}

fn parse_response(body: &str, max_tokens: u32) -> Result<ModelReply, GatewayError> {
    let parsed: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

    let block = parsed
        .content
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::MalformedResponse("empty content array".to_string()))?;

    let usage = parsed.usage.unwrap_or_default();
    Ok(ModelReply::new(
        block.text,
        TokenUsage {
            prompt_tokens: usage.input_tokens,
            completion_tokens: usage.output_tokens,
            total_tokens: usage.input_tokens + usage.output_tokens,
            max_tokens,
        },
    ))
}
