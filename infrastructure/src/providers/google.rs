//! Google Gemini generateContent adapter
//!
//! Gemini has no native multi-turn chat field for this flow; every message
//! is flattened into a single concatenated part list. The API key travels
//! as a query parameter.

use super::{map_transport_error, truncate_body, ProviderSettings};
use council_application::ports::llm_gateway::GatewayError;
use council_domain::{Message, ModelReply, ModelSpec, TokenUsage};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

pub(super) async fn invoke(
    client: &reqwest::Client,
    settings: &ProviderSettings,
    spec: &ModelSpec,
    messages: &[Message],
    timeout: Duration,
) -> Result<ModelReply, GatewayError> {
    let key = settings.resolve_key()?;
    let payload = build_payload(messages, settings.max_tokens);
    let url = format!(
        "{}/{}:generateContent",
        settings.base_url.trim_end_matches('/'),
        spec.model_id
    );

    let response = client
        .post(&url)
        .query(&[("key", key.as_str())])
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

/// Flatten every message into one part list, in prompt order.
fn build_payload(messages: &[Message], max_tokens: u32) -> Value {
    let parts: Vec<Value> = messages
        .iter()
        .map(|m| json!({"text": m.content}))
        .collect();

    json!({
        "contents": [{"parts": parts}],
        "generationConfig": {
            "temperature": 0.7,
            "maxOutputTokens": max_tokens,
        }
    })
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
    #[serde(default, rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: u32,
    candidates_token_count: u32,
    total_token_count: u32,
}

fn parse_response(body: &str, max_tokens: u32) -> Result<ModelReply, GatewayError> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or_else(|| GatewayError::MalformedResponse("no candidate text".to_string()))?;

    let usage = parsed.usage_metadata.unwrap_or_default();
    Ok(ModelReply::new(
        text,
        TokenUsage {
            prompt_tokens: usage.prompt_token_count,
            completion_tokens: usage.candidates_token_count,
            total_tokens: usage.total_token_count,
            max_tokens,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_flattens_all_messages_into_parts() {
        let messages = vec![Message::system("be brief"), Message::user("hi")];
        let payload = build_payload(&messages, 2048);
        let parts = payload["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["text"], "be brief");
        assert_eq!(parts[1]["text"], "hi");
        assert_eq!(payload["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn test_parse_extracts_candidate_text_and_usage() {
        let body = r#"{
            "candidates": [{"content": {"parts": [{"text": "hello"}]}}],
            "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 2, "totalTokenCount": 6}
        }"#;
        let reply = parse_response(body, 1024).unwrap();
        assert_eq!(reply.content, "hello");
        assert_eq!(reply.usage.prompt_tokens, 4);
        assert_eq!(reply.usage.completion_tokens, 2);
        assert_eq!(reply.usage.total_tokens, 6);
    }

    #[test]
    fn test_parse_no_candidates_is_malformed() {
        assert!(matches!(
            parse_response(r#"{"candidates": []}"#, 1024),
            Err(GatewayError::MalformedResponse(_))
        ));
    }
}
