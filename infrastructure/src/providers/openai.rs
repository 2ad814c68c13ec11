//! Chat-completions adapter (OpenAI, xAI, Zhipu)
//!
//! All three providers speak the OpenAI chat-completions shape; only the
//! endpoint, key, and token ceiling differ. Messages pass through as-is.

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
    let payload = build_payload(&spec.model_id, messages, settings.max_tokens);

    let response = client
        .post(&settings.base_url)
        .bearer_auth(key)
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

/// Message-array passthrough: roles and contents map 1:1.
fn build_payload(model_id: &str, messages: &[Message], max_tokens: u32) -> Value {
    json!({
        "model": model_id,
        "messages": messages,
        "max_tokens": max_tokens,
        "temperature": 0.7,
    })
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

fn parse_response(body: &str, max_tokens: u32) -> Result<ModelReply, GatewayError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::MalformedResponse("empty choices array".to_string()))?;

    let usage = parsed.usage.unwrap_or_default();
    Ok(ModelReply::new(
        choice.message.content,
        TokenUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
            max_tokens,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_passes_messages_through() {
        let messages = vec![Message::system("be brief"), Message::user("hi")];
        let payload = build_payload("gpt-4", &messages, 2048);
        assert_eq!(payload["model"], "gpt-4");
        assert_eq!(payload["max_tokens"], 2048);
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][0]["content"], "be brief");
        assert_eq!(payload["messages"][1]["role"], "user");
    }

    #[test]
    fn test_parse_well_formed_response() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "hello"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;
        let reply = parse_response(body, 2048).unwrap();
        assert_eq!(reply.content, "hello");
        assert_eq!(reply.usage.prompt_tokens, 10);
        assert_eq!(reply.usage.total_tokens, 15);
        assert_eq!(reply.usage.max_tokens, 2048);
    }

    #[test]
    fn test_parse_missing_usage_defaults_to_zero() {
        let body = r#"{"choices": [{"message": {"content": "hello"}}]}"#;
        let reply = parse_response(body, 512).unwrap();
        assert_eq!(reply.usage.prompt_tokens, 0);
        assert_eq!(reply.usage.max_tokens, 512);
    }

    #[test]
    fn test_parse_empty_choices_is_malformed() {
        let body = r#"{"choices": []}"#;
        assert!(matches!(
            parse_response(body, 512),
            Err(GatewayError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_invalid_json_is_malformed() {
        assert!(matches!(
            parse_response("not json", 512),
            Err(GatewayError::MalformedResponse(_))
        ));
    }
}
