//! HTTP provider adapters
//!
//! One adapter per wire format, all normalizing to the domain's
//! [`ModelReply`] envelope:
//!
//! - [`openai`] - chat-completions shape, shared by OpenAI, xAI, and Zhipu
//! - [`anthropic`] - messages API with a separate top-level system field
//! - [`google`] - Gemini generateContent with flattened text parts
//!
//! [`HttpLlmGateway`] routes a [`ModelSpec`] to the right adapter. Adding
//! a provider means one adapter module, one [`Provider`] variant, and one
//! settings entry; the dispatcher and orchestrator never change.

mod anthropic;
mod google;
mod openai;

use async_trait::async_trait;
use council_application::ports::llm_gateway::{GatewayError, LlmGateway};
use council_domain::{Message, ModelReply, ModelSpec, Provider};
use std::time::Duration;

/// Connection settings for one provider.
///
/// `base_url` is the full request endpoint for chat-style providers, and
/// the models root for Google (the adapter appends
/// `/{model}:generateContent`).
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Environment variable consulted for the API key
    pub api_key_env: String,
    /// Direct API key, overriding the environment variable
    pub api_key: Option<String>,
    /// Request endpoint
    pub base_url: String,
    /// Maximum-output-token ceiling sent with every request
    pub max_tokens: u32,
}

impl ProviderSettings {
    pub fn new(api_key_env: &str, base_url: &str, max_tokens: u32) -> Self {
        Self {
            api_key_env: api_key_env.to_string(),
            api_key: None,
            base_url: base_url.to_string(),
            max_tokens,
        }
    }

    /// Resolve the API key from the explicit value or the environment.
    pub fn resolve_key(&self) -> Result<String, GatewayError> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        std::env::var(&self.api_key_env)
            .map_err(|_| GatewayError::MissingApiKey(self.api_key_env.clone()))
    }
}

/// Per-provider settings table.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    pub openai: ProviderSettings,
    pub anthropic: ProviderSettings,
    pub google: ProviderSettings,
    pub xai: ProviderSettings,
    pub zhipu: ProviderSettings,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self {
            openai: ProviderSettings::new(
                "OPENAI_API_KEY",
                "https://api.openai.com/v1/chat/completions",
                2048,
            ),
            anthropic: ProviderSettings::new(
                "ANTHROPIC_API_KEY",
                "https://api.anthropic.com/v1/messages",
                2048,
            ),
            google: ProviderSettings::new(
                "GOOGLE_API_KEY",
                "https://generativelanguage.googleapis.com/v1beta/models",
                2048,
            ),
            xai: ProviderSettings::new(
                "XAI_API_KEY",
                "https://api.x.ai/v1/chat/completions",
                2048,
            ),
            zhipu: ProviderSettings::new(
                "ZHIPU_API_KEY",
                "https://open.bigmodel.cn/api/paas/v4/chat/completions",
                16384,
            ),
        }
    }
}

impl ProviderRegistry {
    pub fn settings(&self, provider: Provider) -> &ProviderSettings {
        match provider {
            Provider::OpenAi => &self.openai,
            Provider::Anthropic => &self.anthropic,
            Provider::Google => &self.google,
            Provider::XAi => &self.xai,
            Provider::Zhipu => &self.zhipu,
        }
    }
}

/// [`LlmGateway`] implementation over HTTPS.
///
/// One reqwest client shared across all providers; each call is a single
/// attempt bounded by the caller's timeout. Every failure mode - transport
/// error, non-2xx status, malformed body - maps to a [`GatewayError`]; the
/// orchestrator never sees a panic from a provider's idiosyncrasies.
pub struct HttpLlmGateway {
    client: reqwest::Client,
    registry: ProviderRegistry,
}

impl HttpLlmGateway {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            client: reqwest::Client::new(),
            registry,
        }
    }
}

impl Default for HttpLlmGateway {
    fn default() -> Self {
        Self::new(ProviderRegistry::default())
    }
}

#[async_trait]
impl LlmGateway for HttpLlmGateway {
    async fn complete(
        &self,
        spec: &ModelSpec,
        messages: &[Message],
        timeout: Duration,
    ) -> Result<ModelReply, GatewayError> {
        let settings = self.registry.settings(spec.provider);
        match spec.provider {
            Provider::OpenAi | Provider::XAi | Provider::Zhipu => {
                openai::invoke(&self.client, settings, spec, messages, timeout).await
            }
            Provider::Anthropic => {
                anthropic::invoke(&self.client, settings, spec, messages, timeout).await
            }
            Provider::Google => {
                google::invoke(&self.client, settings, spec, messages, timeout).await
            }
        }
    }
}

/// Map a reqwest error to the gateway taxonomy.
pub(crate) fn map_transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(e.to_string())
    }
}

/// Keep error bodies short enough for logs.
pub(crate) fn truncate_body(body: String) -> String {
    const MAX: usize = 512;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_routes_every_provider() {
        let registry = ProviderRegistry::default();
        assert_eq!(registry.settings(Provider::OpenAi).api_key_env, "OPENAI_API_KEY");
        assert_eq!(
            registry.settings(Provider::Zhipu).base_url,
            "https://open.bigmodel.cn/api/paas/v4/chat/completions"
        );
        assert_eq!(registry.settings(Provider::Zhipu).max_tokens, 16384);
    }

    #[test]
    fn test_explicit_key_wins_over_env() {
        let mut settings = ProviderSettings::new("LLM_COUNCIL_TEST_UNSET_KEY", "http://x", 64);
        settings.api_key = Some("sk-explicit".to_string());
        assert_eq!(settings.resolve_key().unwrap(), "sk-explicit");
    }

    #[test]
    fn test_missing_key_is_reported() {
        let settings = ProviderSettings::new("LLM_COUNCIL_TEST_UNSET_KEY", "http://x", 64);
        match settings.resolve_key() {
            Err(GatewayError::MissingApiKey(env)) => {
                assert_eq!(env, "LLM_COUNCIL_TEST_UNSET_KEY")
            }
            other => panic!("expected MissingApiKey, got {:?}", other),
        }
    }

    #[test]
    fn test_truncate_body_caps_length() {
        let long = "a".repeat(2000);
        let truncated = truncate_body(long);
        assert!(truncated.len() <= 515);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate_body("short".to_string()), "short");
    }
}
