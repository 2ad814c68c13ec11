//! Model specifications and the council roster

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// LLM provider backing a model (Value Object)
///
/// A closed but extensible variant set: adding a provider means adding a
/// variant here, one adapter in infrastructure, and one configuration
/// section. The dispatcher and orchestrator never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Google,
    XAi,
    Zhipu,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Google => "google",
            Provider::XAi => "xai",
            Provider::Zhipu => "zhipu",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            "google" => Ok(Provider::Google),
            "xai" => Ok(Provider::XAi),
            "zhipu" => Ok(Provider::Zhipu),
            other => Err(DomainError::UnknownProvider(other.to_string())),
        }
    }
}

/// Specification of one model in the council (Value Object)
///
/// Immutable, defined at process configuration time. `name` is the unique
/// human-readable identity used everywhere downstream: stage results,
/// label mapping, and aggregate rankings are all keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Unique human-readable name (e.g. "Claude Sonnet 4.5")
    pub name: String,
    /// Provider that serves this model
    pub provider: Provider,
    /// Provider-specific model identifier (e.g. "claude-3-5-sonnet-20241022")
    pub model_id: String,
    /// Descriptive role within the council
    #[serde(default)]
    pub role: String,
}

impl ModelSpec {
    pub fn new(
        name: impl Into<String>,
        provider: Provider,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            provider,
            model_id: model_id.into(),
            role: String::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }
}

/// The full set of models taking part in council runs (Entity)
///
/// Read-only process-wide configuration: members answer and rank (stages 1
/// and 2), the chairman synthesizes (stage 3), and the optional title model
/// handles the best-effort conversation title task. Member declaration
/// order matters: it fixes result ordering and label assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouncilRoster {
    pub members: Vec<ModelSpec>,
    pub chairman: ModelSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_model: Option<ModelSpec>,
}

impl CouncilRoster {
    pub fn new(members: Vec<ModelSpec>, chairman: ModelSpec) -> Self {
        Self {
            members,
            chairman,
            title_model: None,
        }
    }

    pub fn with_title_model(mut self, spec: ModelSpec) -> Self {
        self.title_model = Some(spec);
        self
    }

    pub fn member_names(&self) -> Vec<String> {
        self.members.iter().map(|m| m.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_roundtrip() {
        for provider in [
            Provider::OpenAi,
            Provider::Anthropic,
            Provider::Google,
            Provider::XAi,
            Provider::Zhipu,
        ] {
            let parsed: Provider = provider.as_str().parse().unwrap();
            assert_eq!(provider, parsed);
        }
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let result: Result<Provider, _> = "mistral".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_provider_serde_as_string() {
        let json = serde_json::to_string(&Provider::XAi).unwrap();
        assert_eq!(json, "\"xai\"");
        let back: Provider = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Provider::XAi);
    }

    #[test]
    fn test_roster_member_names_follow_declaration_order() {
        let roster = CouncilRoster::new(
            vec![
                ModelSpec::new("B Model", Provider::OpenAi, "gpt-4"),
                ModelSpec::new("A Model", Provider::Anthropic, "claude-3"),
            ],
            ModelSpec::new("Chair", Provider::Zhipu, "glm-4"),
        );
        assert_eq!(roster.member_names(), vec!["B Model", "A Model"]);
    }
}
