//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Defaults mirror a four-member council with a GLM-4 chairman and a fast
//! Gemini title model, so the binary works with nothing but API keys set.

use crate::providers::{ProviderRegistry, ProviderSettings};
use council_application::use_cases::run_council::ExecutionParams;
use council_domain::{CouncilRoster, ModelSpec, Provider};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Councils are anonymized with single-letter labels, so membership is
/// capped at the label alphabet.
const MAX_MEMBERS: usize = 26;

/// Errors detected while turning file config into domain config
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("council.members must not be empty")]
    NoMembers,

    #[error("council.members supports at most {MAX_MEMBERS} entries, got {0}")]
    TooManyMembers(usize),

    #[error("{field}: model name must not be empty")]
    EmptyName { field: String },

    #[error("duplicate council member name: {0}")]
    DuplicateMember(String),

    #[error("{field}: unknown provider \"{name}\"")]
    UnknownProvider { field: String, name: String },

    #[error("could not load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Council membership and chairman
    pub council: FileCouncilConfig,
    /// Per-provider endpoints and keys
    pub providers: FileProvidersConfig,
    /// Timeouts
    pub behavior: FileBehaviorConfig,
}

impl FileConfig {
    /// Build the immutable roster, validating membership.
    pub fn to_roster(&self) -> Result<CouncilRoster, ConfigError> {
        self.council.to_roster()
    }

    /// Build the provider settings table, applying file overrides.
    pub fn to_registry(&self) -> ProviderRegistry {
        self.providers.to_registry()
    }

    /// Build the orchestration timeouts.
    pub fn to_params(&self) -> ExecutionParams {
        ExecutionParams {
            request_timeout: Duration::from_secs(self.behavior.request_timeout_secs),
            title_timeout: Duration::from_secs(self.behavior.title_timeout_secs),
        }
    }
}

/// One model entry in the TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileModelSpec {
    pub name: String,
    pub provider: String,
    pub model_id: String,
    #[serde(default)]
    pub role: String,
}

impl FileModelSpec {
    fn new(name: &str, provider: &str, model_id: &str, role: &str) -> Self {
        Self {
            name: name.to_string(),
            provider: provider.to_string(),
            model_id: model_id.to_string(),
            role: role.to_string(),
        }
    }

    fn to_spec(&self, field: &str) -> Result<ModelSpec, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName {
                field: field.to_string(),
            });
        }
        let provider: Provider =
            self.provider
                .parse()
                .map_err(|_| ConfigError::UnknownProvider {
                    field: field.to_string(),
                    name: self.provider.clone(),
                })?;
        Ok(ModelSpec::new(&self.name, provider, &self.model_id).with_role(&self.role))
    }
}

/// `[council]` section
///
/// # Example
///
/// ```toml
/// [[council.members]]
/// name = "GPT-4"
/// provider = "openai"
/// model_id = "gpt-4"
/// role = "Creative, broad thinking"
///
/// [council.chairman]
/// name = "GLM-4"
/// provider = "zhipu"
/// model_id = "glm-4"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Council members, in labeling order
    pub members: Vec<FileModelSpec>,
    /// Synthesizer for stage 3
    pub chairman: FileModelSpec,
    /// Fast model for best-effort title generation
    pub title_model: Option<FileModelSpec>,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        Self {
            members: vec![
                FileModelSpec::new(
                    "Claude Sonnet 4.5",
                    "anthropic",
                    "claude-3-5-sonnet-20241022",
                    "Careful, nuanced reasoning and analysis",
                ),
                FileModelSpec::new(
                    "GPT-4",
                    "openai",
                    "gpt-4",
                    "Creative, broad thinking and innovative solutions",
                ),
                FileModelSpec::new(
                    "Gemini Pro",
                    "google",
                    "gemini-pro",
                    "Analytical, data-driven insights",
                ),
                FileModelSpec::new(
                    "Grok",
                    "xai",
                    "grok-beta",
                    "Contrarian perspective and devil's advocate",
                ),
            ],
            chairman: FileModelSpec::new(
                "GLM-4",
                "zhipu",
                "glm-4",
                "Synthesis and final decision-making",
            ),
            title_model: Some(FileModelSpec::new(
                "Gemini Flash",
                "google",
                "gemini-2.0-flash-exp",
                "Conversation titles",
            )),
        }
    }
}

impl FileCouncilConfig {
    fn to_roster(&self) -> Result<CouncilRoster, ConfigError> {
        if self.members.is_empty() {
            return Err(ConfigError::NoMembers);
        }
        if self.members.len() > MAX_MEMBERS {
            return Err(ConfigError::TooManyMembers(self.members.len()));
        }

        let mut members = Vec::with_capacity(self.members.len());
        for (i, entry) in self.members.iter().enumerate() {
            let spec = entry.to_spec(&format!("council.members[{i}]"))?;
            if members.iter().any(|m: &ModelSpec| m.name == spec.name) {
                return Err(ConfigError::DuplicateMember(spec.name));
            }
            members.push(spec);
        }

        let chairman = self.chairman.to_spec("council.chairman")?;
        let mut roster = CouncilRoster::new(members, chairman);
        if let Some(title) = &self.title_model {
            roster = roster.with_title_model(title.to_spec("council.title_model")?);
        }
        Ok(roster)
    }
}

/// One provider override block (`[providers.openai]` etc.)
///
/// Unset fields fall back to the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Environment variable name for the API key
    pub api_key_env: Option<String>,
    /// Direct API key (prefer the env var)
    pub api_key: Option<String>,
    /// Request endpoint override
    pub base_url: Option<String>,
    /// Maximum-output-token ceiling
    pub max_tokens: Option<u32>,
}

impl FileProviderConfig {
    fn apply(&self, mut settings: ProviderSettings) -> ProviderSettings {
        if let Some(env) = &self.api_key_env {
            settings.api_key_env = env.clone();
        }
        if let Some(key) = &self.api_key {
            settings.api_key = Some(key.clone());
        }
        if let Some(url) = &self.base_url {
            settings.base_url = url.clone();
        }
        if let Some(max) = self.max_tokens {
            settings.max_tokens = max;
        }
        settings
    }
}

/// `[providers]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub openai: FileProviderConfig,
    pub anthropic: FileProviderConfig,
    pub google: FileProviderConfig,
    pub xai: FileProviderConfig,
    pub zhipu: FileProviderConfig,
}

impl FileProvidersConfig {
    fn to_registry(&self) -> ProviderRegistry {
        let defaults = ProviderRegistry::default();
        ProviderRegistry {
            openai: self.openai.apply(defaults.openai),
            anthropic: self.anthropic.apply(defaults.anthropic),
            google: self.google.apply(defaults.google),
            xai: self.xai.apply(defaults.xai),
            zhipu: self.zhipu.apply(defaults.zhipu),
        }
    }
}

/// `[behavior]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorConfig {
    /// Per-call timeout for stage fan-out and synthesis, in seconds
    pub request_timeout_secs: u64,
    /// Timeout for the title task, in seconds
    pub title_timeout_secs: u64,
}

impl Default for FileBehaviorConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 180,
            title_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster_matches_builtin_council() {
        let config = FileConfig::default();
        let roster = config.to_roster().unwrap();
        assert_eq!(roster.members.len(), 4);
        assert_eq!(roster.members[0].name, "Claude Sonnet 4.5");
        assert_eq!(roster.members[0].provider, Provider::Anthropic);
        assert_eq!(roster.chairman.name, "GLM-4");
        assert_eq!(roster.chairman.provider, Provider::Zhipu);
        assert!(roster.title_model.is_some());
    }

    #[test]
    fn test_toml_overrides_members() {
        let toml_str = r#"
[[council.members]]
name = "Solo"
provider = "openai"
model_id = "gpt-4"

[council.chairman]
name = "Chair"
provider = "anthropic"
model_id = "claude-3-5-sonnet-20241022"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let roster = config.to_roster().unwrap();
        assert_eq!(roster.members.len(), 1);
        assert_eq!(roster.members[0].name, "Solo");
        assert_eq!(roster.chairman.provider, Provider::Anthropic);
        // fields missing from the file fall back to the section default
        assert_eq!(roster.title_model.unwrap().name, "Gemini Flash");
    }

    #[test]
    fn test_unknown_provider_is_an_error() {
        let toml_str = r#"
[[council.members]]
name = "Mystery"
provider = "mistral"
model_id = "m1"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.to_roster(),
            Err(ConfigError::UnknownProvider { .. })
        ));
    }

    #[test]
    fn test_duplicate_member_names_rejected() {
        let toml_str = r#"
[[council.members]]
name = "Twin"
provider = "openai"
model_id = "gpt-4"

[[council.members]]
name = "Twin"
provider = "xai"
model_id = "grok-beta"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.to_roster(),
            Err(ConfigError::DuplicateMember(name)) if name == "Twin"
        ));
    }

    #[test]
    fn test_provider_overrides_apply_over_defaults() {
        let toml_str = r#"
[providers.zhipu]
max_tokens = 4096

[providers.openai]
base_url = "https://proxy.internal/v1/chat/completions"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let registry = config.to_registry();
        assert_eq!(registry.zhipu.max_tokens, 4096);
        assert_eq!(
            registry.openai.base_url,
            "https://proxy.internal/v1/chat/completions"
        );
        // untouched fields keep their defaults
        assert_eq!(registry.openai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(registry.anthropic.max_tokens, 2048);
    }

    #[test]
    fn test_behavior_timeouts() {
        let config: FileConfig = toml::from_str("[behavior]\nrequest_timeout_secs = 60").unwrap();
        let params = config.to_params();
        assert_eq!(params.request_timeout, Duration::from_secs(60));
        assert_eq!(params.title_timeout, Duration::from_secs(30));
    }
}
