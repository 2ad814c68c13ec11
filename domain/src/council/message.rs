//! Conversational messages and the normalized provider reply envelope

use serde::{Deserialize, Serialize};

/// Role of a message in a conversational prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A message in a conversational prompt (Value Object)
///
/// An ordered sequence of messages forms the prompt sent to a provider.
/// Order is meaningful: a system message, if present, precedes user content.
/// Providers without native system-message support fold it into the prompt
/// inside their adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Token accounting reported by a provider
///
/// Counters a provider omits default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub max_tokens: u32,
}

/// Normalized response from a single provider call (Value Object)
///
/// Every provider adapter reduces its wire format to this envelope.
/// Immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelReply {
    pub content: String,
    #[serde(default)]
    pub usage: TokenUsage,
}

impl ModelReply {
    pub fn new(content: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            content: content.into(),
            usage,
        }
    }

    /// Reply carrying only text, with zeroed usage counters.
    pub fn from_text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: TokenUsage::default(),
        }
    }
}
