//! Conversation entities shared with the persistence collaborator.
//!
//! The orchestration core never stores these itself; it produces stage
//! results and the store appends them. Shapes live in the domain so the
//! store port, file store, and JSON output all agree.

use crate::council::results::{Stage1Result, Stage2Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored conversation (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub messages: Vec<ConversationMessage>,
}

impl Conversation {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            title: crate::council::results::TITLE_FALLBACK.to_string(),
            messages: Vec::new(),
        }
    }

    /// True before the first user message lands - the trigger for the
    /// one-shot title generation task.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            created_at: self.created_at,
            title: self.title.clone(),
            message_count: self.messages.len(),
        }
    }
}

/// One entry in a conversation: a user question or the assistant bundle of
/// all three stage results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ConversationMessage {
    User {
        content: String,
    },
    Assistant {
        stage1: Vec<Stage1Result>,
        stage2: Vec<Stage2Result>,
        stage3: String,
    },
}

/// Listing entry for a stored conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub message_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation_is_empty_with_fallback_title() {
        let conv = Conversation::new("abc");
        assert!(conv.is_empty());
        assert_eq!(conv.title, "New Conversation");
    }

    #[test]
    fn test_message_serializes_with_role_tag() {
        let msg = ConversationMessage::User {
            content: "hello".into(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");

        let msg = ConversationMessage::Assistant {
            stage1: vec![],
            stage2: vec![],
            stage3: "done".into(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["stage3"], "done");
    }

    #[test]
    fn test_summary_counts_messages() {
        let mut conv = Conversation::new("abc");
        conv.messages.push(ConversationMessage::User {
            content: "q".into(),
        });
        assert_eq!(conv.summary().message_count, 1);
        assert_eq!(conv.summary().id, "abc");
    }
}
