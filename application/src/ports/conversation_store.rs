//! Port for the conversation persistence collaborator.
//!
//! The orchestration core performs no persistence itself; the front door
//! (here, the CLI binary) calls this port between stages. All operations
//! are best effort: implementations log and swallow their own failures so
//! storage problems never disrupt a running council. Durability semantics
//! are "last write wins".

use async_trait::async_trait;
use council_domain::{Conversation, ConversationSummary, Stage1Result, Stage2Result};

/// Port for reading and appending stored conversations.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Create a conversation with the given id. Returns the stored entity,
    /// or `None` if it could not be written.
    async fn create(&self, id: &str) -> Option<Conversation>;

    /// Fetch a conversation by id.
    async fn get(&self, id: &str) -> Option<Conversation>;

    /// List stored conversations, newest first.
    async fn list(&self) -> Vec<ConversationSummary>;

    /// Delete a conversation by id.
    async fn delete(&self, id: &str);

    /// Append a user message.
    async fn append_user_message(&self, id: &str, content: &str);

    /// Append the assistant bundle for one completed council run.
    async fn append_assistant_message(
        &self,
        id: &str,
        stage1: &[Stage1Result],
        stage2: &[Stage2Result],
        stage3: &str,
    );

    /// Update the conversation title.
    async fn set_title(&self, id: &str, title: &str);
}

/// No-op store for one-shot runs and tests.
pub struct NoConversationStore;

#[async_trait]
impl ConversationStore for NoConversationStore {
    async fn create(&self, _id: &str) -> Option<Conversation> {
        None
    }

    async fn get(&self, _id: &str) -> Option<Conversation> {
        None
    }

    async fn list(&self) -> Vec<ConversationSummary> {
        Vec::new()
    }

    async fn delete(&self, _id: &str) {}

    async fn append_user_message(&self, _id: &str, _content: &str) {}

    async fn append_assistant_message(
        &self,
        _id: &str,
        _stage1: &[Stage1Result],
        _stage2: &[Stage2Result],
        _stage3: &str,
    ) {
    }

    async fn set_title(&self, _id: &str, _title: &str) {}
}
