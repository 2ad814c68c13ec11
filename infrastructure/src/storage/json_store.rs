//! JSON-file conversation store
//!
//! One pretty-printed JSON file per conversation under a single directory.
//! Every mutation is load-mutate-save, so the last writer wins. Storage
//! failures are logged and swallowed; a broken disk never kills a council
//! run that is already paid for.

use council_application::ports::conversation_store::ConversationStore;
use council_domain::{
    Conversation, ConversationMessage, ConversationSummary, Stage1Result, Stage2Result,
};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File-backed conversation store
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default location: `~/.local/share/llm-council/conversations`
    /// (platform equivalent via the data dir).
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("llm-council")
            .join("conversations")
    }

    fn path_for(&self, id: &str) -> PathBuf {
        // ids are caller-generated; keep the filename flat
        let safe: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }

    fn load(&self, id: &str) -> Option<Conversation> {
        let path = self.path_for(id);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read conversation file");
                return None;
            }
        };
        match serde_json::from_str(&data) {
            Ok(conv) => Some(conv),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not parse conversation file");
                None
            }
        }
    }

    fn save(&self, conv: &Conversation) {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!(dir = %self.dir.display(), error = %e, "could not create conversation dir");
            return;
        }
        let path = self.path_for(&conv.id);
        let data = match serde_json::to_string_pretty(conv) {
            Ok(data) => data,
            Err(e) => {
                warn!(id = %conv.id, error = %e, "could not serialize conversation");
                return;
            }
        };
        if let Err(e) = fs::write(&path, data) {
            warn!(path = %path.display(), error = %e, "could not write conversation file");
        }
    }

    fn mutate(&self, id: &str, f: impl FnOnce(&mut Conversation)) {
        let Some(mut conv) = self.load(id) else {
            warn!(id, "conversation not found, dropping update");
            return;
        };
        f(&mut conv);
        self.save(&conv);
    }
}

#[async_trait]
impl ConversationStore for JsonFileStore {
    async fn create(&self, id: &str) -> Option<Conversation> {
        let conv = Conversation::new(id);
        self.save(&conv);
        // confirm the write actually landed
        self.load(id)
    }

    async fn get(&self, id: &str) -> Option<Conversation> {
        self.load(id)
    }

    async fn list(&self) -> Vec<ConversationSummary> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut summaries: Vec<ConversationSummary> = entries
            .flatten()
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            .filter_map(|e| {
                let data = fs::read_to_string(e.path()).ok()?;
                let conv: Conversation = serde_json::from_str(&data).ok()?;
                Some(conv.summary())
            })
            .collect();

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summaries
    }

    async fn delete(&self, id: &str) {
        let path = self.path_for(id);
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "could not delete conversation file");
            }
        }
    }

    async fn append_user_message(&self, id: &str, content: &str) {
        self.mutate(id, |conv| {
            conv.messages.push(ConversationMessage::User {
                content: content.to_string(),
            });
        });
    }

    async fn append_assistant_message(
        &self,
        id: &str,
        stage1: &[Stage1Result],
        stage2: &[Stage2Result],
        stage3: &str,
    ) {
        self.mutate(id, |conv| {
            conv.messages.push(ConversationMessage::Assistant {
                stage1: stage1.to_vec(),
                stage2: stage2.to_vec(),
                stage3: stage3.to_string(),
            });
        });
    }

    async fn set_title(&self, id: &str, title: &str) {
        self.mutate(id, |conv| {
            conv.title = title.to_string();
        });
    }
}

impl JsonFileStore {
    /// Directory the store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
