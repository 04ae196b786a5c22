//! In-memory conversation history.
//!
//! Conversations are append-only lists of turns keyed by conversation id. A
//! conversation exists from its first append until the service stops.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

mod locks;

pub use locks::{ConversationGuard, ConversationLocks};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("conversation not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// `"<label>: <content>"`, the form used in prompts and the history API.
    pub fn render(&self, labels: &SpeakerLabels) -> String {
        format!("{}: {}", labels.label(self.role), self.content)
    }
}

/// Display names for each role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerLabels {
    pub user: String,
    pub assistant: String,
}

impl SpeakerLabels {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }

    pub fn label(&self, role: Role) -> &str {
        match role {
            Role::User => &self.user,
            Role::Assistant => &self.assistant,
        }
    }
}

impl Default for SpeakerLabels {
    fn default() -> Self {
        Self::new("Usuário", "Nova")
    }
}

/// Storage for conversation turns. Callers serialize writers per conversation
/// through [`ConversationLocks`].
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// The last `limit` turns, oldest first. Unknown ids yield an empty list.
    async fn recent(&self, conversation_id: &str, limit: usize) -> Vec<Turn>;

    /// Appends in order, creating the conversation on first use.
    async fn append(&self, conversation_id: &str, turns: Vec<Turn>);

    async fn history(&self, conversation_id: &str) -> Result<Vec<Turn>, HistoryError>;

    async fn conversation_count(&self) -> usize;
}

#[derive(Default)]
pub struct InMemoryConversationStore {
    conversations: RwLock<HashMap<String, Vec<Turn>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn recent(&self, conversation_id: &str, limit: usize) -> Vec<Turn> {
        let conversations = self.conversations.read().await;
        match conversations.get(conversation_id) {
            Some(turns) => {
                let start = turns.len().saturating_sub(limit);
                turns[start..].to_vec()
            }
            None => Vec::new(),
        }
    }

    async fn append(&self, conversation_id: &str, turns: Vec<Turn>) {
        let mut conversations = self.conversations.write().await;
        conversations
            .entry(conversation_id.to_string())
            .or_default()
            .extend(turns);
    }

    async fn history(&self, conversation_id: &str) -> Result<Vec<Turn>, HistoryError> {
        self.conversations
            .read()
            .await
            .get(conversation_id)
            .cloned()
            .ok_or_else(|| HistoryError::NotFound(conversation_id.to_string()))
    }

    async fn conversation_count(&self) -> usize {
        self.conversations.read().await.len()
    }
}
