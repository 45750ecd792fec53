use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::MessageId;

/// Greeting shown as the first assistant message of every conversation.
pub const WELCOME_MESSAGE: &str =
    "Hai! Aku Coddy, asisten belajarmu 👋. Ada yang bisa aku bantu seputar roadmap belajarmu?";

/// Assistant-role text appended when the chat function fails.
pub const CHAT_FAILURE_MESSAGE: &str =
    "Maaf, terjadi kesalahan saat menghubungi Coddy. Silakan coba lagi nanti.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry of a conversation. Lives only in view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    #[must_use]
    pub fn user(id: MessageId, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            role: ChatRole::User,
            content: content.into(),
            timestamp,
        }
    }

    #[must_use]
    pub fn assistant(id: MessageId, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp,
        }
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}

/// Request body of the `coddy-chat` function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatQuestion {
    pub question: String,
}

/// Response body of the `coddy-chat` function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
}
