//! Conversation, message and participant models.

use serde::{Deserialize, Serialize};

use crate::{now_ms, ConversationId, MessageId, MessagingError, Result, UserId};

/// Coarse presence indicator shown next to a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Away,
    Offline,
}

/// A chamber member as seen by the messaging screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: UserId,
    pub name: String,
    /// Business or organization the member represents
    pub affiliation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub status: PresenceStatus,
}

impl Participant {
    pub fn new(
        id: impl Into<UserId>,
        name: impl Into<String>,
        affiliation: impl Into<String>,
        status: PresenceStatus,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            affiliation: affiliation.into(),
            avatar_url: None,
            status,
        }
    }

    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    File,
}

/// Body of a message. The message type is derived from the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    File {
        name: String,
        url: String,
        size_bytes: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Text { .. } => MessageType::Text,
            Self::Image { .. } => MessageType::Image,
            Self::File { .. } => MessageType::File,
        }
    }

    /// Text body, if this is a text message.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }

    /// One-line summary for conversation lists.
    pub fn preview(&self) -> String {
        match self {
            Self::Text { text } => text.clone(),
            Self::Image { caption: Some(caption), .. } => format!("Photo: {caption}"),
            Self::Image { .. } => "Photo".to_string(),
            Self::File { name, .. } => format!("File: {name}"),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Self::Text { text } if text.trim().is_empty() => Err(MessagingError::InvalidInput(
                "message text must not be empty".into(),
            )),
            Self::Image { url, .. } if url.trim().is_empty() => Err(
                MessagingError::InvalidInput("image url must not be empty".into()),
            ),
            Self::File { name, url, .. } if name.trim().is_empty() || url.trim().is_empty() => {
                Err(MessagingError::InvalidInput(
                    "file name and url must not be empty".into(),
                ))
            }
            _ => Ok(()),
        }
    }
}

impl From<&str> for MessageContent {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for MessageContent {
    fn from(value: String) -> Self {
        Self::Text { text: value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub content: MessageContent,
    pub timestamp_ms: i64,
    pub read: bool,
}

impl Message {
    pub fn new(
        conversation_id: ConversationId,
        sender_id: UserId,
        content: MessageContent,
        read: bool,
    ) -> Self {
        Self {
            id: MessageId::new(),
            conversation_id,
            sender_id,
            content,
            timestamp_ms: now_ms(),
            read,
        }
    }

    pub fn message_type(&self) -> MessageType {
        self.content.message_type()
    }

    /// Whether this message counts against the local user's unread total.
    pub fn is_unread_for(&self, local_user: &UserId) -> bool {
        !self.read && &self.sender_id != local_user
    }
}

/// A thread of messages. Participants are referenced by id and resolved through the
/// store's participant registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    pub participant_ids: Vec<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<Message>,
    pub unread_count: u32,
    pub updated_at_ms: i64,
}

impl Conversation {
    pub fn new(id: ConversationId, participant_ids: Vec<UserId>) -> Self {
        Self {
            id,
            participant_ids,
            last_message: None,
            unread_count: 0,
            updated_at_ms: now_ms(),
        }
    }

    pub fn has_participant(&self, user_id: &UserId) -> bool {
        self.participant_ids.iter().any(|id| id == user_id)
    }
}
