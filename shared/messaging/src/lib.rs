//! Conversation and notification state shared by ChamberConnect clients.

pub mod conversation;
pub mod display;
pub mod notifications;
pub mod seed;
pub mod store;
pub mod views;

pub use conversation::{
    Conversation, Message, MessageContent, MessageType, Participant, PresenceStatus,
};
pub use notifications::{NewNotification, Notification, NotificationActor, NotificationType};
pub use store::{EntityStore, Mutation, MutationOutcome};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Unique identifier assigned to a conversation thread.
    ConversationId
);
string_id!(
    /// Unique identifier of a single message.
    MessageId
);
string_id!(
    /// Unique identifier of a notification.
    NotificationId
);
string_id!(
    /// Identity of a chamber member, as issued by the auth provider.
    UserId
);

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Errors surfaced by the state model. A failed mutation never leaves partial updates behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessagingError {
    #[error("conversation not found: {0}")]
    ConversationNotFound(ConversationId),
    #[error("notification not found: {0}")]
    NotificationNotFound(NotificationId),
    #[error("participant not found: {0}")]
    ParticipantNotFound(UserId),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl MessagingError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ConversationNotFound(_)
                | Self::NotificationNotFound(_)
                | Self::ParticipantNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MessagingError>;
